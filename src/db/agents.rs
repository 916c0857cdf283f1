// src/db/agents.rs
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

use crate::domain::agent::{AgentProfile, OnboardingForm, ProfileTemplate, MAX_SLUG_LEN};
use crate::errors::ServerError;

const AGENT_COLUMNS: &str = "id, user_id, display_name, slug, phone, city, area, experience, \
                             bio, template, is_subscribed, subscribed_plan";

fn agent_from_row(r: &Row<'_>) -> rusqlite::Result<AgentProfile> {
    let template: String = r.get(9)?;
    Ok(AgentProfile {
        id: r.get(0)?,
        user_id: r.get(1)?,
        display_name: r.get(2)?,
        slug: r.get(3)?,
        phone: r.get(4)?,
        city: r.get(5)?,
        area: r.get(6)?,
        experience: r.get(7)?,
        bio: r.get(8)?,
        template: ProfileTemplate::parse(&template),
        is_subscribed: r.get(10)?,
        subscribed_plan: r.get(11)?,
    })
}

fn find_one(
    conn: &Connection,
    where_clause: &str,
    param: &dyn rusqlite::ToSql,
) -> Result<Option<AgentProfile>, ServerError> {
    let sql = format!("select {AGENT_COLUMNS} from agents where {where_clause}");
    conn.query_row(&sql, [param], agent_from_row)
        .optional()
        .map_err(|e| ServerError::DbError(format!("select agent failed: {e}")))
}

pub fn find_agent_by_user(conn: &Connection, user_id: i64) -> Result<Option<AgentProfile>, ServerError> {
    find_one(conn, "user_id = ?", &user_id)
}

pub fn find_agent(conn: &Connection, agent_id: i64) -> Result<Option<AgentProfile>, ServerError> {
    find_one(conn, "id = ?", &agent_id)
}

pub fn find_agent_by_slug(conn: &Connection, slug: &str) -> Result<Option<AgentProfile>, ServerError> {
    find_one(conn, "slug = ?", &slug)
}

pub fn list_agents(conn: &Connection) -> Result<Vec<AgentProfile>, ServerError> {
    let sql = format!("select {AGENT_COLUMNS} from agents order by id");
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map([], agent_from_row)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut agents = Vec::new();
    for r in rows {
        agents.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(agents)
}

/// `base`, then `base-2`, `base-3`, ... until no other user's agent has it.
/// Suffixed candidates shorten the base so the result stays within
/// `MAX_SLUG_LEN`.
fn unique_slug(conn: &Connection, base: &str, user_id: i64) -> Result<String, ServerError> {
    let mut n = 1;
    loop {
        let candidate = if n == 1 {
            truncate_slug(base, MAX_SLUG_LEN)
        } else {
            let suffix = format!("-{n}");
            let head = truncate_slug(base, MAX_SLUG_LEN - suffix.len());
            format!("{head}{suffix}")
        };

        let taken: Option<i64> = conn
            .query_row(
                "select id from agents where slug = ? and user_id != ?",
                params![candidate, user_id],
                |r| r.get(0),
            )
            .optional()
            .map_err(|e| ServerError::DbError(format!("slug lookup failed: {e}")))?;

        if taken.is_none() {
            return Ok(candidate);
        }
        n += 1;
    }
}

/// First `max` characters, without a trailing dash.
fn truncate_slug(slug: &str, max: usize) -> String {
    let mut s: String = slug.chars().take(max).collect();
    while s.ends_with('-') {
        s.pop();
    }
    s
}

/// Create or update the caller's agent profile from the onboarding wizard.
pub fn complete_onboarding(
    conn: &mut Connection,
    user_id: i64,
    form: &OnboardingForm,
    now: i64,
) -> Result<AgentProfile, ServerError> {
    // Immediate: take the write lock before the slug check so two onboardings
    // with the same name cannot both pick it.
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

    let slug = unique_slug(&tx, &form.slug_base, user_id)?;

    tx.execute(
        r#"
        insert into agents
            (user_id, display_name, slug, phone, city, area, experience, bio, created_at, updated_at)
        values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
        on conflict(user_id) do update set
            display_name = excluded.display_name,
            slug         = excluded.slug,
            phone        = excluded.phone,
            city         = excluded.city,
            area         = excluded.area,
            experience   = excluded.experience,
            bio          = excluded.bio,
            updated_at   = excluded.updated_at
        "#,
        params![
            user_id,
            form.display_name,
            slug,
            form.phone,
            form.city,
            form.area,
            form.experience,
            form.bio,
            now
        ],
    )
    .map_err(|e| ServerError::DbError(format!("upsert agent failed: {e}")))?;

    let agent = find_agent_by_user(&tx, user_id)?.ok_or(ServerError::InternalError)?;

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;

    Ok(agent)
}

pub fn set_template(
    conn: &Connection,
    agent_id: i64,
    template: ProfileTemplate,
    now: i64,
) -> Result<(), ServerError> {
    conn.execute(
        "update agents set template = ?, updated_at = ? where id = ?",
        params![template.as_str(), now, agent_id],
    )
    .map_err(|e| ServerError::DbError(format!("update template failed: {e}")))?;
    Ok(())
}

/// Returns false when no such agent exists.
pub fn set_subscription(
    conn: &Connection,
    agent_id: i64,
    subscribed: bool,
    plan_code: Option<&str>,
    now: i64,
) -> Result<bool, ServerError> {
    let subscribed_at = subscribed.then_some(now);
    let updated = conn
        .execute(
            r#"
            update agents
            set is_subscribed = ?, subscribed_plan = ?, subscribed_at = ?, updated_at = ?
            where id = ?
            "#,
            params![subscribed, plan_code, subscribed_at, now, agent_id],
        )
        .map_err(|e| ServerError::DbError(format!("update subscription failed: {e}")))?;
    Ok(updated == 1)
}

// src/db/deals.rs
use std::collections::HashSet;

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::analytics::view_counts_last_30d;
use crate::domain::agent::AgentProfile;
use crate::domain::deal::{is_eligible, AgentTarget, Deal, DealStatus, Targeting};
use crate::errors::ServerError;

const DEAL_COLUMNS: &str = "id, title, description, status, \
    allowed_agent_slugs, excluded_agent_slugs, allowed_cities, excluded_cities, \
    allowed_areas, excluded_areas, min_profile_views_30d, min_page_views_30d, created_at";

/// Raw row, before the JSON lists and status are decoded.
struct DealRow {
    id: i64,
    title: String,
    description: String,
    status: String,
    lists: [String; 6],
    min_profile_views_30d: Option<i64>,
    min_page_views_30d: Option<i64>,
    created_at: i64,
}

fn deal_row(r: &Row<'_>) -> rusqlite::Result<DealRow> {
    Ok(DealRow {
        id: r.get(0)?,
        title: r.get(1)?,
        description: r.get(2)?,
        status: r.get(3)?,
        lists: [r.get(4)?, r.get(5)?, r.get(6)?, r.get(7)?, r.get(8)?, r.get(9)?],
        min_profile_views_30d: r.get(10)?,
        min_page_views_30d: r.get(11)?,
        created_at: r.get(12)?,
    })
}

fn decode_list(deal_id: i64, raw: &str) -> Result<Vec<String>, ServerError> {
    serde_json::from_str(raw)
        .map_err(|e| ServerError::DbError(format!("deal {deal_id}: bad targeting list: {e}")))
}

fn encode_list(list: &[String]) -> Result<String, ServerError> {
    serde_json::to_string(list).map_err(|e| ServerError::DbError(format!("encode list failed: {e}")))
}

impl DealRow {
    fn into_deal(self) -> Result<Deal, ServerError> {
        let id = self.id;
        // An unknown status must not be mistaken for an offerable deal.
        let status = DealStatus::parse(&self.status).ok_or_else(|| {
            ServerError::DbError(format!("deal {id}: unknown status {:?}", self.status))
        })?;
        let [allowed_slugs, excluded_slugs, allowed_cities, excluded_cities, allowed_areas, excluded_areas] =
            self.lists;

        Ok(Deal {
            id,
            title: self.title,
            description: self.description,
            status,
            targeting: Targeting {
                allowed_agent_slugs: decode_list(id, &allowed_slugs)?,
                excluded_agent_slugs: decode_list(id, &excluded_slugs)?,
                allowed_cities: decode_list(id, &allowed_cities)?,
                excluded_cities: decode_list(id, &excluded_cities)?,
                allowed_areas: decode_list(id, &allowed_areas)?,
                excluded_areas: decode_list(id, &excluded_areas)?,
                min_profile_views_30d: self.min_profile_views_30d,
                min_page_views_30d: self.min_page_views_30d,
            },
            created_at: self.created_at,
        })
    }
}

fn query_deals(
    conn: &Connection,
    where_clause: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Deal>, ServerError> {
    let sql = format!("select {DEAL_COLUMNS} from deals {where_clause} order by id desc");
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params, deal_row)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut deals = Vec::new();
    for r in rows {
        let row = r.map_err(|e| ServerError::DbError(e.to_string()))?;
        deals.push(row.into_deal()?);
    }
    Ok(deals)
}

#[derive(Debug, Clone)]
pub struct NewDeal {
    pub title: String,
    pub description: String,
    pub status: DealStatus,
    pub targeting: Targeting,
}

pub fn create_deal(conn: &Connection, deal: &NewDeal, now: i64) -> Result<i64, ServerError> {
    let t = &deal.targeting;
    conn.execute(
        r#"
        insert into deals (
            title, description, status,
            allowed_agent_slugs, excluded_agent_slugs, allowed_cities, excluded_cities,
            allowed_areas, excluded_areas, min_profile_views_30d, min_page_views_30d,
            created_at, updated_at
        ) values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
        "#,
        params![
            deal.title,
            deal.description,
            deal.status.as_str(),
            encode_list(&t.allowed_agent_slugs)?,
            encode_list(&t.excluded_agent_slugs)?,
            encode_list(&t.allowed_cities)?,
            encode_list(&t.excluded_cities)?,
            encode_list(&t.allowed_areas)?,
            encode_list(&t.excluded_areas)?,
            t.min_profile_views_30d,
            t.min_page_views_30d,
            now
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert deal failed: {e}")))?;

    Ok(conn.last_insert_rowid())
}

pub fn get_deal(conn: &Connection, deal_id: i64) -> Result<Option<Deal>, ServerError> {
    let sql = format!("select {DEAL_COLUMNS} from deals where id = ?");
    let row = conn
        .query_row(&sql, params![deal_id], deal_row)
        .optional()
        .map_err(|e| ServerError::DbError(format!("select deal failed: {e}")))?;
    row.map(DealRow::into_deal).transpose()
}

pub fn list_deals(conn: &Connection) -> Result<Vec<Deal>, ServerError> {
    query_deals(conn, "", [])
}

/// Candidate set for the eligibility filter: every active deal.
pub fn list_active_deals(conn: &Connection) -> Result<Vec<Deal>, ServerError> {
    query_deals(conn, "where status = ?", params![DealStatus::Active.as_str()])
}

pub fn set_deal_status(
    conn: &Connection,
    deal_id: i64,
    status: DealStatus,
    now: i64,
) -> Result<bool, ServerError> {
    let updated = conn
        .execute(
            "update deals set status = ?, updated_at = ? where id = ?",
            params![status.as_str(), now, deal_id],
        )
        .map_err(|e| ServerError::DbError(format!("update deal status failed: {e}")))?;
    Ok(updated == 1)
}

/// Active deals this agent may see. Overfetches every active deal and keeps
/// the ones passing `is_eligible` against freshly counted views.
pub fn eligible_deals_for_agent(
    conn: &Connection,
    agent: &AgentProfile,
    now: i64,
) -> Result<Vec<Deal>, ServerError> {
    let Some(target) = AgentTarget::from_profile(agent) else {
        return Ok(Vec::new());
    };
    let views = view_counts_last_30d(conn, agent.id, now)?;

    let candidates = list_active_deals(conn)?;
    let total = candidates.len();
    let eligible: Vec<Deal> = candidates
        .into_iter()
        .filter(|d| is_eligible(d, &target, &views))
        .collect();

    tracing::debug!(
        agent_id = agent.id,
        candidates = total,
        eligible = eligible.len(),
        "filtered deals"
    );
    Ok(eligible)
}

/// Record that `agent` took up `deal_id`. Eligibility is re-checked now, not
/// trusted from the page the agent saw. Returns false if already adopted.
pub fn adopt_deal(
    conn: &Connection,
    deal_id: i64,
    agent: &AgentProfile,
    now: i64,
) -> Result<bool, ServerError> {
    let deal = get_deal(conn, deal_id)?.ok_or(ServerError::NotFound)?;
    let target = AgentTarget::from_profile(agent).ok_or(ServerError::Forbidden)?;
    let views = view_counts_last_30d(conn, agent.id, now)?;

    if !is_eligible(&deal, &target, &views) {
        tracing::info!(deal_id, agent_id = agent.id, "adoption refused: not eligible");
        return Err(ServerError::Forbidden);
    }

    let inserted = conn
        .execute(
            "insert or ignore into deal_adoptions (deal_id, agent_id, adopted_at) values (?, ?, ?)",
            params![deal_id, agent.id, now],
        )
        .map_err(|e| ServerError::DbError(format!("insert adoption failed: {e}")))?;

    Ok(inserted == 1)
}

pub fn adopted_deal_ids(conn: &Connection, agent_id: i64) -> Result<HashSet<i64>, ServerError> {
    let mut stmt = conn
        .prepare("select deal_id from deal_adoptions where agent_id = ?")
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![agent_id], |r| r.get::<_, i64>(0))
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut ids = HashSet::new();
    for r in rows {
        ids.insert(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(ids)
}

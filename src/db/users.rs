// src/db/users.rs
use crate::errors::ServerError;
use rusqlite::{params, Connection, OptionalExtension};

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub is_admin: bool,
    pub created_at: i64,
    pub last_login_at: Option<i64>,
}

/// A user joined with their agent profile, if any. Used by the admin tables.
#[derive(Debug, Clone)]
pub struct UserWithAgent {
    pub id: i64,
    pub email: String,
    pub is_admin: bool,
    pub last_login_at: Option<i64>,
    pub agent_slug: Option<String>,
    pub agent_subscribed: Option<bool>,
}

pub fn find_user(conn: &Connection, user_id: i64) -> Result<Option<UserRow>, ServerError> {
    conn.query_row(
        "select id, email, is_admin, created_at, last_login_at from users where id = ?",
        params![user_id],
        |r| {
            Ok(UserRow {
                id: r.get(0)?,
                email: r.get(1)?,
                is_admin: r.get(2)?,
                created_at: r.get(3)?,
                last_login_at: r.get(4)?,
            })
        },
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select user failed: {e}")))
}

pub fn user_exists(conn: &Connection, user_id: i64) -> Result<bool, ServerError> {
    let found: Option<i64> = conn
        .query_row("select 1 from users where id = ?", params![user_id], |r| r.get(0))
        .optional()
        .map_err(|e| ServerError::DbError(format!("user lookup failed: {e}")))?;
    Ok(found.is_some())
}

pub fn is_user_admin(conn: &Connection, user_id: i64) -> Result<bool, ServerError> {
    Ok(find_user(conn, user_id)?.map(|u| u.is_admin).unwrap_or(false))
}

pub fn set_admin(conn: &Connection, user_id: i64, is_admin: bool) -> Result<(), ServerError> {
    conn.execute(
        "update users set is_admin = ? where id = ?",
        params![is_admin, user_id],
    )
    .map_err(|e| ServerError::DbError(format!("update is_admin failed: {e}")))?;
    Ok(())
}

pub fn list_users_with_agents(conn: &Connection) -> Result<Vec<UserWithAgent>, ServerError> {
    let mut stmt = conn
        .prepare(
            r#"
            select u.id, u.email, u.is_admin, u.last_login_at, a.slug, a.is_subscribed
            from users u
            left join agents a on a.user_id = u.id
            order by u.id desc
            limit 200
            "#,
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map([], |r| {
            Ok(UserWithAgent {
                id: r.get(0)?,
                email: r.get(1)?,
                is_admin: r.get(2)?,
                last_login_at: r.get(3)?,
                agent_slug: r.get(4)?,
                agent_subscribed: r.get(5)?,
            })
        })
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut users = Vec::new();
    for r in rows {
        users.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(users)
}

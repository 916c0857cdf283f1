// src/auth/current.rs
use crate::auth::sessions::{load_session, SESSION_COOKIE};
use crate::db::connection::Database;
use crate::errors::ServerError;
use astra::Request;

/// The authenticated principal attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: i64,
}

/// Raw session token from the `Cookie` header, if any.
pub fn session_token_from_request(req: &Request) -> Option<String> {
    req.headers()
        .get_all("Cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

pub fn current_identity(
    req: &Request,
    db: &Database,
    now: i64,
) -> Result<Option<SessionIdentity>, ServerError> {
    let Some(token) = session_token_from_request(req) else {
        return Ok(None);
    };

    let user_id = db.with_conn(|conn| load_session(conn, &token, now))?;
    Ok(user_id.map(|user_id| SessionIdentity { user_id }))
}

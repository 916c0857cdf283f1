// src/db/flow.rs
use rusqlite::Connection;

use crate::auth::SessionIdentity;
use crate::db::agents::find_agent_by_user;
use crate::db::users::user_exists;
use crate::domain::flow::{evaluate, FlowStatus};
use crate::errors::ServerError;

/// Fetch what the evaluator needs and evaluate. Anonymous visitors never
/// touch the store; lookup failures propagate untouched.
pub fn resolve_flow_status(
    conn: &Connection,
    identity: Option<SessionIdentity>,
    bypass_subscription: bool,
) -> Result<FlowStatus, ServerError> {
    let Some(identity) = identity else {
        return Ok(evaluate(None, false, None, bypass_subscription));
    };

    let exists = user_exists(conn, identity.user_id)?;
    let agent = if exists {
        find_agent_by_user(conn, identity.user_id)?
    } else {
        None
    };

    let status = evaluate(
        Some(identity.user_id),
        exists,
        agent.as_ref(),
        bypass_subscription,
    );
    tracing::debug!(
        user_id = identity.user_id,
        state = status.state.as_str(),
        redirect = %status.redirect,
        "flow status"
    );
    Ok(status)
}

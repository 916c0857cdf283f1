// src/router/webhooks.rs
use astra::Request;

use super::forms::Form;
use super::Ctx;
use crate::auth::token::secrets_match;
use crate::db::{agents, plans};
use crate::errors::ServerError;
use crate::responses::{text_response, ResultResp};

pub const WEBHOOK_SECRET_HEADER: &str = "X-Webhook-Secret";

/// Payment gateway callback. Flips an agent's subscription on `active`
/// and clears it on `cancelled`.
pub fn payment(req: Request, ctx: Ctx) -> ResultResp {
    // No secret configured: the endpoint does not exist.
    let expected = ctx
        .cfg
        .payment_webhook_secret
        .as_deref()
        .ok_or(ServerError::NotFound)?;

    let provided = req
        .headers()
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !secrets_match(provided, expected) {
        tracing::warn!("payment webhook rejected: bad secret");
        return Err(ServerError::Unauthorized("invalid webhook secret".into()));
    }

    let form = Form::from_body(req)?;
    let agent_id = form.id("agent_id")?;
    let plan_code = form.get("plan_code").trim();

    let status = form.get("status").trim();
    let subscribed = match status {
        "active" => true,
        "cancelled" => false,
        other => {
            return Err(ServerError::BadRequest(format!("unknown payment status {other:?}")));
        }
    };

    ctx.db.with_conn(|conn| {
        agents::find_agent(conn, agent_id)?.ok_or(ServerError::NotFound)?;

        if subscribed {
            plans::find_plan(conn, plan_code)?
                .ok_or_else(|| ServerError::BadRequest(format!("unknown plan {plan_code:?}")))?;
            agents::set_subscription(conn, agent_id, true, Some(plan_code), ctx.now)
        } else {
            agents::set_subscription(conn, agent_id, false, None, ctx.now)
        }
    })?;

    tracing::info!(agent_id, plan = plan_code, status, "subscription updated");
    text_response(200, "ok")
}

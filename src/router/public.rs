// src/router/public.rs
use astra::Request;
use rusqlite::Connection;

use super::forms::{path_id, Form};
use super::Ctx;
use crate::db::{agents, analytics, leads, listings, users};
use crate::domain::agent::AgentProfile;
use crate::domain::analytics::ViewKind;
use crate::domain::lead::NewLead;
use crate::errors::ServerError;
use crate::mailer::BrevoMailer;
use crate::responses::{html_response, html_with_status, ResultResp};
use crate::templates::pages::{contact_thanks_page, property_page, public_profile_page};

/// Published agent for `slug`. Unsubscribed agents stay hidden unless
/// subscriptions are bypassed.
fn published_agent(conn: &Connection, slug: &str, bypass: bool) -> Result<AgentProfile, ServerError> {
    agents::find_agent_by_slug(conn, slug)?
        .filter(|a| a.is_subscribed || bypass)
        .ok_or(ServerError::NotFound)
}

pub fn profile(ctx: Ctx, slug: &str, path: &str) -> ResultResp {
    let (agent, rows) = ctx.db.with_conn(|conn| {
        let agent = published_agent(conn, slug, ctx.cfg.bypass_subscription)?;
        analytics::record_view(conn, agent.id, ViewKind::Profile, path, ctx.now)?;
        let rows = listings::listings_for_agent(conn, agent.id)?;
        Ok((agent, rows))
    })?;

    html_response(public_profile_page(&agent, &rows, None))
}

pub fn property(ctx: Ctx, slug: &str, id: &str, path: &str) -> ResultResp {
    let listing_id = path_id(id)?;

    let (agent, listing) = ctx.db.with_conn(|conn| {
        let agent = published_agent(conn, slug, ctx.cfg.bypass_subscription)?;
        let listing = listings::find_listing(conn, agent.id, listing_id)?.ok_or(ServerError::NotFound)?;
        analytics::record_view(conn, agent.id, ViewKind::Property, path, ctx.now)?;
        Ok((agent, listing))
    })?;

    html_response(property_page(&agent, &listing))
}

pub fn contact(req: Request, ctx: Ctx, slug: &str) -> ResultResp {
    let form = Form::from_body(req)?;

    let agent = ctx
        .db
        .with_conn(|conn| published_agent(conn, slug, ctx.cfg.bypass_subscription))?;

    let property_id = match form.opt("property_id") {
        Some(raw) => Some(path_id(raw)?),
        None => None,
    };

    let lead = match NewLead::from_form(
        form.get("name"),
        form.get("email"),
        form.get("phone"),
        form.get("message"),
        property_id,
    ) {
        Ok(lead) => lead,
        Err(ServerError::BadRequest(msg)) => {
            let rows = ctx
                .db
                .with_conn(|conn| listings::listings_for_agent(conn, agent.id))?;
            return html_with_status(400, public_profile_page(&agent, &rows, Some(msg.as_str())));
        }
        Err(e) => return Err(e),
    };

    let (lead_id, agent_email) = ctx.db.with_conn(|conn| {
        if let Some(pid) = lead.property_id {
            listings::find_listing(conn, agent.id, pid)?.ok_or(ServerError::NotFound)?;
        }
        let lead_id = leads::create_lead(conn, agent.id, &lead, ctx.now)?;
        let email = users::find_user(conn, agent.user_id)?.map(|u| u.email);
        Ok((lead_id, email))
    })?;
    tracing::info!(lead_id, agent_id = agent.id, "lead captured");

    notify_agent(ctx, &agent, agent_email.as_deref(), &lead);

    html_response(contact_thanks_page(&agent))
}

/// Best effort: the lead is already stored, so a mail failure is only logged.
fn notify_agent(ctx: Ctx, agent: &AgentProfile, to: Option<&str>, lead: &NewLead) {
    let (Some(mail_cfg), Some(to)) = (&ctx.cfg.mail, to) else {
        return;
    };

    let sent = BrevoMailer::new(mail_cfg)
        .and_then(|mailer| mailer.send_lead_notification(to, &agent.display_name, lead));
    if let Err(e) = sent {
        tracing::warn!(agent_id = agent.id, error = %e, "lead notification failed");
    }
}

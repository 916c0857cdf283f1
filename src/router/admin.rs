// src/router/admin.rs
use astra::Request;

use super::forms::{path_id, Form};
use super::{granted, require_admin, Ctx};
use crate::db::deals::NewDeal;
use crate::db::{agents, analytics, deals, users};
use crate::domain::deal::{eligibility_failures, parse_list, AgentTarget, DealStatus, Targeting};
use crate::errors::ServerError;
use crate::responses::{html_response, html_with_status, redirect, ResultResp};
use crate::templates::pages::{admin_page, deal_preview_page, AdminVm, AgentRow, PreviewRow};

fn load_admin_vm(ctx: Ctx) -> Result<AdminVm, ServerError> {
    ctx.db.with_conn(|conn| {
        let mut rows = Vec::new();
        for agent in agents::list_agents(conn)? {
            let views = analytics::view_counts_last_30d(conn, agent.id, ctx.now)?;
            rows.push(AgentRow { agent, views });
        }

        Ok(AdminVm {
            users: users::list_users_with_agents(conn)?,
            agents: rows,
            deals: deals::list_deals(conn)?,
        })
    })
}

pub fn index(req: &Request, ctx: Ctx) -> ResultResp {
    granted!(require_admin(req, ctx));
    html_response(admin_page(&load_admin_vm(ctx)?, None))
}

fn parse_status(raw: &str) -> Result<DealStatus, ServerError> {
    DealStatus::parse(raw.trim())
        .ok_or_else(|| ServerError::BadRequest(format!("unknown deal status {raw:?}")))
}

/// Lists are split at the form boundary; the strings themselves are kept literally.
fn deal_from_form(form: &Form) -> Result<NewDeal, ServerError> {
    let title = form
        .opt("title")
        .ok_or_else(|| ServerError::BadRequest("A deal needs a title.".into()))?;

    let status = match form.opt("status") {
        Some(raw) => parse_status(raw)?,
        None => DealStatus::Draft,
    };

    Ok(NewDeal {
        title: title.to_string(),
        description: form.get("description").trim().to_string(),
        status,
        targeting: Targeting {
            allowed_agent_slugs: parse_list(form.get("allowed_agent_slugs")),
            excluded_agent_slugs: parse_list(form.get("excluded_agent_slugs")),
            allowed_cities: parse_list(form.get("allowed_cities")),
            excluded_cities: parse_list(form.get("excluded_cities")),
            allowed_areas: parse_list(form.get("allowed_areas")),
            excluded_areas: parse_list(form.get("excluded_areas")),
            min_profile_views_30d: form.opt_count("min_profile_views_30d")?,
            min_page_views_30d: form.opt_count("min_page_views_30d")?,
        },
    })
}

pub fn create_deal(req: Request, ctx: Ctx) -> ResultResp {
    granted!(require_admin(&req, ctx));
    let form = Form::from_body(req)?;

    let deal = match deal_from_form(&form) {
        Ok(d) => d,
        Err(ServerError::BadRequest(msg)) => {
            return html_with_status(400, admin_page(&load_admin_vm(ctx)?, Some(msg.as_str())));
        }
        Err(e) => return Err(e),
    };

    let id = ctx.db.with_conn(|conn| deals::create_deal(conn, &deal, ctx.now))?;
    tracing::info!(deal_id = id, status = deal.status.as_str(), "deal created");
    redirect("/admin")
}

pub fn deal_status(req: Request, ctx: Ctx, id: &str) -> ResultResp {
    granted!(require_admin(&req, ctx));
    let deal_id = path_id(id)?;
    let form = Form::from_body(req)?;
    let status = parse_status(form.get("status"))?;

    let updated = ctx
        .db
        .with_conn(|conn| deals::set_deal_status(conn, deal_id, status, ctx.now))?;
    if !updated {
        return Err(ServerError::NotFound);
    }
    tracing::info!(deal_id, status = status.as_str(), "deal status changed");
    redirect("/admin")
}

pub fn deal_preview(req: &Request, ctx: Ctx, id: &str) -> ResultResp {
    granted!(require_admin(req, ctx));
    let deal_id = path_id(id)?;

    let (deal, rows) = ctx.db.with_conn(|conn| {
        let deal = deals::get_deal(conn, deal_id)?.ok_or(ServerError::NotFound)?;

        let mut rows = Vec::new();
        for agent in agents::list_agents(conn)? {
            // Agents without a slug are not targetable yet.
            let Some(target) = AgentTarget::from_profile(&agent) else {
                continue;
            };
            let views = analytics::view_counts_last_30d(conn, agent.id, ctx.now)?;
            let failures = eligibility_failures(&deal, &target, &views);
            rows.push(PreviewRow {
                agent,
                views,
                failures,
            });
        }
        Ok((deal, rows))
    })?;

    html_response(deal_preview_page(&deal, &rows))
}

/// Moderation override for an agent's subscription flag.
pub fn agent_subscription(req: Request, ctx: Ctx, id: &str) -> ResultResp {
    let admin_id = granted!(require_admin(&req, ctx));
    let agent_id = path_id(id)?;
    let form = Form::from_body(req)?;
    let subscribed = matches!(form.get("subscribed").trim(), "1" | "true" | "on");

    let updated = ctx
        .db
        .with_conn(|conn| agents::set_subscription(conn, agent_id, subscribed, None, ctx.now))?;
    if !updated {
        return Err(ServerError::NotFound);
    }
    tracing::info!(admin_id, agent_id, subscribed, "subscription overridden");
    redirect("/admin")
}

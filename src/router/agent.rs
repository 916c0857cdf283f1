// src/router/agent.rs
//! Signed-in agent pages. Everything except onboarding and the plan list
//! requires the `Ready` flow state.

use astra::Request;

use super::forms::{path_id, Form};
use super::{granted, require_agent, require_onboarding, require_ready, Ctx};
use crate::db::{agents, analytics, deals, leads, listings, plans, users};
use crate::domain::agent::{OnboardingInput, ProfileTemplate};
use crate::domain::lead::LeadStatus;
use crate::domain::listing::NewListing;
use crate::errors::ServerError;
use crate::responses::{html_response, html_with_status, redirect, xlsx_response, ResultResp};
use crate::spreadsheets::export_leads_xlsx;
use crate::templates::pages::{
    dashboard_page, deals_page, leads_page, listings_page, onboarding_page, profile_settings_page,
    subscribe_page, DashboardVm,
};

/// Days shown in the dashboard views table.
const DASHBOARD_DAYS: i64 = 14;

pub fn onboarding_form(req: &Request, ctx: Ctx) -> ResultResp {
    let (_, agent) = granted!(require_onboarding(req, ctx));

    let input = agent
        .map(|a| OnboardingInput {
            display_name: a.display_name,
            phone: a.phone.unwrap_or_default(),
            city: a.city.unwrap_or_default(),
            area: a.area.unwrap_or_default(),
            experience: a.experience.map(|y| y.to_string()).unwrap_or_default(),
            bio: a.bio.unwrap_or_default(),
            slug: a.slug.unwrap_or_default(),
        })
        .unwrap_or_default();

    html_response(onboarding_page(&input, None))
}

pub fn submit_onboarding(req: Request, ctx: Ctx) -> ResultResp {
    let (identity, _) = granted!(require_onboarding(&req, ctx));
    let form = Form::from_body(req)?;

    let input = OnboardingInput {
        display_name: form.get("display_name").to_string(),
        phone: form.get("phone").to_string(),
        city: form.get("city").to_string(),
        area: form.get("area").to_string(),
        experience: form.get("experience").to_string(),
        bio: form.get("bio").to_string(),
        slug: form.get("slug").to_string(),
    };

    let validated = match input.validate() {
        Ok(v) => v,
        Err(ServerError::BadRequest(msg)) => {
            return html_with_status(400, onboarding_page(&input, Some(msg.as_str())));
        }
        Err(e) => return Err(e),
    };

    let profile = ctx
        .db
        .with_conn(|conn| agents::complete_onboarding(conn, identity.user_id, &validated, ctx.now))?;
    tracing::info!(agent_id = profile.id, slug = ?profile.slug, "onboarding saved");

    redirect("/app")
}

pub fn subscribe(req: &Request, ctx: Ctx) -> ResultResp {
    let agent = granted!(require_agent(req, ctx));
    let plans = ctx.db.with_conn(|conn| plans::list_plans(conn))?;
    html_response(subscribe_page(&agent, &plans, ctx.cfg.bypass_subscription))
}

pub fn dashboard(req: &Request, ctx: Ctx) -> ResultResp {
    let ready = granted!(require_ready(req, ctx));
    let agent_id = ready.agent.id;

    let vm = ctx.db.with_conn(|conn| {
        Ok(DashboardVm {
            views: analytics::view_counts_last_30d(conn, agent_id, ctx.now)?,
            daily: analytics::daily_views(conn, agent_id, ctx.now, DASHBOARD_DAYS)?,
            new_leads: leads::count_new_leads(conn, agent_id)?,
            listing_count: listings::listings_for_agent(conn, agent_id)?.len(),
            eligible_deals: deals::eligible_deals_for_agent(conn, &ready.agent, ctx.now)?.len(),
            is_admin: users::is_user_admin(conn, ready.user_id)?,
            agent: ready.agent.clone(),
        })
    })?;

    html_response(dashboard_page(&vm))
}

pub fn deals(req: &Request, ctx: Ctx) -> ResultResp {
    let ready = granted!(require_ready(req, ctx));

    let (offers, adopted) = ctx.db.with_conn(|conn| {
        let offers = deals::eligible_deals_for_agent(conn, &ready.agent, ctx.now)?;
        let adopted = deals::adopted_deal_ids(conn, ready.agent.id)?;
        Ok((offers, adopted))
    })?;

    html_response(deals_page(&offers, &adopted))
}

pub fn adopt(req: &Request, ctx: Ctx, id: &str) -> ResultResp {
    let ready = granted!(require_ready(req, ctx));
    let deal_id = path_id(id)?;

    let inserted = ctx
        .db
        .with_conn(|conn| deals::adopt_deal(conn, deal_id, &ready.agent, ctx.now))?;
    tracing::info!(deal_id, agent_id = ready.agent.id, inserted, "deal adopted");

    redirect("/deals")
}

pub fn leads(req: &Request, ctx: Ctx) -> ResultResp {
    let ready = granted!(require_ready(req, ctx));
    let rows = ctx
        .db
        .with_conn(|conn| leads::leads_for_agent(conn, ready.agent.id))?;
    html_response(leads_page(&rows))
}

pub fn export_leads(req: &Request, ctx: Ctx) -> ResultResp {
    let ready = granted!(require_ready(req, ctx));
    let rows = ctx
        .db
        .with_conn(|conn| leads::leads_for_agent(conn, ready.agent.id))?;

    let buffer = export_leads_xlsx(&rows)?;
    let filename = format!(
        "leads-{}.xlsx",
        ready.agent.slug.as_deref().unwrap_or("agent")
    );
    xlsx_response(buffer, &filename)
}

pub fn lead_status(req: Request, ctx: Ctx, id: &str) -> ResultResp {
    let ready = granted!(require_ready(&req, ctx));
    let lead_id = path_id(id)?;
    let form = Form::from_body(req)?;

    let status = LeadStatus::parse(form.get("status"))
        .ok_or_else(|| ServerError::BadRequest("unknown lead status".into()))?;

    ctx.db
        .with_conn(|conn| leads::set_lead_status(conn, ready.agent.id, lead_id, status))?;
    redirect("/leads")
}

pub fn listings(req: &Request, ctx: Ctx) -> ResultResp {
    let ready = granted!(require_ready(req, ctx));
    let rows = ctx
        .db
        .with_conn(|conn| listings::listings_for_agent(conn, ready.agent.id))?;
    html_response(listings_page(&rows, None))
}

pub fn create_listing(req: Request, ctx: Ctx) -> ResultResp {
    let ready = granted!(require_ready(&req, ctx));
    let form = Form::from_body(req)?;

    let parsed = NewListing::from_form(
        form.get("title"),
        form.get("city"),
        form.get("area"),
        form.get("price"),
        form.get("bedrooms"),
        form.get("bathrooms"),
        form.get("description"),
    );

    let listing = match parsed {
        Ok(l) => l,
        Err(ServerError::BadRequest(msg)) => {
            let rows = ctx
                .db
                .with_conn(|conn| listings::listings_for_agent(conn, ready.agent.id))?;
            return html_with_status(400, listings_page(&rows, Some(msg.as_str())));
        }
        Err(e) => return Err(e),
    };

    ctx.db
        .with_conn(|conn| listings::create_listing(conn, ready.agent.id, &listing, ctx.now))?;
    redirect("/listings")
}

pub fn delete_listing(req: &Request, ctx: Ctx, id: &str) -> ResultResp {
    let ready = granted!(require_ready(req, ctx));
    let listing_id = path_id(id)?;

    ctx.db
        .with_conn(|conn| listings::delete_listing(conn, ready.agent.id, listing_id))?;
    redirect("/listings")
}

pub fn profile(req: &Request, ctx: Ctx) -> ResultResp {
    let ready = granted!(require_ready(req, ctx));
    html_response(profile_settings_page(&ready.agent))
}

pub fn set_template(req: Request, ctx: Ctx) -> ResultResp {
    let ready = granted!(require_ready(&req, ctx));
    let form = Form::from_body(req)?;
    let template = ProfileTemplate::parse(form.get("template"));

    ctx.db
        .with_conn(|conn| agents::set_template(conn, ready.agent.id, template, ctx.now))?;
    redirect("/profile")
}

use astra::{Request, Response};

use crate::auth::{current_identity, SessionIdentity};
use crate::config::AppConfig;
use crate::db::agents::find_agent_by_user;
use crate::db::flow::resolve_flow_status;
use crate::db::users::is_user_admin;
use crate::db::Database;
use crate::domain::agent::AgentProfile;
use crate::domain::flow::{FlowState, FlowStatus};
use crate::errors::ServerError;
use crate::responses::{html_response, redirect, redirect_clearing_session, ResultResp};
use crate::templates::{self, Viewer};

mod admin;
mod agent;
mod auth;
pub mod forms;
mod public;
mod webhooks;

/// Per-request handles shared by every handler.
#[derive(Clone, Copy)]
pub struct Ctx<'a> {
    pub db: &'a Database,
    pub cfg: &'a AppConfig,
    pub now: i64,
}

pub fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn handle(req: Request, db: &Database, cfg: &AppConfig) -> ResultResp {
    let ctx = Ctx {
        db,
        cfg,
        now: now_unix(),
    };

    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    tracing::debug!(%method, %path, "request");

    match (method.as_str(), segments.as_slice()) {
        ("GET", []) => home(&req, ctx),
        ("GET", ["app"]) => app_entry(&req, ctx),

        ("GET", ["login"]) => auth::login(&req),
        ("POST", ["auth", "request-link"]) => auth::request_link(req, ctx),
        ("GET", ["auth", "magic"]) => auth::redeem(&req, ctx),
        ("POST", ["logout"]) => auth::logout(&req, ctx),

        ("GET", ["onboarding"]) => agent::onboarding_form(&req, ctx),
        ("POST", ["onboarding"]) => agent::submit_onboarding(req, ctx),
        ("GET", ["subscribe"]) => agent::subscribe(&req, ctx),
        ("GET", ["dashboard"]) => agent::dashboard(&req, ctx),
        ("GET", ["deals"]) => agent::deals(&req, ctx),
        ("POST", ["deals", id, "adopt"]) => agent::adopt(&req, ctx, id),
        ("GET", ["leads"]) => agent::leads(&req, ctx),
        ("GET", ["leads", "export"]) => agent::export_leads(&req, ctx),
        ("POST", ["leads", id, "status"]) => agent::lead_status(req, ctx, id),
        ("GET", ["listings"]) => agent::listings(&req, ctx),
        ("POST", ["listings"]) => agent::create_listing(req, ctx),
        ("POST", ["listings", id, "delete"]) => agent::delete_listing(&req, ctx, id),
        ("GET", ["profile"]) => agent::profile(&req, ctx),
        ("POST", ["profile", "template"]) => agent::set_template(req, ctx),

        ("GET", ["a", slug]) => public::profile(ctx, slug, &path),
        ("GET", ["a", slug, "p", id]) => public::property(ctx, slug, id, &path),
        ("POST", ["a", slug, "contact"]) => public::contact(req, ctx, slug),

        ("GET", ["admin"]) => admin::index(&req, ctx),
        ("POST", ["admin", "deals"]) => admin::create_deal(req, ctx),
        ("POST", ["admin", "deals", id, "status"]) => admin::deal_status(req, ctx, id),
        ("GET", ["admin", "deals", id, "preview"]) => admin::deal_preview(&req, ctx, id),
        ("POST", ["admin", "agents", id, "subscription"]) => admin::agent_subscription(req, ctx, id),

        ("POST", ["webhooks", "payment"]) => webhooks::payment(req, ctx),

        _ => Err(ServerError::NotFound),
    }
}

fn home(req: &Request, ctx: Ctx) -> ResultResp {
    let identity = current_identity(req, ctx.db, ctx.now)?;
    let viewer = Viewer {
        signed_in: identity.is_some(),
        is_admin: false,
    };
    html_response(templates::pages::home_page(viewer))
}

/// Post-sign-in entry point: sends the visitor wherever the flow says.
fn app_entry(req: &Request, ctx: Ctx) -> ResultResp {
    let (_, status) = flow_for(req, ctx)?;
    flow_redirect(&status)
}

/// Whether a guarded handler may run, or the response to send instead.
pub(crate) enum Access<T> {
    Granted(T),
    Denied(Response),
}

/// Unwrap an `Access`, returning the denial response from the handler.
macro_rules! granted {
    ($access:expr) => {
        match $access? {
            $crate::router::Access::Granted(v) => v,
            $crate::router::Access::Denied(resp) => return Ok(resp),
        }
    };
}
pub(crate) use granted;

fn flow_for(req: &Request, ctx: Ctx) -> Result<(Option<SessionIdentity>, FlowStatus), ServerError> {
    let identity = current_identity(req, ctx.db, ctx.now)?;
    let status = ctx
        .db
        .with_conn(|conn| resolve_flow_status(conn, identity, ctx.cfg.bypass_subscription))?;
    Ok((identity, status))
}

/// Redirect to the evaluator's target. A rejected session also loses its cookie.
pub(crate) fn flow_redirect(status: &FlowStatus) -> ResultResp {
    match status.state {
        FlowState::Unauthenticated { reason: Some(_) } => redirect_clearing_session(&status.redirect),
        _ => redirect(&status.redirect),
    }
}

/// A signed-in agent whose flow state is `Ready`.
pub(crate) struct ReadyAgent {
    pub user_id: i64,
    pub agent: AgentProfile,
}

pub(crate) fn require_ready(req: &Request, ctx: Ctx) -> Result<Access<ReadyAgent>, ServerError> {
    let (identity, status) = flow_for(req, ctx)?;
    let Some(identity) = identity.filter(|_| status.is_ready()) else {
        return Ok(Access::Denied(flow_redirect(&status)?));
    };

    let agent = ctx
        .db
        .with_conn(|conn| find_agent_by_user(conn, identity.user_id))?
        .ok_or(ServerError::InternalError)?;

    Ok(Access::Granted(ReadyAgent {
        user_id: identity.user_id,
        agent,
    }))
}

/// The onboarding form is open to agents still onboarding and to ready agents.
pub(crate) fn require_onboarding(
    req: &Request,
    ctx: Ctx,
) -> Result<Access<(SessionIdentity, Option<AgentProfile>)>, ServerError> {
    let (identity, status) = flow_for(req, ctx)?;
    let allowed = matches!(status.state, FlowState::NeedsOnboarding | FlowState::Ready);

    match identity {
        Some(identity) if allowed => {
            let agent = ctx
                .db
                .with_conn(|conn| find_agent_by_user(conn, identity.user_id))?;
            Ok(Access::Granted((identity, agent)))
        }
        _ => Ok(Access::Denied(flow_redirect(&status)?)),
    }
}

/// Any signed-in user who already has an agent profile.
pub(crate) fn require_agent(req: &Request, ctx: Ctx) -> Result<Access<AgentProfile>, ServerError> {
    let (identity, status) = flow_for(req, ctx)?;
    let agent = match identity {
        Some(identity) if status.agent.is_some() => ctx
            .db
            .with_conn(|conn| find_agent_by_user(conn, identity.user_id))?,
        _ => None,
    };

    match agent {
        Some(agent) => Ok(Access::Granted(agent)),
        None => Ok(Access::Denied(flow_redirect(&status)?)),
    }
}

/// Admins only. Anonymous or expired sessions go to sign-in, others get 403.
pub(crate) fn require_admin(req: &Request, ctx: Ctx) -> Result<Access<i64>, ServerError> {
    let identity = current_identity(req, ctx.db, ctx.now)?;
    let Some(identity) = identity else {
        return Ok(Access::Denied(redirect("/login")?));
    };

    let (exists, is_admin) = ctx.db.with_conn(|conn| {
        let exists = crate::db::users::user_exists(conn, identity.user_id)?;
        Ok((exists, exists && is_user_admin(conn, identity.user_id)?))
    })?;

    if !exists {
        let status = ctx.db.with_conn(|conn| {
            resolve_flow_status(conn, Some(identity), ctx.cfg.bypass_subscription)
        })?;
        return Ok(Access::Denied(flow_redirect(&status)?));
    }
    if !is_admin {
        tracing::warn!(user_id = identity.user_id, "non-admin tried the back-office");
        return Err(ServerError::Forbidden);
    }
    Ok(Access::Granted(identity.user_id))
}

/// htmx marks its requests; those get fragments instead of full pages.
pub(crate) fn is_htmx(req: &Request) -> bool {
    req.headers().contains_key("HX-Request")
}

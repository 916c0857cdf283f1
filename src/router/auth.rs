// src/router/auth.rs
use astra::Request;
use maud::html;

use super::forms::Form;
use super::{is_htmx, Ctx};
use crate::auth::sessions::revoke_session;
use crate::auth::session_token_from_request;
use crate::db::magic_auth::{request_magic_link, sign_in_with_magic_link};
use crate::domain::flow::UnauthReason;
use crate::errors::ServerError;
use crate::mailer::BrevoMailer;
use crate::responses::{html_response, html_with_status, redirect_clearing_session, redirect_with_session, ResultResp};
use crate::templates::components::flash_error;
use crate::templates::pages::{check_email_content, check_email_page, login_page};

pub fn login(req: &Request) -> ResultResp {
    let query = Form::from_query(req);
    let reason = query.opt("error").and_then(UnauthReason::from_code);
    html_response(login_page(reason.map(UnauthReason::message)))
}

pub fn request_link(req: Request, ctx: Ctx) -> ResultResp {
    let htmx = is_htmx(&req);
    let form = Form::from_body(req)?;

    let issued = match request_magic_link(ctx.db, form.get("email"), ctx.now) {
        Ok(issued) => issued,
        Err(ServerError::BadRequest(msg)) if htmx => {
            return html_response(html! { (flash_error(Some(msg.as_str()))) });
        }
        Err(ServerError::BadRequest(msg)) => {
            return html_with_status(400, login_page(Some(msg.as_str())));
        }
        Err(e) => return Err(e),
    };

    let link = format!("{}{}", ctx.cfg.public_base_url, issued.link);
    match &ctx.cfg.mail {
        Some(mail_cfg) => {
            BrevoMailer::new(mail_cfg)
                .and_then(|mailer| mailer.send_magic_link(&issued.email, &link))
                .map_err(|e| ServerError::MailError(e.to_string()))?;
            tracing::info!(user_id = issued.user_id, "magic link sent");
        }
        None => {
            tracing::info!(email = %issued.email, %link, "mail not configured, magic link logged");
        }
    }

    let valid_for_mins = (issued.expires_at - ctx.now).max(0) / 60;
    if htmx {
        html_response(check_email_content(&issued.email, valid_for_mins))
    } else {
        html_response(check_email_page(&issued.email, valid_for_mins))
    }
}

pub fn redeem(req: &Request, ctx: Ctx) -> ResultResp {
    let query = Form::from_query(req);
    let token = query
        .opt("token")
        .ok_or_else(|| ServerError::BadRequest("missing token".into()))?;

    let signed_in = sign_in_with_magic_link(ctx.db, ctx.cfg, token, ctx.now)?;
    redirect_with_session("/app", &signed_in.session_token)
}

pub fn logout(req: &Request, ctx: Ctx) -> ResultResp {
    if let Some(token) = session_token_from_request(req) {
        ctx.db
            .with_conn(|conn| revoke_session(conn, &token, ctx.now))?;
    }
    redirect_clearing_session("/")
}

use crate::auth::magic::{IssuedMagicLink, MagicLinkConfig, MagicLinkService};
use crate::auth::sessions::create_session;
use crate::config::AppConfig;
use crate::db::auth::touch_last_login;
use crate::db::connection::Database;
use crate::db::users::set_admin;
use crate::errors::ServerError;
use rusqlite::{Connection, TransactionBehavior};

/// Result of a successful sign-in: the session token goes into the cookie.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user_id: i64,
    pub email: String,
    pub session_token: String,
}

/// Request a magic link: creates the user on first use and inserts the link.
/// Returns the issued link (raw token included so caller can email/log).
pub fn request_magic_link(
    db: &Database,
    email: &str,
    now: i64,
) -> Result<IssuedMagicLink, ServerError> {
    let svc = MagicLinkService::new(MagicLinkConfig::default());
    db.with_conn(|conn| svc.request_link(conn, email, now))
}

/// Redeem a magic link (single-use), record the login, apply configured admin
/// promotion and open a session.
pub fn sign_in_with_magic_link(
    db: &Database,
    cfg: &AppConfig,
    token: &str,
    now: i64,
) -> Result<SignedIn, ServerError> {
    db.with_conn(|conn| redeem_and_open_session(conn, cfg, token, now))
}

/// All of sign-in commits together: if any step fails the link stays unused.
fn redeem_and_open_session(
    conn: &mut Connection,
    cfg: &AppConfig,
    token: &str,
    now: i64,
) -> Result<SignedIn, ServerError> {
    let svc = MagicLinkService::new(MagicLinkConfig::default());

    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

    let redeemed = svc.redeem(&tx, token, now)?;
    touch_last_login(&tx, redeemed.user_id, now)?;

    if cfg.is_admin_email(&redeemed.email) {
        set_admin(&tx, redeemed.user_id, true)?;
    }

    let session_token = create_session(&tx, redeemed.user_id, now)?;

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;

    tracing::info!(user_id = redeemed.user_id, "signed in");
    Ok(SignedIn {
        user_id: redeemed.user_id,
        email: redeemed.email,
        session_token,
    })
}

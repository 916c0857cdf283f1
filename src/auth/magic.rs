// src/auth/magic.rs
use crate::errors::ServerError;
use rusqlite::Connection;

use crate::auth::token::{hash_token, new_token};
use crate::db::auth as db_auth;

#[derive(Debug, Clone)]
pub struct MagicLinkConfig {
    /// TTL for magic links in seconds.
    pub ttl_secs: i64,
    /// Relative path used when building links.
    pub magic_path: String,
}

impl Default for MagicLinkConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 15 * 60,
            magic_path: "/auth/magic".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IssuedMagicLink {
    pub email: String,
    pub user_id: i64,
    /// Raw token (never store this in DB).
    pub token: String,
    pub expires_at: i64,
    /// Relative URL like "/auth/magic?token=..."
    pub link: String,
}

#[derive(Debug, Clone)]
pub struct RedeemedMagicLink {
    pub user_id: i64,
    pub email: String,
}

pub struct MagicLinkService {
    cfg: MagicLinkConfig,
}

impl MagicLinkService {
    pub fn new(cfg: MagicLinkConfig) -> Self {
        Self { cfg }
    }

    /// Trim + lowercase, minimal sanity check.
    pub fn normalize_email(email: &str) -> Result<String, ServerError> {
        let e = email.trim().to_lowercase();
        if e.is_empty() || !e.contains('@') || e.starts_with('@') || e.ends_with('@') {
            return Err(ServerError::BadRequest("invalid email".into()));
        }
        Ok(e)
    }

    /// Sign-up and sign-in share this path: the user row is created on first
    /// request. Agent profiles are created later, by onboarding.
    pub fn request_link(
        &self,
        conn: &Connection,
        email: &str,
        now: i64,
    ) -> Result<IssuedMagicLink, ServerError> {
        let email = Self::normalize_email(email)?;
        let user_id = db_auth::get_or_create_user(conn, &email, now)?;

        let token = new_token();
        let expires_at = now + self.cfg.ttl_secs;
        db_auth::insert_magic_link(conn, user_id, &hash_token(&token), now, expires_at)?;

        let link = format!("{}?token={}", self.cfg.magic_path, token);
        Ok(IssuedMagicLink {
            email,
            user_id,
            token,
            expires_at,
            link,
        })
    }

    /// Marks the link used. Run inside the sign-in transaction.
    pub fn redeem(
        &self,
        conn: &Connection,
        token: &str,
        now: i64,
    ) -> Result<RedeemedMagicLink, ServerError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ServerError::BadRequest("missing token".into()));
        }

        let Some(user_id) = db_auth::consume_magic_link(conn, &hash_token(token), now)? else {
            return Err(ServerError::Unauthorized("invalid or expired link".into()));
        };

        let email: String = conn
            .query_row(
                "select email from users where id = ?",
                rusqlite::params![user_id],
                |r| r.get(0),
            )
            .map_err(|e| ServerError::DbError(format!("select user email failed: {e}")))?;

        Ok(RedeemedMagicLink { user_id, email })
    }
}

// src/config.rs
use std::collections::HashSet;
use std::net::SocketAddr;

use crate::errors::ServerError;

/// Runtime settings, read once in `main` and passed down explicitly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: String,
    pub schema_path: String,
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    /// Treat every agent as subscribed (non-production or operator override).
    pub bypass_subscription: bool,
    pub public_base_url: String,
    pub mail: Option<MailConfig>,
    /// Shared secret expected on the payment gateway callback.
    pub payment_webhook_secret: Option<String>,
    /// Lowercased e-mails promoted to admin on sign-in.
    pub admin_emails: HashSet<String>,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_key: String,
    pub sender_email: String,
    pub sender_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: "agent_sites.sqlite3".to_string(),
            schema_path: "sql/schema.sql".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_workers: 8,
            bypass_subscription: false,
            public_base_url: "http://127.0.0.1:3000".to_string(),
            mail: None,
            payment_webhook_secret: None,
            admin_emails: HashSet::new(),
        }
    }
}

impl AppConfig {
    /// Load from the process environment (after `.env`, if present).
    pub fn from_env() -> Result<Self, ServerError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup so tests never touch the real environment.
    pub fn from_lookup<F>(get: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_addr = match get("BIND_ADDR") {
            Some(raw) => raw
                .parse()
                .map_err(|e| ServerError::ConfigError(format!("invalid BIND_ADDR {raw:?}: {e}")))?,
            None => defaults.bind_addr,
        };

        let max_workers = match get("MAX_WORKERS") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ServerError::ConfigError(format!("invalid MAX_WORKERS {raw:?}")))?,
            None => defaults.max_workers,
        };

        let app_env = get("APP_ENV").unwrap_or_else(|| "development".to_string());
        let forced_bypass = get("BYPASS_SUBSCRIPTION")
            .map(|v| is_truthy(&v))
            .unwrap_or(false);
        let bypass_subscription = app_env != "production" || forced_bypass;

        let mail = get("BREVO_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .map(|api_key| MailConfig {
                api_key,
                sender_email: get("MAIL_SENDER_EMAIL")
                    .unwrap_or_else(|| "no-reply@agent-sites.local".to_string()),
                sender_name: get("MAIL_SENDER_NAME").unwrap_or_else(|| "Agent Sites".to_string()),
            });

        let admin_emails = get("ADMIN_EMAILS")
            .map(|raw| {
                raw.split(',')
                    .map(|e| e.trim().to_lowercase())
                    .filter(|e| !e.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_path: get("DATABASE_PATH").unwrap_or(defaults.database_path),
            schema_path: get("SCHEMA_PATH").unwrap_or(defaults.schema_path),
            bind_addr,
            max_workers,
            bypass_subscription,
            public_base_url: get("PUBLIC_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.public_base_url),
            mail,
            payment_webhook_secret: get("PAYMENT_WEBHOOK_SECRET").filter(|s| !s.is_empty()),
            admin_emails,
        })
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails.contains(&email.to_lowercase())
    }
}

fn is_truthy(v: &str) -> bool {
    matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

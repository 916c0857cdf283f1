use crate::config::AppConfig;
use crate::db::connection::{init_db, Database};
use crate::responses::error_to_response;
use crate::router::handle;
use astra::Server;
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod mailer;
mod responses;
mod router;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() {
    init_tracing();

    let cfg = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let db = Database::new(cfg.database_path.clone());

    // Apply schema.sql; it is idempotent.
    if let Err(e) = init_db(&db, &cfg.schema_path) {
        tracing::error!(error = %e, "database initialization failed");
        std::process::exit(1);
    }

    if cfg.bypass_subscription {
        tracing::warn!("subscription checks are bypassed");
    }
    if cfg.mail.is_none() {
        tracing::warn!("BREVO_API_KEY not set, magic links will only be logged");
    }

    let addr = cfg.bind_addr;
    tracing::info!(%addr, workers = cfg.max_workers, "starting server");

    let server = Server::bind(&addr).max_workers(cfg.max_workers);

    let result = server.serve(move |req, _info| match handle(req, &db, &cfg) {
        Ok(resp) => resp,
        Err(err) => error_to_response(err),
    });

    if let Err(e) = result {
        tracing::error!(error = %e, "server ended with error");
    }

    tracing::info!("server shut down");
}

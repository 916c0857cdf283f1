use std::collections::HashSet;
use std::io::Read;
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use astra::{Body, Request, Response};
use http::Method;

use crate::config::AppConfig;
use crate::db::connection::{init_db, Database};
use crate::db::magic_auth::{request_magic_link, sign_in_with_magic_link, SignedIn};
use crate::db::{agents, analytics};
use crate::domain::agent::{AgentProfile, OnboardingForm};
use crate::domain::analytics::ViewKind;

pub const WEBHOOK_SECRET: &str = "test-webhook-secret";
pub const ADMIN_EMAIL: &str = "admin@example.com";

static DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Fresh on-disk database for one test; the file is removed on drop.
pub struct TestDb {
    db: Database,
    path: PathBuf,
}

impl Deref for TestDb {
    type Target = Database;

    fn deref(&self) -> &Database {
        &self.db
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Built from the production schema.
pub fn init_test_db() -> TestDb {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let n = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
    let path = std::env::temp_dir().join(format!("agent_sites_test_{nanos}_{n}.sqlite"));

    let db = Database::new(path.to_string_lossy().into_owned());
    init_db(&db, "sql/schema.sql").unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    TestDb { db, path }
}

/// Production-like config: subscriptions enforced, webhook secret set.
pub fn test_config() -> AppConfig {
    AppConfig {
        bypass_subscription: false,
        payment_webhook_secret: Some(WEBHOOK_SECRET.to_string()),
        admin_emails: HashSet::from([ADMIN_EMAIL.to_string()]),
        ..AppConfig::default()
    }
}

pub fn sign_in(db: &Database, cfg: &AppConfig, email: &str) -> SignedIn {
    let issued = request_magic_link(db, email, now_unix()).unwrap();
    sign_in_with_magic_link(db, cfg, &issued.token, now_unix()).unwrap()
}

pub fn onboard(db: &Database, user_id: i64, name: &str, city: &str, area: Option<&str>) -> AgentProfile {
    let form = OnboardingForm {
        display_name: name.into(),
        phone: "9876543210".into(),
        city: city.into(),
        area: area.map(Into::into),
        experience: 5,
        bio: None,
        slug_base: crate::domain::agent::slugify(name),
    };
    db.with_conn(|conn| agents::complete_onboarding(conn, user_id, &form, now_unix()))
        .unwrap()
}

pub fn subscribe(db: &Database, agent_id: i64) {
    db.with_conn(|conn| agents::set_subscription(conn, agent_id, true, Some("monthly"), now_unix()))
        .unwrap();
}

/// Signed-in, onboarded and subscribed agent.
pub fn ready_agent(
    db: &Database,
    cfg: &AppConfig,
    email: &str,
    name: &str,
    city: &str,
) -> (SignedIn, AgentProfile) {
    let user = sign_in(db, cfg, email);
    let agent = onboard(db, user.user_id, name, city, None);
    subscribe(db, agent.id);
    (user, agent)
}

pub fn add_views(db: &Database, agent_id: i64, kind: ViewKind, n: usize) {
    db.with_conn(|conn| {
        for _ in 0..n {
            analytics::record_view(conn, agent_id, kind, "/seed", now_unix())?;
        }
        Ok(())
    })
    .unwrap();
}

pub fn get(uri: &str, session: Option<&str>) -> Request {
    let mut builder = http::Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = session {
        builder = builder.header("Cookie", format!("session={token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, body: &str, session: Option<&str>) -> Request {
    let mut builder = http::Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded");
    if let Some(token) = session {
        builder = builder.header("Cookie", format!("session={token}"));
    }
    builder.body(Body::from(body.as_bytes().to_vec())).unwrap()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn location(resp: &Response) -> &str {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

#[test]
fn test_db_file_is_removed_on_drop() {
    let db = init_test_db();
    let path = PathBuf::from(db.path());
    assert!(path.exists());
    drop(db);
    assert!(!path.exists());
}

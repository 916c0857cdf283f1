use astra::Body;
use http::{Method, Request};

use crate::config::AppConfig;
use crate::db::agents::find_agent;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{init_test_db, onboard, sign_in, test_config, WEBHOOK_SECRET};

fn webhook(body: &str, secret: Option<&str>) -> astra::Request {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/webhooks/payment")
        .header("Content-Type", "application/x-www-form-urlencoded");
    if let Some(secret) = secret {
        builder = builder.header("X-Webhook-Secret", secret);
    }
    builder.body(Body::from(body.as_bytes().to_vec())).unwrap()
}

fn subscribed(db: &crate::db::Database, agent_id: i64) -> (bool, Option<String>) {
    let agent = db.with_conn(|conn| find_agent(conn, agent_id)).unwrap().unwrap();
    (agent.is_subscribed, agent.subscribed_plan)
}

#[test]
fn rejects_missing_or_wrong_secret() {
    let db = init_test_db();
    let cfg = test_config();
    let body = "agent_id=1&plan_code=monthly&status=active";

    assert!(matches!(handle(webhook(body, None), &db, &cfg), Err(ServerError::Unauthorized(_))));
    assert!(matches!(
        handle(webhook(body, Some("guess")), &db, &cfg),
        Err(ServerError::Unauthorized(_))
    ));

    let prefix = &WEBHOOK_SECRET[..WEBHOOK_SECRET.len() - 1];
    let extended = format!("{WEBHOOK_SECRET}x");
    for near_miss in [prefix, extended.as_str()] {
        assert!(matches!(
            handle(webhook(body, Some(near_miss)), &db, &cfg),
            Err(ServerError::Unauthorized(_))
        ));
    }
}

#[test]
fn disabled_without_configured_secret() {
    let db = init_test_db();
    let cfg = AppConfig {
        payment_webhook_secret: None,
        ..test_config()
    };
    let res = handle(webhook("agent_id=1", Some(WEBHOOK_SECRET)), &db, &cfg);
    assert!(matches!(res, Err(ServerError::NotFound)));
}

#[test]
fn activates_and_cancels_subscription() {
    let db = init_test_db();
    let cfg = test_config();
    let user = sign_in(&db, &cfg, "pay@example.com");
    let agent = onboard(&db, user.user_id, "Paying Agent", "Pune", None);
    assert_eq!(subscribed(&db, agent.id), (false, None));

    let body = format!("agent_id={}&plan_code=yearly&status=active", agent.id);
    let resp = handle(webhook(&body, Some(WEBHOOK_SECRET)), &db, &cfg).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(subscribed(&db, agent.id), (true, Some("yearly".to_string())));

    let body = format!("agent_id={}&plan_code=yearly&status=cancelled", agent.id);
    handle(webhook(&body, Some(WEBHOOK_SECRET)), &db, &cfg).unwrap();
    assert_eq!(subscribed(&db, agent.id), (false, None));
}

#[test]
fn unknown_plan_agent_or_status_are_rejected() {
    let db = init_test_db();
    let cfg = test_config();
    let user = sign_in(&db, &cfg, "odd@example.com");
    let agent = onboard(&db, user.user_id, "Odd Agent", "Pune", None);

    let body = format!("agent_id={}&plan_code=lifetime&status=active", agent.id);
    assert!(matches!(
        handle(webhook(&body, Some(WEBHOOK_SECRET)), &db, &cfg),
        Err(ServerError::BadRequest(_))
    ));

    let body = format!("agent_id={}&plan_code=monthly&status=refunded", agent.id);
    assert!(matches!(
        handle(webhook(&body, Some(WEBHOOK_SECRET)), &db, &cfg),
        Err(ServerError::BadRequest(_))
    ));

    assert!(matches!(
        handle(webhook("agent_id=9999&plan_code=monthly&status=active", Some(WEBHOOK_SECRET)), &db, &cfg),
        Err(ServerError::NotFound)
    ));
    assert_eq!(subscribed(&db, agent.id), (false, None));
}

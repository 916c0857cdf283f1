use crate::config::AppConfig;
use crate::router::handle;
use crate::tests::utils::{
    body_string, get, init_test_db, location, onboard, post_form, ready_agent, sign_in, test_config,
};

#[test]
fn anonymous_visitors_are_sent_to_login() {
    let db = init_test_db();
    let cfg = test_config();

    for path in ["/app", "/dashboard", "/deals", "/leads", "/listings", "/profile", "/onboarding"] {
        let resp = handle(get(path, None), &db, &cfg).unwrap();
        assert_eq!(resp.status(), 302, "{path}");
        assert_eq!(location(&resp), "/login", "{path}");
    }
}

#[test]
fn new_user_goes_to_onboarding_before_the_paywall() {
    let db = init_test_db();
    let cfg = test_config();
    let user = sign_in(&db, &cfg, "new@example.com");

    let resp = handle(get("/app", Some(&user.session_token)), &db, &cfg).unwrap();
    assert_eq!(location(&resp), "/onboarding");

    // No profile yet, so there is nothing to subscribe.
    let resp = handle(get("/subscribe", Some(&user.session_token)), &db, &cfg).unwrap();
    assert_eq!(location(&resp), "/onboarding");

    let resp = handle(get("/onboarding", Some(&user.session_token)), &db, &cfg).unwrap();
    assert_eq!(resp.status(), 200);
}

#[test]
fn onboarding_then_subscription_then_dashboard() {
    let db = init_test_db();
    let cfg = test_config();
    let user = sign_in(&db, &cfg, "flow@example.com");
    let token = Some(user.session_token.as_str());

    let body = "display_name=Asha+Rao&phone=9876543210&city=Hyderabad&area=Madhapur&experience=4&bio=&slug=";
    let resp = handle(post_form("/onboarding", body, token), &db, &cfg).unwrap();
    assert_eq!(location(&resp), "/app");

    let resp = handle(get("/app", token), &db, &cfg).unwrap();
    assert_eq!(location(&resp), "/subscribe");

    let resp = handle(get("/dashboard", token), &db, &cfg).unwrap();
    assert_eq!(location(&resp), "/subscribe");

    let resp = handle(get("/subscribe", token), &db, &cfg).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("Monthly"));

    let agent = db
        .with_conn(|conn| crate::db::agents::find_agent_by_user(conn, user.user_id))
        .unwrap()
        .unwrap();
    assert_eq!(agent.slug.as_deref(), Some("asha-rao"));
    crate::tests::utils::subscribe(&db, agent.id);

    let resp = handle(get("/app", token), &db, &cfg).unwrap();
    assert_eq!(location(&resp), "/dashboard");

    let resp = handle(get("/dashboard", token), &db, &cfg).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("Welcome back, Asha Rao"));
}

#[test]
fn invalid_onboarding_rerenders_with_message() {
    let db = init_test_db();
    let cfg = test_config();
    let user = sign_in(&db, &cfg, "typo@example.com");

    let body = "display_name=Asha&phone=9876543210&city=Hyderabad&experience=200";
    let resp = handle(post_form("/onboarding", body, Some(&user.session_token)), &db, &cfg).unwrap();
    assert_eq!(resp.status(), 400);

    let html = body_string(resp);
    assert!(html.contains("Experience must be"));
    // Entered values survive the round trip.
    assert!(html.contains("value=\"Hyderabad\""));
}

#[test]
fn bypass_mode_skips_the_paywall() {
    let db = init_test_db();
    let cfg = AppConfig {
        bypass_subscription: true,
        ..test_config()
    };
    let user = sign_in(&db, &cfg, "dev@example.com");
    onboard(&db, user.user_id, "Dev Agent", "Pune", None);

    let resp = handle(get("/app", Some(&user.session_token)), &db, &cfg).unwrap();
    assert_eq!(location(&resp), "/dashboard");
}

#[test]
fn orphaned_session_is_reported_as_expired() {
    let db = init_test_db();
    let cfg = test_config();
    let user = sign_in(&db, &cfg, "gone@example.com");

    db.with_conn(|conn| {
        conn.execute("delete from users where id = ?", [user.user_id])
            .map_err(|e| crate::errors::ServerError::DbError(e.to_string()))
    })
    .unwrap();

    let resp = handle(get("/dashboard", Some(&user.session_token)), &db, &cfg).unwrap();
    assert_eq!(location(&resp), "/login?error=session_expired");
    let cookie = resp.headers().get("Set-Cookie").unwrap().to_str().unwrap();
    assert!(cookie.contains("Max-Age=0"));
}

#[test]
fn orphaned_session_does_not_carry_over_to_the_next_sign_up() {
    let db = init_test_db();
    let cfg = test_config();
    let gone = sign_in(&db, &cfg, "gone@example.com");

    db.with_conn(|conn| {
        conn.execute("delete from users where id = ?", [gone.user_id])
            .map_err(|e| crate::errors::ServerError::DbError(e.to_string()))
    })
    .unwrap();

    let next = sign_in(&db, &cfg, "next@example.com");
    assert_ne!(next.user_id, gone.user_id);

    let resp = handle(get("/onboarding", Some(&gone.session_token)), &db, &cfg).unwrap();
    assert_eq!(location(&resp), "/login?error=session_expired");

    let resp = handle(get("/onboarding", Some(&next.session_token)), &db, &cfg).unwrap();
    assert_eq!(resp.status(), 200);
}

#[test]
fn ready_agent_can_reopen_onboarding_but_not_skip_guards() {
    let db = init_test_db();
    let cfg = test_config();
    let (user, _) = ready_agent(&db, &cfg, "ready@example.com", "Ready Agent", "Pune");
    let token = Some(user.session_token.as_str());

    let resp = handle(get("/onboarding", token), &db, &cfg).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("value=\"Ready Agent\""));

    for path in ["/dashboard", "/deals", "/leads", "/listings", "/profile"] {
        let resp = handle(get(path, token), &db, &cfg).unwrap();
        assert_eq!(resp.status(), 200, "{path}");
    }
}

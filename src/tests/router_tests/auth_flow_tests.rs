use crate::db::magic_auth::request_magic_link;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, get, init_test_db, location, now_unix, post_form, test_config};
use astra::Body;
use http::{Method, Request};

#[test]
fn login_page_loads_successfully() {
    let db = init_test_db();
    let cfg = test_config();

    let resp = handle(get("/login", None), &db, &cfg).expect("Failed to handle request");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Sign in"));
    assert!(body.contains("form"));
}

#[test]
fn login_page_explains_expired_session() {
    let db = init_test_db();
    let cfg = test_config();

    let resp = handle(get("/login?error=session_expired", None), &db, &cfg).unwrap();
    let body = body_string(resp);
    assert!(body.contains("Your session has expired"));
}

#[test]
fn request_link_returns_partial_html_for_htmx() {
    let db = init_test_db();
    let cfg = test_config();
    let email = "test@example.com";

    let req = Request::builder()
        .method(Method::POST)
        .uri("/auth/request-link")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .header("HX-Request", "true")
        .body(Body::from(format!("email={email}").into_bytes()))
        .unwrap();

    let resp = handle(req, &db, &cfg).expect("Failed to handle request");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Check your inbox"));
    assert!(body.contains(email));

    // A fragment, so htmx can swap it in place.
    assert!(!body.contains("<!DOCTYPE html>"));
    assert!(!body.contains("<html"));
}

#[test]
fn request_link_without_htmx_renders_full_page() {
    let db = init_test_db();
    let cfg = test_config();

    let resp = handle(post_form("/auth/request-link", "email=full%40example.com", None), &db, &cfg).unwrap();
    let body = body_string(resp);
    assert!(body.contains("<!DOCTYPE html>"));
    assert!(body.contains("full@example.com"));
}

#[test]
fn request_link_rejects_invalid_email() {
    let db = init_test_db();
    let cfg = test_config();

    let resp = handle(post_form("/auth/request-link", "email=nope", None), &db, &cfg).unwrap();
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("invalid email"));
}

#[test]
fn magic_link_signs_in_once() {
    let db = init_test_db();
    let cfg = test_config();

    let issued = request_magic_link(&db, "once@example.com", now_unix()).unwrap();
    assert!(issued.link.starts_with("/auth/magic?token="));

    let resp = handle(get(&issued.link, None), &db, &cfg).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/app");

    let cookie = resp
        .headers()
        .get("Set-Cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));

    // Single use.
    match handle(get(&issued.link, None), &db, &cfg) {
        Err(ServerError::Unauthorized(_)) => {}
        other => panic!("expected Unauthorized, got: {:?}", other.map(|r| r.status())),
    }
}

#[test]
fn logout_revokes_the_session() {
    let db = init_test_db();
    let cfg = test_config();
    let user = crate::tests::utils::sign_in(&db, &cfg, "bye@example.com");

    let resp = handle(post_form("/logout", "", Some(&user.session_token)), &db, &cfg).unwrap();
    assert_eq!(location(&resp), "/");

    // The old cookie no longer identifies anyone.
    let resp = handle(get("/app", Some(&user.session_token)), &db, &cfg).unwrap();
    assert_eq!(location(&resp), "/login");
}

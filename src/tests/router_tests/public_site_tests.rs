use crate::config::AppConfig;
use crate::db::{analytics, leads, listings};
use crate::domain::listing::NewListing;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{
    body_string, get, init_test_db, now_unix, onboard, post_form, ready_agent, sign_in, test_config,
};

#[test]
fn profile_visit_counts_toward_thirty_day_views() {
    let db = init_test_db();
    let cfg = test_config();
    let (_, agent) = ready_agent(&db, &cfg, "pub@example.com", "Asha Rao", "Hyderabad");

    for _ in 0..3 {
        let resp = handle(get("/a/asha-rao", None), &db, &cfg).unwrap();
        assert_eq!(resp.status(), 200);
        assert!(body_string(resp).contains("Asha Rao"));
    }

    let counts = db
        .with_conn(|conn| analytics::view_counts_last_30d(conn, agent.id, now_unix()))
        .unwrap();
    assert_eq!(counts.profile_views_30d, 3);
    assert_eq!(counts.page_views_30d, 0);
}

#[test]
fn property_page_counts_as_page_view() {
    let db = init_test_db();
    let cfg = test_config();
    let (_, agent) = ready_agent(&db, &cfg, "prop@example.com", "Ravi Kumar", "Pune");

    let listing = NewListing::from_form("3BHK in Baner", "Pune", "Baner", "9500000", "3", "2", "").unwrap();
    let listing_id = db
        .with_conn(|conn| listings::create_listing(conn, agent.id, &listing, now_unix()))
        .unwrap();

    let resp = handle(get(&format!("/a/ravi-kumar/p/{listing_id}"), None), &db, &cfg).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("3BHK in Baner"));

    let counts = db
        .with_conn(|conn| analytics::view_counts_last_30d(conn, agent.id, now_unix()))
        .unwrap();
    assert_eq!(counts.page_views_30d, 1);
    assert_eq!(counts.profile_views_30d, 0);

    assert!(matches!(
        handle(get("/a/ravi-kumar/p/99999", None), &db, &cfg),
        Err(ServerError::NotFound)
    ));
}

#[test]
fn unknown_or_unsubscribed_profiles_are_hidden() {
    let db = init_test_db();
    let cfg = test_config();
    let user = sign_in(&db, &cfg, "hidden@example.com");
    onboard(&db, user.user_id, "Hidden Agent", "Pune", None);

    assert!(matches!(handle(get("/a/nobody", None), &db, &cfg), Err(ServerError::NotFound)));
    assert!(matches!(handle(get("/a/hidden-agent", None), &db, &cfg), Err(ServerError::NotFound)));

    let bypass = AppConfig {
        bypass_subscription: true,
        ..test_config()
    };
    let resp = handle(get("/a/hidden-agent", None), &db, &bypass).unwrap();
    assert_eq!(resp.status(), 200);
}

#[test]
fn contact_form_creates_a_lead() {
    let db = init_test_db();
    let cfg = test_config();
    let (_, agent) = ready_agent(&db, &cfg, "leads@example.com", "Meera Shah", "Mumbai");

    let body = "name=Vikram&email=Vikram%40Mail.com&phone=&message=Is+the+flat+available%3F";
    let resp = handle(post_form("/a/meera-shah/contact", body, None), &db, &cfg).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("Thanks!"));

    let rows = db.with_conn(|conn| leads::leads_for_agent(conn, agent.id)).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Vikram");
    assert_eq!(rows[0].email.as_deref(), Some("vikram@mail.com"));
    assert_eq!(rows[0].message, "Is the flat available?");
}

#[test]
fn contact_form_needs_a_way_to_reply() {
    let db = init_test_db();
    let cfg = test_config();
    let (_, agent) = ready_agent(&db, &cfg, "noreply@example.com", "Meera Shah", "Mumbai");

    let resp = handle(post_form("/a/meera-shah/contact", "name=Vikram", None), &db, &cfg).unwrap();
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("Leave an email or a phone number"));

    let rows = db.with_conn(|conn| leads::leads_for_agent(conn, agent.id)).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn agent_can_export_leads() {
    let db = init_test_db();
    let cfg = test_config();
    let (user, _) = ready_agent(&db, &cfg, "xlsx@example.com", "Meera Shah", "Mumbai");

    handle(post_form("/a/meera-shah/contact", "name=A&phone=12345678", None), &db, &cfg).unwrap();

    let resp = handle(get("/leads/export", Some(&user.session_token)), &db, &cfg).unwrap();
    assert_eq!(resp.status(), 200);
    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(disposition.contains("leads-meera-shah.xlsx"));
}

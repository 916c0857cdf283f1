use crate::db::deals::{get_deal, list_deals};
use crate::domain::deal::DealStatus;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{
    body_string, get, init_test_db, location, post_form, ready_agent, sign_in, test_config, ADMIN_EMAIL,
};

#[test]
fn anonymous_users_are_sent_to_login() {
    let db = init_test_db();
    let cfg = test_config();

    let resp = handle(get("/admin", None), &db, &cfg).unwrap();
    assert_eq!(location(&resp), "/login");
}

#[test]
fn non_admins_are_forbidden() {
    let db = init_test_db();
    let cfg = test_config();
    let user = sign_in(&db, &cfg, "agent@example.com");

    let res = handle(get("/admin", Some(&user.session_token)), &db, &cfg);
    assert!(matches!(res, Err(ServerError::Forbidden)));

    let res = handle(post_form("/admin/deals", "title=Sneaky", Some(&user.session_token)), &db, &cfg);
    assert!(matches!(res, Err(ServerError::Forbidden)));
    assert!(db.with_conn(|conn| list_deals(conn)).unwrap().is_empty());
}

#[test]
fn configured_admin_sees_back_office() {
    let db = init_test_db();
    let cfg = test_config();
    let admin = sign_in(&db, &cfg, ADMIN_EMAIL);

    let resp = handle(get("/admin", Some(&admin.session_token)), &db, &cfg).unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("New deal"));
    assert!(body.contains(ADMIN_EMAIL));
}

#[test]
fn admin_creates_deal_with_trimmed_lists() {
    let db = init_test_db();
    let cfg = test_config();
    let admin = sign_in(&db, &cfg, ADMIN_EMAIL);

    let body = "title=Free+staging&status=Active&allowed_cities=+Pune+%2C%2CHyderabad&excluded_areas=&min_profile_views_30d=10";
    let resp = handle(post_form("/admin/deals", body, Some(&admin.session_token)), &db, &cfg).unwrap();
    assert_eq!(location(&resp), "/admin");

    let deals = db.with_conn(|conn| list_deals(conn)).unwrap();
    assert_eq!(deals.len(), 1);
    let deal = &deals[0];
    assert_eq!(deal.status, DealStatus::Active);
    assert_eq!(deal.targeting.allowed_cities, vec!["Pune", "Hyderabad"]);
    assert!(deal.targeting.excluded_areas.is_empty());
    assert_eq!(deal.targeting.min_profile_views_30d, Some(10));
    assert_eq!(deal.targeting.min_page_views_30d, None);
}

#[test]
fn bad_deal_form_rerenders_with_message() {
    let db = init_test_db();
    let cfg = test_config();
    let admin = sign_in(&db, &cfg, ADMIN_EMAIL);

    let resp = handle(post_form("/admin/deals", "title=X&status=active", Some(&admin.session_token)), &db, &cfg).unwrap();
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("unknown deal status"));
}

#[test]
fn status_change_and_preview() {
    let db = init_test_db();
    let cfg = test_config();
    let admin = sign_in(&db, &cfg, ADMIN_EMAIL);
    let token = Some(admin.session_token.as_str());
    ready_agent(&db, &cfg, "hyd@example.com", "Asha Rao", "Hyderabad");
    ready_agent(&db, &cfg, "pune@example.com", "Ravi Kumar", "Pune");

    handle(post_form("/admin/deals", "title=Hyd+only&allowed_cities=Hyderabad", token), &db, &cfg).unwrap();
    let deal_id = db.with_conn(|conn| list_deals(conn)).unwrap()[0].id;

    let resp = handle(post_form(&format!("/admin/deals/{deal_id}/status"), "status=Active", token), &db, &cfg).unwrap();
    assert_eq!(location(&resp), "/admin");
    let deal = db.with_conn(|conn| get_deal(conn, deal_id)).unwrap().unwrap();
    assert_eq!(deal.status, DealStatus::Active);

    let body = body_string(handle(get(&format!("/admin/deals/{deal_id}/preview"), token), &db, &cfg).unwrap());
    assert!(body.contains("1 of 2 agents eligible"));
    assert!(body.contains("city not allowed"));

    let res = handle(post_form("/admin/deals/999/status", "status=Paused", token), &db, &cfg);
    assert!(matches!(res, Err(ServerError::NotFound)));
}

#[test]
fn admin_overrides_subscription() {
    let db = init_test_db();
    let cfg = test_config();
    let admin = sign_in(&db, &cfg, ADMIN_EMAIL);
    let (agent_user, agent) = ready_agent(&db, &cfg, "mod@example.com", "Asha Rao", "Hyderabad");

    let uri = format!("/admin/agents/{}/subscription", agent.id);
    handle(post_form(&uri, "subscribed=0", Some(&admin.session_token)), &db, &cfg).unwrap();

    let resp = handle(get("/dashboard", Some(&agent_user.session_token)), &db, &cfg).unwrap();
    assert_eq!(location(&resp), "/subscribe");
}

use crate::db::deals::{self, NewDeal};
use crate::domain::analytics::ViewKind;
use crate::domain::deal::{DealStatus, Targeting};
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{add_views, body_string, get, init_test_db, location, now_unix, post_form, ready_agent, test_config};

fn create_deal(db: &crate::db::Database, title: &str, status: DealStatus, targeting: Targeting) -> i64 {
    let deal = NewDeal {
        title: title.into(),
        description: "Partner offer".into(),
        status,
        targeting,
    };
    db.with_conn(|conn| deals::create_deal(conn, &deal, now_unix())).unwrap()
}

#[test]
fn deals_page_lists_only_eligible_offers() {
    let db = init_test_db();
    let cfg = test_config();
    let (user, _) = ready_agent(&db, &cfg, "deals@example.com", "Asha Rao", "Hyderabad");

    create_deal(&db, "Open to all", DealStatus::Active, Targeting::default());
    create_deal(&db, "Still a draft", DealStatus::Draft, Targeting::default());
    create_deal(
        &db,
        "Pune only",
        DealStatus::Active,
        Targeting {
            allowed_cities: vec!["Pune".into()],
            ..Targeting::default()
        },
    );
    create_deal(
        &db,
        "Popular agents",
        DealStatus::Active,
        Targeting {
            min_profile_views_30d: Some(2),
            ..Targeting::default()
        },
    );

    let body = body_string(handle(get("/deals", Some(&user.session_token)), &db, &cfg).unwrap());
    assert!(body.contains("Open to all"));
    assert!(!body.contains("Still a draft"));
    assert!(!body.contains("Pune only"));
    assert!(!body.contains("Popular agents"));
}

#[test]
fn views_unlock_threshold_deals() {
    let db = init_test_db();
    let cfg = test_config();
    let (user, agent) = ready_agent(&db, &cfg, "views@example.com", "Asha Rao", "Hyderabad");

    create_deal(
        &db,
        "Popular agents",
        DealStatus::Active,
        Targeting {
            min_profile_views_30d: Some(2),
            ..Targeting::default()
        },
    );
    add_views(&db, agent.id, ViewKind::Profile, 2);

    let body = body_string(handle(get("/deals", Some(&user.session_token)), &db, &cfg).unwrap());
    assert!(body.contains("Popular agents"));
}

#[test]
fn eligible_agent_adopts_once() {
    let db = init_test_db();
    let cfg = test_config();
    let (user, agent) = ready_agent(&db, &cfg, "adopt@example.com", "Asha Rao", "Hyderabad");
    let deal_id = create_deal(&db, "Free staging", DealStatus::Active, Targeting::default());
    let uri = format!("/deals/{deal_id}/adopt");

    for _ in 0..2 {
        let resp = handle(post_form(&uri, "", Some(&user.session_token)), &db, &cfg).unwrap();
        assert_eq!(location(&resp), "/deals");
    }

    let adopted = db
        .with_conn(|conn| deals::adopted_deal_ids(conn, agent.id))
        .unwrap();
    assert_eq!(adopted.len(), 1);
    assert!(adopted.contains(&deal_id));
}

#[test]
fn ineligible_agent_cannot_adopt() {
    let db = init_test_db();
    let cfg = test_config();
    let (user, _) = ready_agent(&db, &cfg, "blocked@example.com", "Asha Rao", "Pune");
    let deal_id = create_deal(
        &db,
        "Not in Pune",
        DealStatus::Active,
        Targeting {
            excluded_cities: vec!["Pune".into()],
            ..Targeting::default()
        },
    );

    let res = handle(
        post_form(&format!("/deals/{deal_id}/adopt"), "", Some(&user.session_token)),
        &db,
        &cfg,
    );
    assert!(matches!(res, Err(ServerError::Forbidden)));

    let res = handle(post_form("/deals/424242/adopt", "", Some(&user.session_token)), &db, &cfg);
    assert!(matches!(res, Err(ServerError::NotFound)));
}

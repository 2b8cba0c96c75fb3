//! End-to-end handler tests against an in-memory database.
//!
//! Each test builds the full router, seeds what it needs through the
//! repositories, and drives requests with `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

use bazaar_core::campaign::{
    AppliesTo, Campaign, CampaignAction, CampaignRule, CampaignStatus, DiscountType, RuleValue,
};
use bazaar_core::types::{GstRate, TaxMode, TaxSettings};
use bazaar_core::Money;
use bazaar_db::{Database, DbConfig};
use checkout_api::handlers::build_app;
use checkout_api::state::AppState;

async fn test_app() -> (Router, Database) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let app = build_app(AppState::new(db.clone()));
    (app, db)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

fn dec(v: &Value) -> Decimal {
    v.as_str().unwrap().parse().unwrap()
}

fn active_campaign(id: &str, name: &str, priority: i64) -> Campaign {
    let now = Utc::now();
    Campaign {
        id: id.to_string(),
        name: name.to_string(),
        status: CampaignStatus::Active,
        priority,
        start_at: now - Duration::days(1),
        end_at: now + Duration::days(30),
        created_at: now - Duration::days(10),
        rules: Vec::new(),
        actions: vec![CampaignAction {
            discount_type: DiscountType::Flat,
            discount_value: Decimal::from(100),
            max_discount: None,
            applies_to: AppliesTo::Cart,
        }],
    }
}

#[tokio::test]
async fn inclusive_intra_state_splits_cgst_sgst() {
    let (app, db) = test_app().await;

    db.settings()
        .update_tax_settings(&TaxSettings {
            tax_enabled: true,
            tax_mode: TaxMode::Inclusive,
            default_rate: GstRate::from_bps(1800),
            store_state: "Maharashtra".to_string(),
            gstin: String::new(),
        })
        .await
        .unwrap();

    let (status, body) = post_json(
        &app,
        "/api/cart/tax",
        json!({
            "items": [{ "productId": "p1", "price": 1000, "quantity": 1 }],
            "customerState": "Maharashtra"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let bd = &body["taxBreakdown"];
    assert_eq!(bd["taxType"], json!("intra-state"));
    assert_eq!(dec(&bd["taxableAmount"]), Decimal::new(84746, 2));
    assert_eq!(dec(&bd["cgst"]), Decimal::new(7627, 2));
    assert_eq!(dec(&bd["sgst"]), Decimal::new(7627, 2));
    assert_eq!(dec(&bd["igst"]), Decimal::ZERO);
    assert_eq!(dec(&bd["totalTax"]), Decimal::new(15254, 2));

    assert_eq!(body["taxSettings"]["taxMode"], json!("inclusive"));
}

#[tokio::test]
async fn inter_state_delivery_uses_igst() {
    let (app, db) = test_app().await;

    db.settings()
        .update_tax_settings(&TaxSettings {
            store_state: "Maharashtra".to_string(),
            ..TaxSettings::default()
        })
        .await
        .unwrap();

    let (status, body) = post_json(
        &app,
        "/api/cart/tax",
        json!({
            "items": [{ "productId": "p1", "price": 1000, "quantity": 1 }],
            "customerState": "Karnataka"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let bd = &body["taxBreakdown"];
    assert_eq!(bd["taxType"], json!("inter-state"));
    assert_eq!(dec(&bd["cgst"]), Decimal::ZERO);
    assert_eq!(dec(&bd["igst"]), Decimal::from(180));
}

#[tokio::test]
async fn category_override_resolved_from_catalog() {
    let (app, db) = test_app().await;

    db.settings()
        .update_tax_settings(&TaxSettings {
            store_state: "Maharashtra".to_string(),
            ..TaxSettings::default()
        })
        .await
        .unwrap();
    db.products()
        .insert("p-book", "Paperback", Some("books"), Decimal::from(299))
        .await
        .unwrap();
    db.tax_rules()
        .upsert("books", GstRate::from_bps(0))
        .await
        .unwrap();

    // No categoryId in the request: the handler resolves it from the catalog
    let (status, body) = post_json(
        &app,
        "/api/cart/tax",
        json!({
            "items": [{ "productId": "p-book", "price": 299, "quantity": 1 }],
            "customerState": "Karnataka"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec(&body["taxBreakdown"]["totalTax"]), Decimal::ZERO);
}

#[tokio::test]
async fn invalid_quantity_is_rejected_with_400() {
    let (app, _db) = test_app().await;

    let (status, body) = post_json(
        &app,
        "/api/cart/tax",
        json!({
            "items": [{ "productId": "p1", "price": 100, "quantity": 0 }]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["code"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn highest_priority_campaign_wins() {
    let (app, db) = test_app().await;

    let mut low = active_campaign("low", "Bulk Saver", 5);
    low.rules = vec![CampaignRule {
        rule_type: "min_items".to_string(),
        value: Some(RuleValue::MinItems { count: 3 }),
    }];

    let mut high = active_campaign("high", "Big Cart Bonus", 10);
    high.rules = vec![CampaignRule {
        rule_type: "min_cart_value".to_string(),
        value: Some(RuleValue::MinCartValue {
            amount: Money::from_rupees(500),
        }),
    }];

    db.campaigns().insert(&low).await.unwrap();
    db.campaigns().insert(&high).await.unwrap();

    let (status, body) = post_json(
        &app,
        "/api/cart/campaigns",
        json!({
            "items": [{ "productId": "p1", "price": 400, "quantity": 3 }]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appliedCampaign"]["campaignId"], json!("high"));
    assert_eq!(dec(&body["appliedCampaign"]["discount"]), Decimal::from(100));
    assert_eq!(body["nearestCampaign"], Value::Null);
    assert_eq!(dec(&body["subtotal"]), Decimal::from(1200));
}

#[tokio::test]
async fn near_miss_reports_shortfall() {
    let (app, db) = test_app().await;

    let mut c = active_campaign("c1", "Add More", 5);
    c.rules = vec![CampaignRule {
        rule_type: "min_items".to_string(),
        value: Some(RuleValue::MinItems { count: 5 }),
    }];
    db.campaigns().insert(&c).await.unwrap();

    let (status, body) = post_json(
        &app,
        "/api/cart/campaigns",
        json!({
            "items": [{ "productId": "p1", "price": 100, "quantity": 2 }]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appliedCampaign"], Value::Null);
    assert_eq!(body["nearestCampaign"]["itemsNeeded"], json!(3));
}

#[tokio::test]
async fn collection_rule_uses_catalog_memberships() {
    let (app, db) = test_app().await;

    db.products()
        .insert("p-sandal", "Strap Sandals", None, Decimal::from(899))
        .await
        .unwrap();
    db.products()
        .insert_collection("summer-sale", "Summer Sale")
        .await
        .unwrap();
    db.products()
        .add_to_collection("p-sandal", "summer-sale")
        .await
        .unwrap();

    let mut c = active_campaign("c1", "Summer Steals", 5);
    c.rules = vec![CampaignRule {
        rule_type: "collection".to_string(),
        value: Some(RuleValue::Collection {
            collection_id: "summer-sale".to_string(),
        }),
    }];
    db.campaigns().insert(&c).await.unwrap();

    let (status, body) = post_json(
        &app,
        "/api/cart/campaigns",
        json!({
            "items": [{ "productId": "p-sandal", "price": 899, "quantity": 1 }]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appliedCampaign"]["campaignId"], json!("c1"));
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _db) = test_app().await;

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["database"], json!(true));
}

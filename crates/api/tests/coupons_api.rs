//! Integration tests for coupon creation, queries and lookups.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, get, post_json};
use serde_json::json;
use sqlx::PgPool;

use coupons_api::config::CouponSettings;
use coupons_core::hooks::CouponHooks;
use coupons_core::types::DbId;
use coupons_db::models::affiliate::STATUS_ACTIVE;
use coupons_db::repositories::{AffiliateRepo, SettingsRepo};

async fn affiliate(pool: &PgPool) -> DbId {
    AffiliateRepo::create(pool, 1, STATUS_ACTIVE)
        .await
        .unwrap()
        .affiliate_id
}

async fn configure_template(pool: &PgPool) {
    SettingsRepo::upsert(
        pool,
        "coupon_template_woocommerce",
        &json!({ "template_id": 12, "amount": "15%" }),
    )
    .await
    .unwrap();
}

// ---------------------------------------------------------------------------
// Add
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn add_without_template_is_rejected(pool: PgPool) {
    let affiliate_id = affiliate(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/v1/coupons", json!({ "affiliate_id": affiliate_id })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn add_in_test_mode_skips_template(pool: PgPool) {
    let affiliate_id = affiliate(&pool).await;
    let settings = CouponSettings {
        test_mode: true,
        ..Default::default()
    };
    let (app, _) = common::build_test_app_with(pool, settings, CouponHooks::default());

    let response = post_json(app, "/api/v1/coupons", json!({ "affiliate_id": affiliate_id })).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let code = json["data"]["coupon_code"].as_str().unwrap();
    assert_eq!(code.len(), 10);
    assert_eq!(code, code.to_uppercase());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn add_sanitizes_and_uppercases_code(pool: PgPool) {
    let affiliate_id = affiliate(&pool).await;
    configure_template(&pool).await;
    let (app, state) =
        common::build_test_app_with(pool, CouponSettings::default(), CouponHooks::default());
    let mut events = state.event_bus.subscribe();

    let response = post_json(
        app,
        "/api/v1/coupons",
        json!({ "affiliate_id": affiliate_id, "coupon_code": "Summer Sale-10!" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["coupon_code"], "SUMMERSALE-10");
    assert_eq!(json["data"]["affiliate_id"], affiliate_id);

    let event = events.recv().await.unwrap();
    assert_eq!(event.event_type, "coupon.added");
    assert_eq!(event.affiliate_id, Some(affiliate_id));
    assert_eq!(event.payload["coupon_code"], "SUMMERSALE-10");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn add_for_unknown_affiliate_is_not_found(pool: PgPool) {
    configure_template(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/v1/coupons", json!({ "affiliate_id": 4242 })).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn add_rejects_overlong_code(pool: PgPool) {
    let affiliate_id = affiliate(&pool).await;
    configure_template(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/coupons",
        json!({ "affiliate_id": affiliate_id, "coupon_code": "A".repeat(51) }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn generated_codes_pass_through_code_filters(pool: PgPool) {
    let affiliate_id = affiliate(&pool).await;
    let mut hooks = CouponHooks::default();
    hooks.add_code_filter(Arc::new(|code: String, affiliate_id: DbId| {
        format!("AFF{affiliate_id}{code}")
    }));
    let settings = CouponSettings {
        test_mode: true,
        ..Default::default()
    };
    let (app, _) = common::build_test_app_with(pool, settings, hooks);

    let response = post_json(app, "/api/v1/coupons", json!({ "affiliate_id": affiliate_id })).await;

    let json = body_json(response).await;
    let code = json["data"]["coupon_code"].as_str().unwrap();
    assert!(code.starts_with(&format!("AFF{affiliate_id}")));
}

// ---------------------------------------------------------------------------
// Generate code
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn generate_code_returns_success_envelope(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/v1/coupons/generate-code", json!({ "affiliate_id": 3 })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    let code = json["data"]["coupon_code"].as_str().unwrap();
    assert_eq!(code.len(), 10);
    assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

async fn seed_coupons(pool: &PgPool, affiliate_id: DbId, codes: &[&str]) {
    let (app, _) = common::build_test_app_with(
        pool.clone(),
        CouponSettings {
            test_mode: true,
            ..Default::default()
        },
        CouponHooks::default(),
    );
    for code in codes {
        let response = post_json(
            app.clone(),
            "/api/v1/coupons",
            json!({ "affiliate_id": affiliate_id, "coupon_code": code }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_and_count_with_filters(pool: PgPool) {
    let first = affiliate(&pool).await;
    let second = affiliate(&pool).await;
    seed_coupons(&pool, first, &["one", "two"]).await;
    seed_coupons(&pool, second, &["three"]).await;
    let app = common::build_test_app(pool);

    let json = body_json(get(app.clone(), "/api/v1/coupons").await).await;
    let codes: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["coupon_code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["THREE", "TWO", "ONE"]);

    let uri = format!("/api/v1/coupons?affiliate_id={first}&fields=ids&order=asc");
    let json = body_json(get(app.clone(), &uri).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
    assert!(json["data"][0].is_number());

    let json = body_json(get(app.clone(), "/api/v1/coupons/count?number=1").await).await;
    assert_eq!(json["data"], 3);

    let json = body_json(get(app, "/api/v1/coupons?coupon_code=two,three").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn lookup_by_reference_and_column(pool: PgPool) {
    let affiliate_id = affiliate(&pool).await;
    seed_coupons(&pool, affiliate_id, &["findme"]).await;
    let app = common::build_test_app(pool);

    let json = body_json(get(app.clone(), "/api/v1/coupons/findme").await).await;
    let coupon_id = json["data"]["coupon_id"].as_i64().unwrap();
    assert_eq!(json["data"]["coupon_code"], "FINDME");

    let json = body_json(get(app.clone(), &format!("/api/v1/coupons/{coupon_id}")).await).await;
    assert_eq!(json["data"]["coupon_code"], "FINDME");

    let uri = format!("/api/v1/coupons/by/affiliate_id/{affiliate_id}");
    let json = body_json(get(app.clone(), &uri).await).await;
    assert_eq!(json["data"]["coupon_id"], coupon_id);

    let response = get(app.clone(), "/api/v1/coupons/missing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app, "/api/v1/coupons/by/nope/1").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn digit_only_code_is_looked_up_by_column(pool: PgPool) {
    let affiliate_id = affiliate(&pool).await;
    seed_coupons(&pool, affiliate_id, &["20242024"]).await;
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/coupons/20242024").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(get(app, "/api/v1/coupons/by/coupon_code/20242024").await).await;
    assert_eq!(json["data"]["coupon_code"], "20242024");
}

//! Integration tests for integration and coupon type metadata.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};
use serde_json::json;
use sqlx::PgPool;

use coupons_db::repositories::SettingsRepo;

#[sqlx::test(migrations = "../db/migrations")]
async fn integrations_filter_by_capability_and_status(pool: PgPool) {
    let app = common::build_test_app(pool);

    let json = body_json(get(app.clone(), "/api/v1/integrations").await).await;
    assert_eq!(
        json["data"],
        json!([{ "id": "store", "name": "Coupon Store", "enabled": true }])
    );

    let uri = "/api/v1/integrations?supports=dynamic_coupons&status=enabled";
    let json = body_json(get(app.clone(), uri).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let uri = "/api/v1/integrations?supports=manual_coupons";
    let json = body_json(get(app.clone(), uri).await).await;
    assert_eq!(json["data"], json!([]));

    let response = get(app, "/api/v1/integrations?status=sideways").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn dynamic_setup_requires_template(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let uri = "/api/v1/integrations/dynamic-coupons/setup";

    let json = body_json(get(app.clone(), uri).await).await;
    assert_eq!(json["data"]["is_setup"], false);

    SettingsRepo::upsert(&pool, "coupon_template_woocommerce", &json!(7))
        .await
        .unwrap();

    let json = body_json(get(app, uri).await).await;
    assert_eq!(json["data"]["is_setup"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn coupon_types_list_labels(pool: PgPool) {
    let app = common::build_test_app(pool);

    let json = body_json(get(app, "/api/v1/coupon-types").await).await;
    assert_eq!(
        json["data"],
        json!([
            { "id": "manual", "label": "Manual" },
            { "id": "dynamic", "label": "Dynamic" }
        ])
    );
}

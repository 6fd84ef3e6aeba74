//! Acceptance tests against a real Postgres. `#[sqlx::test]` creates a fresh
//! database per test from `DATABASE_URL` and applies `migrations/`; run with
//! `cargo test -- --include-ignored` when one is available.

mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use sqlx::PgPool;
use storefront_back::{
    models::{Admin, BannerChanges, BannerType, Product, ProductChanges},
    queries::{admin_queries, banner_queries, category_queries, product_queries, variant_type_queries},
    utils::jwt,
};
use tower::ServiceExt;

use common::{app_with_pool, body_json, test_config};

async fn admin(pool: &PgPool, username: &str, is_superadmin: bool) -> (Admin, String) {
    let admin = admin_queries::create_admin(
        pool,
        username,
        &format!("{}@shop.test", username),
        "not-a-real-hash",
        is_superadmin,
        None,
    )
    .await
    .unwrap();

    let token = jwt::generate_token(&test_config().auth, &admin).unwrap();
    (admin, token)
}

async fn product(pool: &PgPool, name: &str, category_id: i32, admin_id: i32) -> Product {
    let changes = ProductChanges {
        name: Some(name.to_string()),
        price: Some(Decimal::new(2500, 2)),
        category_id: Some(category_id),
        ..Default::default()
    };

    product_queries::create_product(pool, &changes, admin_id)
        .await
        .unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, token: &str, body: Option<Value>) -> Response {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

#[sqlx::test]
#[ignore = "needs DATABASE_URL"]
async fn duplicate_category_name_conflicts(pool: PgPool) {
    let (_, token) = admin(&pool, "editor", false).await;
    let app = app_with_pool(pool);

    let first = send(&app, "POST", "/api/admin/categories", &token, Some(json!({"name": "Shoes"}))).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = send(&app, "POST", "/api/admin/categories", &token, Some(json!({"name": "shoes"}))).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert!(body_json(second).await["message"].is_string());
}

#[sqlx::test]
#[ignore = "needs DATABASE_URL"]
async fn duplicate_size_name_conflicts(pool: PgPool) {
    let (_, token) = admin(&pool, "editor", false).await;
    let app = app_with_pool(pool);

    let first = send(&app, "POST", "/api/admin/sizes", &token, Some(json!({"name": "XL"}))).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = send(&app, "POST", "/api/admin/sizes", &token, Some(json!({"name": " XL "}))).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[sqlx::test]
#[ignore = "needs DATABASE_URL"]
async fn referenced_category_cannot_be_deleted(pool: PgPool) {
    let (editor, token) = admin(&pool, "editor", false).await;
    let category = category_queries::create_category(&pool, "Shirts", editor.id)
        .await
        .unwrap();
    product(&pool, "Linen Shirt", category.id, editor.id).await;

    let app = app_with_pool(pool.clone());
    let uri = format!("/api/admin/categories/{}", category.id);

    let response = send(&app, "DELETE", &uri, &token, None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    assert!(category_queries::find_by_id(&pool, category.id).await.unwrap().is_some());
}

#[sqlx::test]
#[ignore = "needs DATABASE_URL"]
async fn admin_management_is_superadmin_only(pool: PgPool) {
    let (_, staff_token) = admin(&pool, "staff", false).await;
    let (_, root_token) = admin(&pool, "root", true).await;
    let app = app_with_pool(pool);

    let refused = send(&app, "GET", "/api/admin/admins", &staff_token, None).await;
    assert_eq!(refused.status(), StatusCode::FORBIDDEN);

    let allowed = send(&app, "GET", "/api/admin/admins", &root_token, None).await;
    assert_eq!(allowed.status(), StatusCode::OK);
    assert_eq!(body_json(allowed).await.as_array().unwrap().len(), 2);
}

#[sqlx::test]
#[ignore = "needs DATABASE_URL"]
async fn page_past_the_end_still_reports_total(pool: PgPool) {
    let (editor, _) = admin(&pool, "editor", false).await;
    let category = category_queries::create_category(&pool, "Hats", editor.id)
        .await
        .unwrap();
    for name in ["Beanie", "Bucket Hat", "Cap"] {
        product(&pool, name, category.id, editor.id).await;
    }

    let app = app_with_pool(pool);
    let response = app
        .oneshot(
            Request::get("/api/products?offset=12")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 3);
    assert!(body["products"].as_array().unwrap().is_empty());
}

#[sqlx::test]
#[ignore = "needs DATABASE_URL"]
async fn percent_in_search_matches_literally(pool: PgPool) {
    let (editor, _) = admin(&pool, "editor", false).await;
    let category = category_queries::create_category(&pool, "Sale", editor.id)
        .await
        .unwrap();
    product(&pool, "Plain Tee", category.id, editor.id).await;
    product(&pool, "100% Cotton Tee", category.id, editor.id).await;

    let app = app_with_pool(pool);
    let response = app
        .oneshot(
            Request::get("/api/products?query=%25")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["products"][0]["name"], "100% Cotton Tee");
}

#[sqlx::test]
#[ignore = "needs DATABASE_URL"]
async fn banner_optional_fields_can_be_cleared(pool: PgPool) {
    let (editor, _) = admin(&pool, "editor", false).await;
    let category = category_queries::create_category(&pool, "Shoes", editor.id)
        .await
        .unwrap();
    let linked = product(&pool, "Runner", category.id, editor.id).await;

    let banner = banner_queries::create_banner(
        &pool,
        &BannerChanges {
            title: Some("Spring".to_string()),
            subtitle: Some(Some("New season".to_string())),
            banner_type: Some(BannerType::Hero),
            product_id: Some(Some(linked.id)),
            ..Default::default()
        },
        editor.id,
    )
    .await
    .unwrap();

    let cleared = banner_queries::update_banner(
        &pool,
        banner.id,
        &BannerChanges {
            subtitle: Some(None),
            product_id: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(cleared.title, "Spring");
    assert_eq!(cleared.subtitle, None);
    assert_eq!(cleared.product_id, None);
}

#[sqlx::test]
#[ignore = "needs DATABASE_URL"]
async fn combination_sku_clears_and_used_option_is_kept(pool: PgPool) {
    let (editor, token) = admin(&pool, "editor", false).await;
    let category = category_queries::create_category(&pool, "Tees", editor.id)
        .await
        .unwrap();
    let tee = product(&pool, "Tee", category.id, editor.id).await;

    let colour = variant_type_queries::create_type(&pool, tee.id, "Colour")
        .await
        .unwrap();
    let options = variant_type_queries::create_options(
        &pool,
        colour.id,
        &["Red".to_string(), "Blue".to_string()],
    )
    .await
    .unwrap();

    let app = app_with_pool(pool);

    let created = send(
        &app,
        "POST",
        &format!("/api/admin/products/{}/combinations", tee.id),
        &token,
        Some(json!({"option_ids": [options[0].id], "sku": "TEE-RED"})),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let combination_id = body_json(created).await["id"].as_i64().unwrap();

    let updated = send(
        &app,
        "PUT",
        &format!("/api/admin/combinations/{}", combination_id),
        &token,
        Some(json!({"sku": ""})),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);
    assert!(body_json(updated).await["sku"].is_null());

    let used = send(
        &app,
        "DELETE",
        &format!("/api/admin/variant-options/{}", options[0].id),
        &token,
        None,
    )
    .await;
    assert_eq!(used.status(), StatusCode::CONFLICT);

    let unused = send(
        &app,
        "DELETE",
        &format!("/api/admin/variant-options/{}", options[1].id),
        &token,
        None,
    )
    .await;
    assert_eq!(unused.status(), StatusCode::NO_CONTENT);
}

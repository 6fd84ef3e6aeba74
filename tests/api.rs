mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use common::{app_without_db as test_app, body_json};
use tower::ServiceExt;

#[tokio::test]
async fn health_is_public() {
    let response = test_app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_routes_require_a_token() {
    let response = test_app()
        .oneshot(
            Request::get("/api/admin/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Authentication required");
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let response = test_app()
        .oneshot(
            Request::post("/api/admin/categories")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name":"Shoes"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_bearer_scheme_is_unauthorized() {
    let response = test_app()
        .oneshot(
            Request::get("/api/admin/admins")
                .header(header::AUTHORIZATION, "Basic cm9vdDpyb290")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid token format");
}

#[tokio::test]
async fn login_without_identifier_is_bad_request() {
    let response = test_app()
        .oneshot(
            Request::post("/api/admin/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"password":"secret1"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["message"], "identifier is required");
}

#[tokio::test]
async fn login_without_password_is_bad_request() {
    let response = test_app()
        .oneshot(
            Request::post("/api/admin/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"identifier":"root","password":""}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_banner_type_is_bad_request() {
    let response = test_app()
        .oneshot(
            Request::get("/api/banners?type=popup")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn inverted_price_range_is_bad_request() {
    let response = test_app()
        .oneshot(
            Request::get("/api/products?min_price=50&max_price=10")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["message"], "min_price cannot be greater than max_price");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let response = test_app()
        .oneshot(
            Request::get("/api/orders")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mistyped_json_field_is_bad_request_with_message() {
    let response = test_app()
        .oneshot(
            Request::post("/api/admin/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"identifier":5,"password":"secret1"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("identifier"));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let response = test_app()
        .oneshot(
            Request::post("/api/admin/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["message"].is_string());
}

#[tokio::test]
async fn unknown_sort_order_is_bad_request_with_message() {
    let response = test_app()
        .oneshot(
            Request::get("/api/products?sort_by=cheapest")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["message"].is_string());
}

#[tokio::test]
async fn non_numeric_id_is_bad_request_with_message() {
    let response = test_app()
        .oneshot(
            Request::get("/api/products/abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["message"].is_string());
}

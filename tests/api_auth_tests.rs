//! API surface tests: routing and authentication behavior
//!
//! These run against the real router with a lazy pool; no request here
//! reaches the database, so no setup is required.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::{routing::get, Router};
use tower::ServiceExt;
use uuid::Uuid;

use admarket_server::auth::generate_token;
use admarket_server::models::UserRole;
use admarket_server::routes;
use admarket_server::state::AppState;

const TEST_SECRET: &str = "api-test-secret";

fn test_app() -> Router {
    let db_pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy("postgresql://localhost/admarket_test")
        .expect("Failed to build lazy pool");

    let app_state = AppState::new(db_pool, TEST_SECRET.to_string());

    Router::new()
        .route("/", get(|| async { "AdMarket API Server" }))
        .merge(routes::deal_routes())
        .merge(routes::campaign_routes())
        .merge(routes::admin_routes())
        .with_state(app_state)
}

fn bearer(role: UserRole) -> String {
    let token = generate_token(Uuid::new_v4(), role, TEST_SECRET, 3600)
        .expect("Token generation should succeed");
    format!("Bearer {}", token)
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Body should be readable");
    String::from_utf8_lossy(&bytes).to_string()
}

#[tokio::test]
async fn test_root_banner() {
    let response = test_app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "AdMarket API Server");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/deals")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_string(response).await.contains("MISSING_TOKEN"));
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/deals")
                .header(header::AUTHORIZATION, "Bearer not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_string(response).await.contains("INVALID_TOKEN"));
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let token = generate_token(Uuid::new_v4(), UserRole::Issuer, TEST_SECRET, -3600)
        .expect("Token generation should succeed");

    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/deals")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_string(response).await.contains("TOKEN_EXPIRED"));
}

#[tokio::test]
async fn test_wrong_secret_is_unauthorized() {
    let token = generate_token(Uuid::new_v4(), UserRole::Issuer, "another-secret", 3600)
        .expect("Token generation should succeed");

    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/deals")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_string(response).await.contains("INVALID_TOKEN"));
}

#[tokio::test]
async fn test_non_admin_cannot_reach_admin_routes() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/admin/commissions")
                .header(header::AUTHORIZATION, bearer(UserRole::Issuer))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(body_string(response).await.contains("Admin access required"));
}

#[tokio::test]
async fn test_valid_token_reaches_the_handler() {
    // Malformed JSON after successful auth proves the token was accepted:
    // the request dies in the body extractor, not the auth layer.
    let response = test_app()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/deals")
                .header(header::AUTHORIZATION, bearer(UserRole::Issuer))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

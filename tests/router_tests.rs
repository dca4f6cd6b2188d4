//! Router-level tests for the authentication / authorization / validation
//! paths that reject a request before any query runs. The pool is created
//! lazily and never connected, so these run without a database.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

use wardrobe_api::{
    app::AppState,
    config::{AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig, SmtpConfig},
    models::UserRole,
    routes,
    services::EmailService,
    utils::jwt::{self, TokenPurpose},
};

const JWT_SECRET: &str = "router-test-secret";

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_body_size: 1024 * 1024,
        },
        database: DatabaseConfig {
            url: "postgres://postgres@localhost/wardrobe_test".to_string(),
            max_connections: 1,
        },
        cors: CorsConfig {
            allowed_origins: Vec::new(),
        },
        auth: AuthConfig {
            jwt_secret: JWT_SECRET.to_string(),
            base_url: "http://localhost:8080".to_string(),
        },
        smtp: SmtpConfig {
            host: "localhost".to_string(),
            port: 1025,
            username: String::new(),
            password: String::new(),
            from: "noreply@localhost".to_string(),
        },
    }
}

fn test_router() -> Router {
    let config = test_config();
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy(&config.database.url)
        .expect("lazy pool");
    let email = EmailService::from_config(&config.smtp).expect("email service");

    routes::create_router(AppState {
        db: pool,
        config: Arc::new(config),
        email,
    })
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn message_of(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    value["message"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn health_check_responds_ok() {
    let response = test_router()
        .oneshot(request(Method::GET, "/health", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_routes_require_a_token() {
    let response = test_router()
        .oneshot(request(Method::GET, "/admin/users", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let response = test_router()
        .oneshot(request(
            Method::GET,
            "/admin/users",
            Some("not.a.token"),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_admin_token_is_forbidden_on_admin_routes() {
    let token = jwt::generate_token(JWT_SECRET, Uuid::new_v4(), "c@shop.com", UserRole::Customer)
        .unwrap();

    let response = test_router()
        .oneshot(request(Method::GET, "/admin/users", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn verification_link_token_is_not_a_session() {
    let token = jwt::generate_link_token(
        JWT_SECRET,
        Uuid::new_v4(),
        "c@shop.com",
        TokenPurpose::Verification,
    )
    .unwrap();

    let response = test_router()
        .oneshot(request(Method::GET, "/admin/users", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn update_email_requires_authentication() {
    let response = test_router()
        .oneshot(request(
            Method::PUT,
            "/auth/update-email",
            None,
            Some(json!({ "new_email": "new@shop.com" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_cannot_target_their_own_account() {
    let admin_id = Uuid::new_v4();
    let token = jwt::generate_token(JWT_SECRET, admin_id, "admin@shop.com", UserRole::Admin)
        .unwrap();

    for (method, uri) in [
        (Method::PATCH, "/admin/users/toggle-active"),
        (Method::DELETE, "/admin/users/soft-delete"),
    ] {
        let response = test_router()
            .oneshot(request(
                method,
                uri,
                Some(&token),
                Some(json!({ "user_id": admin_id })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    let response = test_router()
        .oneshot(request(
            Method::PUT,
            "/admin/users/role",
            Some(&token),
            Some(json!({ "user_id": admin_id, "role": "staff" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn product_without_variants_is_rejected() {
    let response = test_router()
        .oneshot(request(
            Method::POST,
            "/products",
            None,
            Some(json!({
                "name": "Plain Tee",
                "category_name": "T-Shirt",
                "variants": []
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        message_of(response).await,
        "At least one variant is required"
    );
}

#[tokio::test]
async fn registration_payload_is_validated() {
    let router = test_router();

    let response = router
        .clone()
        .oneshot(request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "email": "no-at-sign", "password": "secret1" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .oneshot(request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "email": "a@b.com", "password": "abc" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_role_in_payload_is_rejected() {
    let token = jwt::generate_token(JWT_SECRET, Uuid::new_v4(), "admin@shop.com", UserRole::Admin)
        .unwrap();

    let response = test_router()
        .oneshot(request(
            Method::PUT,
            "/admin/users/role",
            Some(&token),
            Some(json!({ "user_id": Uuid::new_v4(), "role": "superuser" })),
        ))
        .await
        .unwrap();

    // Closed role enumeration: serde rejects the body before the handler runs.
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

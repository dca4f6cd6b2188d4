use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;

use crate::{
    config::AppConfig,
    database,
    error::{AppError, Result},
    routes,
    services::EmailService,
};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub email: EmailService,
}

pub async fn build(config: AppConfig) -> Result<Router> {
    let pool = database::create_pool(&config.database).await?;
    let email = EmailService::from_config(&config.smtp)?;
    let cors = cors_layer(&config)?;
    let max_body_size = config.server.max_body_size;

    let state = AppState {
        db: pool,
        config: Arc::new(config),
        email,
    };

    let app = routes::create_router(state)
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(cors);

    Ok(app)
}

fn cors_layer(config: &AppConfig) -> Result<CorsLayer> {
    if config.cors.allowed_origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }

    let allowed_origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| AppError::ConfigError(format!("Invalid CORS origin: {}", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_origin(allowed_origins))
}

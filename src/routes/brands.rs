use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::{AppError, Result},
    models::{Brand, BrandRequest},
    queries::brand_queries,
};

pub async fn list_brands(State(state): State<AppState>) -> Result<Json<Vec<Brand>>> {
    let brands = brand_queries::get_all(&state.db).await?;

    Ok(Json(brands))
}

pub async fn create_brand(
    State(state): State<AppState>,
    Json(payload): Json<BrandRequest>,
) -> Result<(StatusCode, Json<Brand>)> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    let brand =
        brand_queries::create_brand(&state.db, &payload.name, payload.description.as_deref())
            .await?;

    Ok((StatusCode::CREATED, Json(brand)))
}

pub async fn update_brand(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BrandRequest>,
) -> Result<Json<Brand>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    let brand =
        brand_queries::update_brand(&state.db, id, &payload.name, payload.description.as_deref())
            .await?
            .ok_or_else(|| AppError::NotFound("Brand not found".to_string()))?;

    Ok(Json(brand))
}

pub async fn toggle_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Brand>> {
    let brand = brand_queries::toggle_active(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Brand not found".to_string()))?;

    Ok(Json(brand))
}

pub async fn soft_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Brand>> {
    let brand = brand_queries::soft_delete(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Brand not found".to_string()))?;

    Ok(Json(brand))
}

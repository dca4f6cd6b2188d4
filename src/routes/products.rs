use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::{AppError, Result},
    models::{
        variant_totals, Product, ProductListQuery, ProductRequest, ProductVariant,
        ProductWithVariants, VariantTotals,
    },
    queries::{brand_queries, category_queries, product_queries},
};

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductListQuery>,
) -> Result<Json<Vec<ProductWithVariants>>> {
    let products = product_queries::list_products(&state.db, &params).await?;

    Ok(Json(products))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductWithVariants>)> {
    let (totals, category_id, brand_id) = resolve_product_payload(&state, &payload).await?;

    let product = product_queries::create_product(
        &state.db,
        &payload.name,
        payload.description.as_deref(),
        totals,
        category_id,
        brand_id,
    )
    .await?;

    product_queries::replace_variants(&state.db, product.id, &payload.variants).await?;
    let variants = product_queries::variants_for_product(&state.db, product.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductWithVariants { product, variants }),
    ))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductRequest>,
) -> Result<Json<ProductWithVariants>> {
    let (totals, category_id, brand_id) = resolve_product_payload(&state, &payload).await?;

    let product = product_queries::update_product(
        &state.db,
        id,
        &payload.name,
        payload.description.as_deref(),
        totals,
        category_id,
        brand_id,
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    product_queries::replace_variants(&state.db, product.id, &payload.variants).await?;
    let variants = product_queries::variants_for_product(&state.db, product.id).await?;

    Ok(Json(ProductWithVariants { product, variants }))
}

pub async fn toggle_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>> {
    let product = product_queries::toggle_active(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

pub async fn soft_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>> {
    let product = product_queries::soft_delete(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

pub async fn toggle_variant_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductVariant>> {
    let variant = product_queries::toggle_variant_active(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product variant not found".to_string()))?;

    Ok(Json(variant))
}

pub async fn soft_delete_variant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductVariant>> {
    let variant = product_queries::soft_delete_variant(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product variant not found".to_string()))?;

    Ok(Json(variant))
}

/// Validate the payload, derive price/stock totals from the variant list,
/// and resolve the category and brand names to foreign keys.
async fn resolve_product_payload(
    state: &AppState,
    payload: &ProductRequest,
) -> Result<(VariantTotals, Uuid, Option<Uuid>)> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    let totals = variant_totals(&payload.variants).ok_or_else(|| {
        AppError::BadRequest("At least one variant is required".to_string())
    })?;

    let category = category_queries::find_by_name(&state.db, &payload.category_name)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    let brand_id = match payload.brand_name.as_deref() {
        Some(name) if !name.is_empty() => Some(
            brand_queries::find_by_name(&state.db, name)
                .await?
                .ok_or_else(|| AppError::NotFound("Brand not found".to_string()))?
                .id,
        ),
        _ => None,
    };

    Ok((totals, category.id, brand_id))
}

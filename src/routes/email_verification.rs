use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde_json::json;

use crate::{
    app::AppState,
    error::{AppError, Result},
    models::{UpdateEmailRequest, VerifyTokenParams},
    queries::user_queries,
    utils::jwt::{self, Claims, TokenPurpose},
};

pub async fn verify_email(
    State(state): State<AppState>,
    Query(params): Query<VerifyTokenParams>,
) -> Result<Json<serde_json::Value>> {
    let claims = jwt::verify_link_token(
        &state.config.auth.jwt_secret,
        &params.token,
        TokenPurpose::Verification,
    )?;

    let user = user_queries::activate_user(&state.db, claims.user_id()?)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    tracing::info!("Email verified for {}", user.email);

    Ok(Json(json!({
        "message": "Email verified successfully. You can now log in."
    })))
}

pub async fn update_email(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateEmailRequest>,
) -> Result<Json<serde_json::Value>> {
    if payload.new_email.is_empty() || !payload.new_email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }

    if user_queries::find_by_email(&state.db, &payload.new_email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    // The token carries the requested address; nothing changes until the
    // link mailed to that address is confirmed.
    let token = jwt::generate_link_token(
        &state.config.auth.jwt_secret,
        claims.user_id()?,
        &payload.new_email,
        TokenPurpose::EmailUpdate,
    )?;

    state
        .email
        .send_email_update_confirmation(&payload.new_email, &token, &state.config.auth.base_url)
        .await?;

    Ok(Json(json!({
        "message": "Confirmation email sent to the new address."
    })))
}

pub async fn confirm_email_update(
    State(state): State<AppState>,
    Query(params): Query<VerifyTokenParams>,
) -> Result<Json<serde_json::Value>> {
    let claims = jwt::verify_link_token(
        &state.config.auth.jwt_secret,
        &params.token,
        TokenPurpose::EmailUpdate,
    )?;

    let user = user_queries::update_email(&state.db, claims.user_id()?, &claims.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    tracing::info!("Email updated for user {}", user.id);

    Ok(Json(json!({
        "message": "Email updated successfully."
    })))
}

use axum::{extract::State, Json};

use crate::{
    app::AppState,
    error::{AppError, Result},
    models::{AuthResponse, LoginRequest},
    queries::user_queries,
    utils::jwt,
};

pub async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let user = user_queries::find_by_email(&state.db, &payload.email)
        .await?
        .filter(|user| !user.is_deleted)
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    if !user.is_active {
        return Err(AppError::Unauthorized(
            "Account not verified. Please check your email and verify your account.".to_string(),
        ));
    }

    let is_valid = bcrypt::verify(&payload.password, &user.password)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;

    if !is_valid {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = jwt::generate_token(
        &state.config.auth.jwt_secret,
        user.id,
        &user.email,
        user.role,
    )?;

    Ok(Json(AuthResponse { token, user }))
}

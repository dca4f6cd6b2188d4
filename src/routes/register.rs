use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;

use crate::{
    app::AppState,
    error::{AppError, Result},
    models::{RegisterRequest, UserRole},
    queries::user_queries,
    utils::jwt::{self, TokenPurpose},
};

pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    validate_registration(&payload)?;

    if user_queries::find_by_email(&state.db, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

    let role = payload.role.unwrap_or(UserRole::Customer);

    // New accounts stay inactive until the emailed link is followed.
    let user = user_queries::create_user(
        &state.db,
        &payload.email,
        &password_hash,
        role,
        false,
        None,
    )
    .await?;

    let token = jwt::generate_link_token(
        &state.config.auth.jwt_secret,
        user.id,
        &user.email,
        TokenPurpose::Verification,
    )?;

    state
        .email
        .send_verification_email(&user.email, &token, &state.config.auth.base_url)
        .await?;

    tracing::info!("Registered user {}, verification email sent", user.email);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully. Please check your email to verify your account."
        })),
    ))
}

fn validate_registration(payload: &RegisterRequest) -> Result<()> {
    if payload.email.is_empty() || !payload.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }

    if payload.password.len() < 6 {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            role: None,
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(validate_registration(&request("a@b.com", "secret1")).is_ok());
    }

    #[test]
    fn email_without_at_sign_is_rejected() {
        assert!(matches!(
            validate_registration(&request("not-an-email", "secret1")),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(matches!(
            validate_registration(&request("a@b.com", "abc")),
            Err(AppError::BadRequest(_))
        ));
    }
}

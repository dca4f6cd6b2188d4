use axum::{extract::State, http::StatusCode, Extension, Json};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::{AppError, Result},
    models::{CreateUserRequest, UpdateRoleRequest, User, UserRole, UserTargetRequest},
    queries::user_queries,
    utils::jwt::Claims,
};

pub async fn create_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    if payload.email.is_empty() || !payload.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }

    if payload.password.len() < 6 {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    if user_queries::find_by_email(&state.db, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

    let role = payload.role.unwrap_or(UserRole::Customer);

    // Admin-created accounts skip the verification flow.
    let user = user_queries::create_user(
        &state.db,
        &payload.email,
        &password_hash,
        role,
        true,
        Some(claims.user_id()?),
    )
    .await?;

    state
        .email
        .send_account_created_email(&user.email, &payload.password)
        .await?;

    tracing::info!("Admin {} created user {}", claims.email, user.email);

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let users = user_queries::list_users(&state.db).await?;

    Ok(Json(users))
}

pub async fn update_user_role(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<Json<User>> {
    let caller_id = load_guarded_target(&state, &claims, payload.user_id).await?;

    let user = user_queries::update_role(&state.db, payload.user_id, payload.role, caller_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

pub async fn toggle_user_active(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UserTargetRequest>,
) -> Result<Json<User>> {
    let caller_id = load_guarded_target(&state, &claims, payload.user_id).await?;

    let user = user_queries::toggle_active(&state.db, payload.user_id, caller_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

pub async fn soft_delete_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UserTargetRequest>,
) -> Result<Json<User>> {
    let caller_id = load_guarded_target(&state, &claims, payload.user_id).await?;

    let user = user_queries::soft_delete(&state.db, payload.user_id, caller_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Admin mutations may never target the caller or another admin.
/// The self check runs before the lookup so it holds even for stale ids.
/// Returns the caller id for the `updated_by` audit column.
async fn load_guarded_target(
    state: &AppState,
    claims: &Claims,
    target_id: Uuid,
) -> Result<Uuid> {
    let caller_id = claims.user_id()?;
    ensure_not_self(caller_id, target_id)?;

    let target = user_queries::find_by_id(&state.db, target_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    ensure_not_admin(&target)?;

    Ok(caller_id)
}

fn ensure_not_self(caller_id: Uuid, target_id: Uuid) -> Result<()> {
    if caller_id == target_id {
        return Err(AppError::Forbidden(
            "Admins cannot modify their own account".to_string(),
        ));
    }
    Ok(())
}

fn ensure_not_admin(target: &User) -> Result<()> {
    if target.role == UserRole::Admin {
        return Err(AppError::Forbidden(
            "Cannot modify another admin".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with_role(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            email: "target@shop.com".to_string(),
            password: "hash".to_string(),
            role,
            created_by: None,
            created_at: Utc::now(),
            updated_by: None,
            updated_at: Utc::now(),
            is_active: true,
            is_deleted: false,
        }
    }

    #[test]
    fn targeting_self_is_forbidden() {
        let id = Uuid::new_v4();
        assert!(matches!(
            ensure_not_self(id, id),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn targeting_another_user_is_allowed() {
        assert!(ensure_not_self(Uuid::new_v4(), Uuid::new_v4()).is_ok());
    }

    #[test]
    fn targeting_an_admin_is_forbidden() {
        assert!(matches!(
            ensure_not_admin(&user_with_role(UserRole::Admin)),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn staff_and_customers_are_modifiable() {
        assert!(ensure_not_admin(&user_with_role(UserRole::Staff)).is_ok());
        assert!(ensure_not_admin(&user_with_role(UserRole::Customer)).is_ok());
    }
}

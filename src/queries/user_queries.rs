use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{User, UserRole},
};

pub async fn create_user(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    role: UserRole,
    is_active: bool,
    created_by: Option<Uuid>,
) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, password, role, is_active, created_by)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .bind(is_active)
    .bind(created_by)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "Email already registered"))?;

    Ok(user)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn list_users(pool: &PgPool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE is_deleted = false ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}

pub async fn activate_user(pool: &PgPool, id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET is_active = true, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn update_email(pool: &PgPool, id: Uuid, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET email = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "Email already registered"))?;

    Ok(user)
}

pub async fn update_role(
    pool: &PgPool,
    id: Uuid,
    role: UserRole,
    updated_by: Uuid,
) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET role = $2, updated_by = $3, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(role)
    .bind(updated_by)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn toggle_active(pool: &PgPool, id: Uuid, updated_by: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET is_active = NOT is_active, updated_by = $2, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(updated_by)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn soft_delete(pool: &PgPool, id: Uuid, updated_by: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET is_deleted = true, updated_by = $2, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(updated_by)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

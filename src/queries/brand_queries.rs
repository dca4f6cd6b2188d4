use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::Result, models::Brand};

pub async fn get_all(pool: &PgPool) -> Result<Vec<Brand>> {
    let brands =
        sqlx::query_as::<_, Brand>("SELECT * FROM brands WHERE is_deleted = false ORDER BY name")
            .fetch_all(pool)
            .await?;

    Ok(brands)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Brand>> {
    let brand = sqlx::query_as::<_, Brand>("SELECT * FROM brands WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(brand)
}

pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Brand>> {
    let brand =
        sqlx::query_as::<_, Brand>("SELECT * FROM brands WHERE name = $1 AND is_deleted = false")
            .bind(name)
            .fetch_optional(pool)
            .await?;

    Ok(brand)
}

pub async fn create_brand(pool: &PgPool, name: &str, description: Option<&str>) -> Result<Brand> {
    let brand = sqlx::query_as::<_, Brand>(
        "INSERT INTO brands (name, description) VALUES ($1, $2) RETURNING *",
    )
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(brand)
}

pub async fn update_brand(
    pool: &PgPool,
    id: Uuid,
    name: &str,
    description: Option<&str>,
) -> Result<Option<Brand>> {
    let brand = sqlx::query_as::<_, Brand>(
        "UPDATE brands SET name = $2, description = $3, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .fetch_optional(pool)
    .await?;

    Ok(brand)
}

pub async fn toggle_active(pool: &PgPool, id: Uuid) -> Result<Option<Brand>> {
    let brand = sqlx::query_as::<_, Brand>(
        "UPDATE brands SET is_active = NOT is_active, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(brand)
}

pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<Option<Brand>> {
    let brand = sqlx::query_as::<_, Brand>(
        "UPDATE brands SET is_deleted = true, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(brand)
}

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    error::Result,
    models::{
        Product, ProductListQuery, ProductVariant, ProductWithVariants, VariantRequest,
        VariantTotals,
    },
};

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// Resolve `page`/`limit` query values into LIMIT/OFFSET bounds.
/// Non-positive values fall back to the defaults; the page size is capped.
fn page_bounds(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let page = match page {
        Some(p) if p > 0 => p,
        _ => 1,
    };
    let limit = match limit {
        Some(l) if l > 0 => l.min(MAX_PAGE_SIZE),
        _ => DEFAULT_PAGE_SIZE,
    };

    (limit, (page - 1) * limit)
}

pub async fn list_products(
    pool: &PgPool,
    params: &ProductListQuery,
) -> Result<Vec<ProductWithVariants>> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
        "SELECT p.* FROM products p
         JOIN categories c ON p.category_id = c.id
         LEFT JOIN brands b ON p.brand_id = b.id
         WHERE p.is_active = true AND p.is_deleted = false",
    );

    if let Some(min_price) = params.min_price {
        query.push(" AND p.min_price >= ");
        query.push_bind(min_price);
    }

    if let Some(max_price) = params.max_price {
        query.push(" AND p.max_price <= ");
        query.push_bind(max_price);
    }

    if let Some(ref category) = params.category {
        query.push(" AND c.name ILIKE ");
        query.push_bind(format!("%{}%", category));
    }

    if let Some(ref brand) = params.brand {
        query.push(" AND b.name ILIKE ");
        query.push_bind(format!("%{}%", brand));
    }

    if let Some(ref search) = params.search {
        query.push(" AND p.name ILIKE ");
        query.push_bind(format!("%{}%", search));
    }

    let (limit, offset) = page_bounds(params.page, params.limit);

    query.push(" ORDER BY p.created_at DESC LIMIT ");
    query.push_bind(limit);
    query.push(" OFFSET ");
    query.push_bind(offset);

    let products = query.build_query_as::<Product>().fetch_all(pool).await?;

    if products.is_empty() {
        return Ok(Vec::new());
    }

    let product_ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
    let mut variants_map = variants_for_products(pool, &product_ids).await?;

    let result = products
        .into_iter()
        .map(|product| {
            let variants = variants_map.remove(&product.id).unwrap_or_default();
            ProductWithVariants { product, variants }
        })
        .collect();

    Ok(result)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

pub async fn create_product(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
    totals: VariantTotals,
    category_id: Uuid,
    brand_id: Option<Uuid>,
) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (name, description, min_price, max_price, total_stock, category_id, brand_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING *",
    )
    .bind(name)
    .bind(description)
    .bind(totals.min_price)
    .bind(totals.max_price)
    .bind(totals.total_stock)
    .bind(category_id)
    .bind(brand_id)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

pub async fn update_product(
    pool: &PgPool,
    id: Uuid,
    name: &str,
    description: Option<&str>,
    totals: VariantTotals,
    category_id: Uuid,
    brand_id: Option<Uuid>,
) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        "UPDATE products
         SET name = $2, description = $3, min_price = $4, max_price = $5,
             total_stock = $6, category_id = $7, brand_id = $8, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(totals.min_price)
    .bind(totals.max_price)
    .bind(totals.total_stock)
    .bind(category_id)
    .bind(brand_id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

pub async fn toggle_active(pool: &PgPool, id: Uuid) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        "UPDATE products SET is_active = NOT is_active, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        "UPDATE products SET is_deleted = true, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

/// Replace a product's variant set with the supplied list.
pub async fn replace_variants(
    pool: &PgPool,
    product_id: Uuid,
    variants: &[VariantRequest],
) -> Result<()> {
    sqlx::query("DELETE FROM product_variants WHERE product_id = $1")
        .bind(product_id)
        .execute(pool)
        .await?;

    if variants.is_empty() {
        return Ok(());
    }

    let mut query_builder = QueryBuilder::<Postgres>::new(
        "INSERT INTO product_variants (product_id, size, color, stock, price, image) ",
    );

    query_builder.push_values(variants, |mut b, variant| {
        b.push_bind(product_id)
            .push_bind(&variant.size)
            .push_bind(&variant.color)
            .push_bind(variant.stock)
            .push_bind(variant.price)
            .push_bind(&variant.image);
    });

    query_builder.build().execute(pool).await?;

    Ok(())
}

pub async fn variants_for_product(pool: &PgPool, product_id: Uuid) -> Result<Vec<ProductVariant>> {
    let variants = sqlx::query_as::<_, ProductVariant>(
        "SELECT * FROM product_variants
         WHERE product_id = $1 AND is_active = true AND is_deleted = false
         ORDER BY created_at",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(variants)
}

/// Batch-load the visible variants for a page of products, grouped by product.
pub async fn variants_for_products(
    pool: &PgPool,
    product_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<ProductVariant>>> {
    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let variants = sqlx::query_as::<_, ProductVariant>(
        "SELECT * FROM product_variants
         WHERE product_id = ANY($1) AND is_active = true AND is_deleted = false
         ORDER BY product_id, created_at",
    )
    .bind(product_ids)
    .fetch_all(pool)
    .await?;

    let mut variants_map: HashMap<Uuid, Vec<ProductVariant>> = HashMap::new();
    for variant in variants {
        variants_map
            .entry(variant.product_id)
            .or_default()
            .push(variant);
    }

    Ok(variants_map)
}

pub async fn toggle_variant_active(pool: &PgPool, id: Uuid) -> Result<Option<ProductVariant>> {
    let variant = sqlx::query_as::<_, ProductVariant>(
        "UPDATE product_variants SET is_active = NOT is_active, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(variant)
}

pub async fn soft_delete_variant(pool: &PgPool, id: Uuid) -> Result<Option<ProductVariant>> {
    let variant = sqlx::query_as::<_, ProductVariant>(
        "UPDATE product_variants SET is_deleted = true, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(variant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        assert_eq!(page_bounds(None, None), (DEFAULT_PAGE_SIZE, 0));
    }

    #[test]
    fn limit_is_capped() {
        let (limit, _) = page_bounds(Some(1), Some(500));
        assert_eq!(limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn offset_follows_page_number() {
        assert_eq!(page_bounds(Some(3), Some(20)), (20, 40));
    }

    #[test]
    fn non_positive_values_fall_back_to_defaults() {
        assert_eq!(page_bounds(Some(0), Some(-5)), (DEFAULT_PAGE_SIZE, 0));
    }
}

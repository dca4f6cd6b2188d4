use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub total_stock: i32,
    pub category_id: Uuid,
    pub brand_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductVariant {
    pub id: Uuid,
    pub product_id: Uuid,
    pub size: String,
    pub color: String,
    pub stock: i32,
    pub price: Decimal,
    pub image: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
    pub is_deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct ProductWithVariants {
    #[serde(flatten)]
    pub product: Product,
    pub variants: Vec<ProductVariant>,
}

#[derive(Debug, Deserialize)]
pub struct VariantRequest {
    pub size: String,
    pub color: String,
    pub stock: i32,
    pub price: Decimal,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub category_name: String,
    pub brand_name: Option<String>,
    pub variants: Vec<VariantRequest>,
}

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantTotals {
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub total_stock: i32,
}

/// Derive the denormalized price range and stock count for a product
/// from its variant list. Returns `None` for an empty list.
pub fn variant_totals(variants: &[VariantRequest]) -> Option<VariantTotals> {
    let first = variants.first()?;

    let mut totals = VariantTotals {
        min_price: first.price,
        max_price: first.price,
        total_stock: 0,
    };

    for variant in variants {
        if variant.price < totals.min_price {
            totals.min_price = variant.price;
        }
        if variant.price > totals.max_price {
            totals.max_price = variant.price;
        }
        totals.total_stock += variant.stock;
    }

    Some(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn variant(price: i64, stock: i32) -> VariantRequest {
        VariantRequest {
            size: "M".to_string(),
            color: "Black".to_string(),
            stock,
            price: Decimal::from(price),
            image: None,
        }
    }

    #[test]
    fn empty_variant_list_has_no_totals() {
        assert_eq!(variant_totals(&[]), None);
    }

    #[test]
    fn totals_span_the_variant_prices_and_sum_stock() {
        let totals = variant_totals(&[variant(10, 5), variant(30, 7), variant(20, 0)]).unwrap();

        assert_eq!(totals.min_price, Decimal::from(10));
        assert_eq!(totals.max_price, Decimal::from(30));
        assert_eq!(totals.total_stock, 12);
    }

    #[test]
    fn single_variant_collapses_the_price_range() {
        let totals = variant_totals(&[variant(25, 3)]).unwrap();

        assert_eq!(totals.min_price, totals.max_price);
        assert_eq!(totals.total_stock, 3);
    }
}

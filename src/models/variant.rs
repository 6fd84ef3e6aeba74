use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductVariant {
    pub id: i32,
    pub product_id: i32,
    pub name: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VariantImage {
    pub id: i32,
    pub variant_id: i32,
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VariantSize {
    pub id: i32,
    pub variant_id: i32,
    pub size_id: i32,
    pub stock: i32,
}

/// Variant-size row joined with the size name.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VariantSizeDetail {
    pub id: i32,
    pub variant_id: i32,
    pub size_id: i32,
    pub size_name: String,
    pub stock: i32,
}

#[derive(Debug, Serialize)]
pub struct VariantDetail {
    #[serde(flatten)]
    pub variant: ProductVariant,
    pub images: Vec<VariantImage>,
    pub sizes: Vec<VariantSizeDetail>,
}

#[derive(Debug, Deserialize)]
pub struct AddVariantSizeRequest {
    pub size_id: Option<i32>,
    pub stock: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStockRequest {
    pub stock: Option<i32>,
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VariantType {
    pub id: i32,
    pub product_id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VariantOption {
    pub id: i32,
    pub variant_type_id: i32,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariantTypeWithOptions {
    #[serde(flatten)]
    pub variant_type: VariantType,
    pub options: Vec<VariantOption>,
}

#[derive(Debug, Deserialize)]
pub struct CreateVariantTypeRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOptionRequest {
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VariantCombination {
    pub id: i32,
    pub product_id: i32,
    pub price: Decimal,
    pub stock: i32,
    pub sku: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CombinationDetail {
    #[serde(flatten)]
    pub combination: VariantCombination,
    pub options: Vec<VariantOption>,
}

/// Link row between a combination and one selected option.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CombinationOptionLink {
    pub combination_id: i32,
    #[sqlx(flatten)]
    pub option: VariantOption,
}

#[derive(Debug, Deserialize)]
pub struct CreateCombinationRequest {
    #[serde(default)]
    pub option_ids: Vec<i32>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub sku: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateCombinationsRequest {
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
}

/// A blank `sku` clears it; an absent or null one leaves it untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateCombinationRequest {
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub sku: Option<String>,
}

#[derive(Debug, Default)]
pub struct CombinationChanges {
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub sku: Option<Option<String>>,
}

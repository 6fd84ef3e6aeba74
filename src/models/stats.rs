use serde::Serialize;

use crate::models::CategoryWithCount;

#[derive(Debug, Serialize)]
pub struct Stats {
    pub products: i64,
    pub categories: i64,
    pub variants: i64,
    pub sizes: i64,
    pub banners: i64,
    pub admins: i64,
    pub total_stock: i64,
    pub out_of_stock: i64,
    pub products_per_category: Vec<CategoryWithCount>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct StatCounts {
    pub products: i64,
    pub categories: i64,
    pub variants: i64,
    pub sizes: i64,
    pub banners: i64,
    pub admins: i64,
    pub total_stock: i64,
    pub out_of_stock: i64,
}

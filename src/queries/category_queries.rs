use sqlx::PgPool;

use crate::{
    error::Result,
    models::{Category, CategoryWithCount},
};

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Category>> {
    let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(category)
}

/// Case-insensitive, so "Shoes" and "shoes" are treated as the same category.
pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Category>> {
    let category =
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE LOWER(name) = LOWER($1)")
            .bind(name)
            .fetch_optional(pool)
            .await?;

    Ok(category)
}

/// All categories with the number of products in each
pub async fn get_all_with_counts(pool: &PgPool) -> Result<Vec<CategoryWithCount>> {
    let categories = sqlx::query_as::<_, CategoryWithCount>(
        "SELECT c.*, COUNT(p.id)::bigint AS product_count
         FROM categories c
         LEFT JOIN products p ON p.category_id = c.id
         GROUP BY c.id
         ORDER BY c.name ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

pub async fn create_category(pool: &PgPool, name: &str, created_by_id: i32) -> Result<Category> {
    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name, created_by_id) VALUES ($1, $2) RETURNING *",
    )
    .bind(name)
    .bind(created_by_id)
    .fetch_one(pool)
    .await?;

    Ok(category)
}

pub async fn update_category(pool: &PgPool, id: i32, name: &str) -> Result<Option<Category>> {
    let category =
        sqlx::query_as::<_, Category>("UPDATE categories SET name = $1 WHERE id = $2 RETURNING *")
            .bind(name)
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(category)
}

pub async fn count_products(pool: &PgPool, id: i32) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*)::bigint FROM products WHERE category_id = $1",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

pub async fn delete_category(pool: &PgPool, id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

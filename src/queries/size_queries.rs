use sqlx::PgPool;

use crate::{error::Result, models::Size};

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Size>> {
    let size = sqlx::query_as::<_, Size>("SELECT * FROM sizes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(size)
}

pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Size>> {
    let size = sqlx::query_as::<_, Size>("SELECT * FROM sizes WHERE LOWER(name) = LOWER($1)")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    Ok(size)
}

pub async fn get_all(pool: &PgPool) -> Result<Vec<Size>> {
    let sizes = sqlx::query_as::<_, Size>("SELECT * FROM sizes ORDER BY id ASC")
        .fetch_all(pool)
        .await?;

    Ok(sizes)
}

pub async fn create_size(pool: &PgPool, name: &str, created_by_id: i32) -> Result<Size> {
    let size = sqlx::query_as::<_, Size>(
        "INSERT INTO sizes (name, created_by_id) VALUES ($1, $2) RETURNING *",
    )
    .bind(name)
    .bind(created_by_id)
    .fetch_one(pool)
    .await?;

    Ok(size)
}

pub async fn update_size(pool: &PgPool, id: i32, name: &str) -> Result<Option<Size>> {
    let size = sqlx::query_as::<_, Size>("UPDATE sizes SET name = $1 WHERE id = $2 RETURNING *")
        .bind(name)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(size)
}

pub async fn count_variant_usage(pool: &PgPool, id: i32) -> Result<i64> {
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::bigint FROM variant_sizes WHERE size_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;

    Ok(count)
}

pub async fn delete_size(pool: &PgPool, id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM sizes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

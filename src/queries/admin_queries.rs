use sqlx::PgPool;

use crate::{
    error::Result,
    models::{Admin, AdminChanges},
};

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Admin>> {
    let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(admin)
}

/// Login lookup: matches the username exactly or the email case-insensitively.
pub async fn find_by_identifier(pool: &PgPool, identifier: &str) -> Result<Option<Admin>> {
    let admin = sqlx::query_as::<_, Admin>(
        "SELECT * FROM admins WHERE username = $1 OR LOWER(email) = LOWER($1) LIMIT 1",
    )
    .bind(identifier)
    .fetch_optional(pool)
    .await?;

    Ok(admin)
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<Admin>> {
    let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(admin)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Admin>> {
    let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE LOWER(email) = LOWER($1)")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(admin)
}

pub async fn get_all(pool: &PgPool) -> Result<Vec<Admin>> {
    let admins = sqlx::query_as::<_, Admin>("SELECT * FROM admins ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;

    Ok(admins)
}

pub async fn create_admin(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
    is_superadmin: bool,
    image_url: Option<&str>,
) -> Result<Admin> {
    let admin = sqlx::query_as::<_, Admin>(
        r#"
        INSERT INTO admins (username, email, password, is_superadmin, image_url)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(is_superadmin)
    .bind(image_url)
    .fetch_one(pool)
    .await?;

    Ok(admin)
}

pub async fn update_admin(pool: &PgPool, id: i32, changes: &AdminChanges) -> Result<Option<Admin>> {
    let admin = sqlx::query_as::<_, Admin>(
        r#"
        UPDATE admins
        SET
            username = COALESCE($1, username),
            email = COALESCE($2, email),
            password = COALESCE($3, password),
            is_superadmin = COALESCE($4, is_superadmin),
            image_url = COALESCE($5, image_url)
        WHERE id = $6
        RETURNING *
        "#,
    )
    .bind(&changes.username)
    .bind(&changes.email)
    .bind(&changes.password_hash)
    .bind(changes.is_superadmin)
    .bind(&changes.image_url)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(admin)
}

pub async fn delete_admin(pool: &PgPool, id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM admins WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::Result,
    models::{Banner, BannerChanges, BannerType},
};

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Banner>> {
    let banner = sqlx::query_as::<_, Banner>("SELECT * FROM banners WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(banner)
}

pub async fn get_all(pool: &PgPool, banner_type: Option<BannerType>) -> Result<Vec<Banner>> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM banners");

    if let Some(banner_type) = banner_type {
        query.push(" WHERE type = ");
        query.push_bind(banner_type.as_str());
    }

    query.push(" ORDER BY position ASC, id ASC");

    let banners = query.build_query_as::<Banner>().fetch_all(pool).await?;

    Ok(banners)
}

pub async fn create_banner(
    pool: &PgPool,
    changes: &BannerChanges,
    admin_id: i32,
) -> Result<Banner> {
    let banner = sqlx::query_as::<_, Banner>(
        r#"
        INSERT INTO banners (
            title, subtitle, button_text, button_link, image_url,
            type, position, product_id, admin_id
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(&changes.title)
    .bind(changes.subtitle.clone().flatten())
    .bind(changes.button_text.clone().flatten())
    .bind(changes.button_link.clone().flatten())
    .bind(&changes.image_url)
    .bind(changes.banner_type.map(|t| t.as_str()))
    .bind(changes.position.unwrap_or(0))
    .bind(changes.product_id.flatten())
    .bind(admin_id)
    .fetch_one(pool)
    .await?;

    Ok(banner)
}

/// Builds the partial UPDATE: only the columns present in `changes` are written.
fn update_query(id: i32, changes: &BannerChanges) -> QueryBuilder<'static, Postgres> {
    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new("UPDATE banners SET updated_at = NOW()");

    if let Some(title) = &changes.title {
        query.push(", title = ").push_bind(title.clone());
    }
    if let Some(subtitle) = &changes.subtitle {
        query.push(", subtitle = ").push_bind(subtitle.clone());
    }
    if let Some(button_text) = &changes.button_text {
        query.push(", button_text = ").push_bind(button_text.clone());
    }
    if let Some(button_link) = &changes.button_link {
        query.push(", button_link = ").push_bind(button_link.clone());
    }
    if let Some(image_url) = &changes.image_url {
        query.push(", image_url = ").push_bind(image_url.clone());
    }
    if let Some(banner_type) = changes.banner_type {
        query.push(", type = ").push_bind(banner_type.as_str());
    }
    if let Some(position) = changes.position {
        query.push(", position = ").push_bind(position);
    }
    if let Some(product_id) = changes.product_id {
        query.push(", product_id = ").push_bind(product_id);
    }

    query.push(" WHERE id = ").push_bind(id).push(" RETURNING *");
    query
}

pub async fn update_banner(
    pool: &PgPool,
    id: i32,
    changes: &BannerChanges,
) -> Result<Option<Banner>> {
    let banner = update_query(id, changes)
        .build_query_as::<Banner>()
        .fetch_optional(pool)
        .await?;

    Ok(banner)
}

pub async fn delete_banner(pool: &PgPool, id: i32) -> Result<Option<Banner>> {
    let banner = sqlx::query_as::<_, Banner>("DELETE FROM banners WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(banner)
}

use std::collections::HashMap;

use sqlx::PgPool;

use crate::{
    error::Result,
    models::{ProductVariant, VariantDetail, VariantImage, VariantSize, VariantSizeDetail},
};

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<ProductVariant>> {
    let variant =
        sqlx::query_as::<_, ProductVariant>("SELECT * FROM product_variants WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(variant)
}

pub async fn get_by_product(pool: &PgPool, product_id: i32) -> Result<Vec<ProductVariant>> {
    let variants = sqlx::query_as::<_, ProductVariant>(
        "SELECT * FROM product_variants WHERE product_id = $1 ORDER BY id ASC",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(variants)
}

/// Variants of a product with their galleries and sized stock, in three queries.
pub async fn get_details_by_product(pool: &PgPool, product_id: i32) -> Result<Vec<VariantDetail>> {
    let variants = get_by_product(pool, product_id).await?;

    if variants.is_empty() {
        return Ok(Vec::new());
    }

    let variant_ids: Vec<i32> = variants.iter().map(|v| v.id).collect();

    let all_images = sqlx::query_as::<_, VariantImage>(
        "SELECT * FROM variant_images WHERE variant_id = ANY($1) ORDER BY id ASC",
    )
    .bind(&variant_ids)
    .fetch_all(pool)
    .await?;

    let all_sizes = find_sizes_for_variants(pool, &variant_ids).await?;

    let mut images_map: HashMap<i32, Vec<VariantImage>> = HashMap::new();
    for image in all_images {
        images_map.entry(image.variant_id).or_default().push(image);
    }

    let mut sizes_map: HashMap<i32, Vec<VariantSizeDetail>> = HashMap::new();
    for size in all_sizes {
        sizes_map.entry(size.variant_id).or_default().push(size);
    }

    let details = variants
        .into_iter()
        .map(|variant| VariantDetail {
            images: images_map.remove(&variant.id).unwrap_or_default(),
            sizes: sizes_map.remove(&variant.id).unwrap_or_default(),
            variant,
        })
        .collect();

    Ok(details)
}

pub async fn create_variant(
    pool: &PgPool,
    product_id: i32,
    name: &str,
    image_url: Option<&str>,
) -> Result<ProductVariant> {
    let variant = sqlx::query_as::<_, ProductVariant>(
        "INSERT INTO product_variants (product_id, name, image_url)
         VALUES ($1, $2, $3)
         RETURNING *",
    )
    .bind(product_id)
    .bind(name)
    .bind(image_url)
    .fetch_one(pool)
    .await?;

    Ok(variant)
}

pub async fn update_variant(
    pool: &PgPool,
    id: i32,
    name: Option<&str>,
    image_url: Option<&str>,
) -> Result<Option<ProductVariant>> {
    let variant = sqlx::query_as::<_, ProductVariant>(
        "UPDATE product_variants
         SET name = COALESCE($1, name), image_url = COALESCE($2, image_url)
         WHERE id = $3
         RETURNING *",
    )
    .bind(name)
    .bind(image_url)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(variant)
}

pub async fn find_gallery_urls(pool: &PgPool, variant_id: i32) -> Result<Vec<String>> {
    let urls = sqlx::query_scalar::<_, String>(
        "SELECT image_url FROM variant_images WHERE variant_id = $1",
    )
    .bind(variant_id)
    .fetch_all(pool)
    .await?;

    Ok(urls)
}

pub async fn delete_variant(pool: &PgPool, id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM product_variants WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

// Gallery

pub async fn add_image(pool: &PgPool, variant_id: i32, image_url: &str) -> Result<VariantImage> {
    let image = sqlx::query_as::<_, VariantImage>(
        "INSERT INTO variant_images (variant_id, image_url) VALUES ($1, $2) RETURNING *",
    )
    .bind(variant_id)
    .bind(image_url)
    .fetch_one(pool)
    .await?;

    Ok(image)
}

pub async fn delete_image(pool: &PgPool, id: i32) -> Result<Option<VariantImage>> {
    let image = sqlx::query_as::<_, VariantImage>(
        "DELETE FROM variant_images WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(image)
}

// Sized stock

const SIZE_DETAIL_SELECT: &str = "SELECT vs.id, vs.variant_id, vs.size_id, s.name AS size_name, vs.stock
     FROM variant_sizes vs
     INNER JOIN sizes s ON s.id = vs.size_id";

pub async fn find_sizes_for_variants(
    pool: &PgPool,
    variant_ids: &[i32],
) -> Result<Vec<VariantSizeDetail>> {
    let sizes = sqlx::query_as::<_, VariantSizeDetail>(&format!(
        "{} WHERE vs.variant_id = ANY($1) ORDER BY s.id ASC",
        SIZE_DETAIL_SELECT
    ))
    .bind(variant_ids)
    .fetch_all(pool)
    .await?;

    Ok(sizes)
}

pub async fn find_size_detail(pool: &PgPool, id: i32) -> Result<Option<VariantSizeDetail>> {
    let size = sqlx::query_as::<_, VariantSizeDetail>(&format!(
        "{} WHERE vs.id = $1",
        SIZE_DETAIL_SELECT
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(size)
}

pub async fn find_variant_size(
    pool: &PgPool,
    variant_id: i32,
    size_id: i32,
) -> Result<Option<VariantSize>> {
    let row = sqlx::query_as::<_, VariantSize>(
        "SELECT * FROM variant_sizes WHERE variant_id = $1 AND size_id = $2",
    )
    .bind(variant_id)
    .bind(size_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn add_size(
    pool: &PgPool,
    variant_id: i32,
    size_id: i32,
    stock: i32,
) -> Result<VariantSize> {
    let row = sqlx::query_as::<_, VariantSize>(
        "INSERT INTO variant_sizes (variant_id, size_id, stock)
         VALUES ($1, $2, $3)
         RETURNING *",
    )
    .bind(variant_id)
    .bind(size_id)
    .bind(stock)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn update_stock(pool: &PgPool, id: i32, stock: i32) -> Result<Option<VariantSize>> {
    let row = sqlx::query_as::<_, VariantSize>(
        "UPDATE variant_sizes SET stock = $1 WHERE id = $2 RETURNING *",
    )
    .bind(stock)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete_size(pool: &PgPool, id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM variant_sizes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

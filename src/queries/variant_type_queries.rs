use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::Result,
    models::{
        CombinationChanges, CombinationDetail, CombinationOptionLink, VariantCombination,
        VariantOption, VariantType, VariantTypeWithOptions,
    },
};

// Variant types

pub async fn find_type_by_id(pool: &PgPool, id: i32) -> Result<Option<VariantType>> {
    let variant_type =
        sqlx::query_as::<_, VariantType>("SELECT * FROM variant_types WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(variant_type)
}

pub async fn find_type_by_name(
    pool: &PgPool,
    product_id: i32,
    name: &str,
) -> Result<Option<VariantType>> {
    let variant_type = sqlx::query_as::<_, VariantType>(
        "SELECT * FROM variant_types WHERE product_id = $1 AND LOWER(name) = LOWER($2)",
    )
    .bind(product_id)
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(variant_type)
}

pub async fn get_types_with_options(
    pool: &PgPool,
    product_id: i32,
) -> Result<Vec<VariantTypeWithOptions>> {
    let types = sqlx::query_as::<_, VariantType>(
        "SELECT * FROM variant_types WHERE product_id = $1 ORDER BY id ASC",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    if types.is_empty() {
        return Ok(Vec::new());
    }

    let type_ids: Vec<i32> = types.iter().map(|t| t.id).collect();

    let all_options = sqlx::query_as::<_, VariantOption>(
        "SELECT * FROM variant_options WHERE variant_type_id = ANY($1) ORDER BY id ASC",
    )
    .bind(&type_ids)
    .fetch_all(pool)
    .await?;

    let mut options_map: HashMap<i32, Vec<VariantOption>> = HashMap::new();
    for option in all_options {
        options_map
            .entry(option.variant_type_id)
            .or_default()
            .push(option);
    }

    Ok(types
        .into_iter()
        .map(|variant_type| VariantTypeWithOptions {
            options: options_map.remove(&variant_type.id).unwrap_or_default(),
            variant_type,
        })
        .collect())
}

pub async fn create_type(pool: &PgPool, product_id: i32, name: &str) -> Result<VariantType> {
    let variant_type = sqlx::query_as::<_, VariantType>(
        "INSERT INTO variant_types (product_id, name) VALUES ($1, $2) RETURNING *",
    )
    .bind(product_id)
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(variant_type)
}

pub async fn update_type(pool: &PgPool, id: i32, name: &str) -> Result<Option<VariantType>> {
    let variant_type = sqlx::query_as::<_, VariantType>(
        "UPDATE variant_types SET name = $1 WHERE id = $2 RETURNING *",
    )
    .bind(name)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(variant_type)
}

pub async fn delete_type(pool: &PgPool, id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM variant_types WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// Options

pub async fn find_option_by_value(
    pool: &PgPool,
    variant_type_id: i32,
    value: &str,
) -> Result<Option<VariantOption>> {
    let option = sqlx::query_as::<_, VariantOption>(
        "SELECT * FROM variant_options WHERE variant_type_id = $1 AND LOWER(value) = LOWER($2)",
    )
    .bind(variant_type_id)
    .bind(value)
    .fetch_optional(pool)
    .await?;

    Ok(option)
}

pub async fn create_options(
    pool: &PgPool,
    variant_type_id: i32,
    values: &[String],
) -> Result<Vec<VariantOption>> {
    if values.is_empty() {
        return Ok(Vec::new());
    }

    let mut query_builder: QueryBuilder<Postgres> =
        QueryBuilder::new("INSERT INTO variant_options (variant_type_id, value) ");

    query_builder.push_values(values, |mut b, value| {
        b.push_bind(variant_type_id).push_bind(value);
    });
    query_builder.push(" RETURNING *");

    let options = query_builder
        .build_query_as::<VariantOption>()
        .fetch_all(pool)
        .await?;

    Ok(options)
}

/// Combinations that select this option.
pub async fn count_option_usage(pool: &PgPool, option_id: i32) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM variant_combination_options WHERE option_id = $1",
    )
    .bind(option_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Combinations that select any option of this variant type.
pub async fn count_type_usage(pool: &PgPool, variant_type_id: i32) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(DISTINCT vco.combination_id)
         FROM variant_combination_options vco
         INNER JOIN variant_options vo ON vo.id = vco.option_id
         WHERE vo.variant_type_id = $1",
    )
    .bind(variant_type_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

pub async fn delete_option(pool: &PgPool, id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM variant_options WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// Combinations

pub async fn find_combination_by_id(pool: &PgPool, id: i32) -> Result<Option<VariantCombination>> {
    let combination = sqlx::query_as::<_, VariantCombination>(
        "SELECT * FROM variant_combinations WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(combination)
}

pub async fn find_combination_by_sku(
    pool: &PgPool,
    sku: &str,
) -> Result<Option<VariantCombination>> {
    let combination = sqlx::query_as::<_, VariantCombination>(
        "SELECT * FROM variant_combinations WHERE sku = $1",
    )
    .bind(sku)
    .fetch_optional(pool)
    .await?;

    Ok(combination)
}

pub async fn get_combinations(pool: &PgPool, product_id: i32) -> Result<Vec<CombinationDetail>> {
    let combinations = sqlx::query_as::<_, VariantCombination>(
        "SELECT * FROM variant_combinations WHERE product_id = $1 ORDER BY id ASC",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    attach_options(pool, combinations).await
}

pub async fn get_combination_detail(
    pool: &PgPool,
    combination: VariantCombination,
) -> Result<CombinationDetail> {
    let mut details = attach_options(pool, vec![combination]).await?;
    Ok(details.remove(0))
}

async fn attach_options(
    pool: &PgPool,
    combinations: Vec<VariantCombination>,
) -> Result<Vec<CombinationDetail>> {
    if combinations.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = combinations.iter().map(|c| c.id).collect();

    let links = sqlx::query_as::<_, CombinationOptionLink>(
        "SELECT vco.combination_id, vo.id, vo.variant_type_id, vo.value
         FROM variant_combination_options vco
         INNER JOIN variant_options vo ON vo.id = vco.option_id
         WHERE vco.combination_id = ANY($1)
         ORDER BY vo.variant_type_id ASC, vo.id ASC",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut options_map: HashMap<i32, Vec<VariantOption>> = HashMap::new();
    for link in links {
        options_map
            .entry(link.combination_id)
            .or_default()
            .push(link.option);
    }

    Ok(combinations
        .into_iter()
        .map(|combination| CombinationDetail {
            options: options_map.remove(&combination.id).unwrap_or_default(),
            combination,
        })
        .collect())
}

/// Inserts the combination row and its option links in one transaction.
pub async fn create_combination(
    pool: &PgPool,
    product_id: i32,
    option_ids: &[i32],
    price: Decimal,
    stock: i32,
    sku: Option<&str>,
) -> Result<VariantCombination> {
    let mut tx = pool.begin().await?;

    let combination = sqlx::query_as::<_, VariantCombination>(
        "INSERT INTO variant_combinations (product_id, price, stock, sku)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(product_id)
    .bind(price)
    .bind(stock)
    .bind(sku)
    .fetch_one(&mut *tx)
    .await?;

    let mut query_builder: QueryBuilder<Postgres> =
        QueryBuilder::new("INSERT INTO variant_combination_options (combination_id, option_id) ");

    query_builder.push_values(option_ids, |mut b, option_id| {
        b.push_bind(combination.id).push_bind(option_id);
    });

    query_builder.build().execute(&mut *tx).await?;
    tx.commit().await?;

    Ok(combination)
}

fn update_combination_query(
    id: i32,
    changes: &CombinationChanges,
) -> QueryBuilder<'static, Postgres> {
    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new("UPDATE variant_combinations SET id = id");

    if let Some(price) = changes.price {
        query.push(", price = ").push_bind(price);
    }
    if let Some(stock) = changes.stock {
        query.push(", stock = ").push_bind(stock);
    }
    if let Some(sku) = &changes.sku {
        query.push(", sku = ").push_bind(sku.clone());
    }

    query.push(" WHERE id = ").push_bind(id).push(" RETURNING *");
    query
}

pub async fn update_combination(
    pool: &PgPool,
    id: i32,
    changes: &CombinationChanges,
) -> Result<Option<VariantCombination>> {
    let combination = update_combination_query(id, changes)
        .build_query_as::<VariantCombination>()
        .fetch_optional(pool)
        .await?;

    Ok(combination)
}

pub async fn set_combination_image(
    pool: &PgPool,
    id: i32,
    image_url: &str,
) -> Result<Option<VariantCombination>> {
    let combination = sqlx::query_as::<_, VariantCombination>(
        "UPDATE variant_combinations SET image_url = $1 WHERE id = $2 RETURNING *",
    )
    .bind(image_url)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(combination)
}

pub async fn delete_combination(pool: &PgPool, id: i32) -> Result<Option<VariantCombination>> {
    let combination = sqlx::query_as::<_, VariantCombination>(
        "DELETE FROM variant_combinations WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(combination)
}

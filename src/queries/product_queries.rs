use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::Result,
    models::{
        Product, ProductChanges, ProductListItem, ProductListResponse, ProductQuery, SortBy,
    },
};

const DEFAULT_PAGE_SIZE: i64 = 12;
const MAX_PAGE_SIZE: i64 = 100;

/// Clamps client supplied paging to sane bounds.
pub fn page_bounds(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

/// Escapes `LIKE` wildcards so user input only matches literally.
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());

    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

/// Appends the search filters as `AND` clauses after a `WHERE 1=1`.
fn push_filters(query: &mut QueryBuilder<'_, Postgres>, params: &ProductQuery) {
    if let Some(q) = params.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", escape_like(q));
        query.push(" AND (p.name ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR p.description ILIKE ");
        query.push_bind(pattern);
        query.push(")");
    }

    if let Some(category_id) = params.category_id {
        query.push(" AND p.category_id = ");
        query.push_bind(category_id);
    }

    if let Some(min_price) = params.min_price {
        query.push(" AND p.price >= ");
        query.push_bind(min_price);
    }

    if let Some(max_price) = params.max_price {
        query.push(" AND p.price <= ");
        query.push_bind(max_price);
    }
}

async fn count_matches(pool: &PgPool, params: &ProductQuery) -> Result<i64> {
    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM products p WHERE 1=1");
    push_filters(&mut query, params);

    let total = query.build_query_scalar::<i64>().fetch_one(pool).await?;

    Ok(total)
}

pub async fn search_products(pool: &PgPool, params: ProductQuery) -> Result<ProductListResponse> {
    let (limit, offset) = page_bounds(params.limit, params.offset);

    let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
        "SELECT p.*, c.name AS category_name, COUNT(*) OVER() AS total_count
         FROM products p
         INNER JOIN categories c ON c.id = p.category_id
         WHERE 1=1",
    );

    push_filters(&mut query, &params);

    query.push(" ORDER BY ");
    query.push(match params.sort_by.unwrap_or(SortBy::Newest) {
        SortBy::Newest => "p.created_at DESC, p.id DESC",
        SortBy::PriceAsc => "p.price ASC, p.id ASC",
        SortBy::PriceDesc => "p.price DESC, p.id ASC",
        SortBy::Name => "p.name ASC, p.id ASC",
    });

    query.push(" LIMIT ");
    query.push_bind(limit);
    query.push(" OFFSET ");
    query.push_bind(offset);

    #[derive(sqlx::FromRow)]
    struct SearchResult {
        #[sqlx(flatten)]
        item: ProductListItem,
        total_count: i64,
    }

    let results = query
        .build_query_as::<SearchResult>()
        .fetch_all(pool)
        .await?;

    // A page past the end carries no window count.
    let total = match results.first() {
        Some(row) => row.total_count,
        None if offset > 0 => count_matches(pool, &params).await?,
        None => 0,
    };
    let products = results.into_iter().map(|r| r.item).collect();

    Ok(ProductListResponse {
        products,
        total,
        limit,
        offset,
    })
}

pub async fn create_product(
    pool: &PgPool,
    changes: &ProductChanges,
    admin_id: i32,
) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (name, price, description, image_url, category_id, admin_id, colours)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(&changes.name)
    .bind(changes.price)
    .bind(changes.description.clone().flatten())
    .bind(&changes.image_url)
    .bind(changes.category_id)
    .bind(admin_id)
    .bind(changes.colours.clone().unwrap_or_default())
    .fetch_one(pool)
    .await?;

    Ok(product)
}

/// Partial UPDATE over the columns present in `changes`. `SET id = id` keeps
/// the statement valid when nothing else was sent.
fn update_query(id: i32, changes: &ProductChanges) -> QueryBuilder<'static, Postgres> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE products SET id = id");

    if let Some(name) = &changes.name {
        query.push(", name = ").push_bind(name.clone());
    }
    if let Some(price) = changes.price {
        query.push(", price = ").push_bind(price);
    }
    if let Some(description) = &changes.description {
        query.push(", description = ").push_bind(description.clone());
    }
    if let Some(image_url) = &changes.image_url {
        query.push(", image_url = ").push_bind(image_url.clone());
    }
    if let Some(category_id) = changes.category_id {
        query.push(", category_id = ").push_bind(category_id);
    }
    if let Some(colours) = &changes.colours {
        query.push(", colours = ").push_bind(colours.clone());
    }

    query.push(" WHERE id = ").push_bind(id).push(" RETURNING *");
    query
}

pub async fn update_product(
    pool: &PgPool,
    id: i32,
    changes: &ProductChanges,
) -> Result<Option<Product>> {
    let product = update_query(id, changes)
        .build_query_as::<Product>()
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

/// Every stored image URL hanging off a product: its own, its variants',
/// their galleries' and its combinations'.
pub async fn find_all_image_urls(pool: &PgPool, id: i32) -> Result<Vec<String>> {
    let urls = sqlx::query_scalar::<_, String>(
        r#"
        SELECT image_url FROM products WHERE id = $1 AND image_url IS NOT NULL
        UNION ALL
        SELECT image_url FROM product_variants WHERE product_id = $1 AND image_url IS NOT NULL
        UNION ALL
        SELECT vi.image_url FROM variant_images vi
            INNER JOIN product_variants pv ON pv.id = vi.variant_id
            WHERE pv.product_id = $1
        UNION ALL
        SELECT image_url FROM variant_combinations WHERE product_id = $1 AND image_url IS NOT NULL
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(urls)
}

pub async fn delete_product(pool: &PgPool, id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

use sqlx::PgPool;

use crate::{
    error::Result,
    models::{StatCounts, Stats},
    queries::category_queries,
};

pub async fn get_stats(pool: &PgPool) -> Result<Stats> {
    let counts = sqlx::query_as::<_, StatCounts>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM products)::bigint AS products,
            (SELECT COUNT(*) FROM categories)::bigint AS categories,
            (SELECT COUNT(*) FROM product_variants)::bigint AS variants,
            (SELECT COUNT(*) FROM sizes)::bigint AS sizes,
            (SELECT COUNT(*) FROM banners)::bigint AS banners,
            (SELECT COUNT(*) FROM admins)::bigint AS admins,
            (SELECT COALESCE(SUM(stock), 0) FROM variant_sizes)::bigint AS total_stock,
            (SELECT COUNT(*) FROM variant_sizes WHERE stock = 0)::bigint AS out_of_stock
        "#,
    )
    .fetch_one(pool)
    .await?;

    let products_per_category = category_queries::get_all_with_counts(pool).await?;

    Ok(Stats {
        products: counts.products,
        categories: counts.categories,
        variants: counts.variants,
        sizes: counts.sizes,
        banners: counts.banners,
        admins: counts.admins,
        total_stock: counts.total_stock,
        out_of_stock: counts.out_of_stock,
        products_per_category,
    })
}

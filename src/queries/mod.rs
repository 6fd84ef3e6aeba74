pub mod admin_queries;
pub mod banner_queries;
pub mod category_queries;
pub mod product_queries;
pub mod size_queries;
pub mod stats_queries;
pub mod variant_queries;
pub mod variant_type_queries;

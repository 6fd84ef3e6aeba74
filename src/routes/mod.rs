mod admins;
mod auth;
mod banners;
mod categories;
mod combinations;
mod health;
mod products;
mod sizes;
mod stats;
mod variant_types;
mod variants;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post, put},
};

use crate::{
    AppState,
    middleware::{auth_middleware, superadmin_middleware},
};

pub fn create_router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/api/admin/login", post(auth::login))
        .route("/api/categories", get(categories::list_categories))
        .route("/api/sizes", get(sizes::list_sizes))
        .route("/api/products", get(products::search_products))
        .route("/api/products/{id}", get(products::get_product))
        .route("/api/banners", get(banners::list_banners));

    let superadmin = Router::new()
        .route(
            "/api/admin/admins",
            get(admins::list_admins).post(admins::create_admin),
        )
        .route(
            "/api/admin/admins/{id}",
            put(admins::update_admin).delete(admins::delete_admin),
        )
        .route_layer(axum_middleware::from_fn(superadmin_middleware));

    let admin = Router::new()
        .route("/api/admin/me", get(auth::me))
        .route("/api/admin/stats", get(stats::get_stats))
        // categories & sizes
        .route("/api/admin/categories", post(categories::create_category))
        .route(
            "/api/admin/categories/{id}",
            put(categories::update_category).delete(categories::delete_category),
        )
        .route("/api/admin/sizes", post(sizes::create_size))
        .route(
            "/api/admin/sizes/{id}",
            put(sizes::update_size).delete(sizes::delete_size),
        )
        // products
        .route("/api/admin/products", post(products::create_product))
        .route(
            "/api/admin/products/{id}",
            put(products::update_product).delete(products::delete_product),
        )
        // variants
        .route(
            "/api/admin/products/{id}/variants",
            get(variants::list_variants).post(variants::create_variant),
        )
        .route(
            "/api/admin/variants/{id}",
            put(variants::update_variant).delete(variants::delete_variant),
        )
        .route(
            "/api/admin/variants/{id}/images",
            post(variants::add_variant_images),
        )
        .route(
            "/api/admin/variant-images/{id}",
            delete(variants::delete_variant_image),
        )
        .route(
            "/api/admin/variants/{id}/sizes",
            get(variants::list_variant_sizes).post(variants::add_variant_size),
        )
        .route(
            "/api/admin/variant-sizes/{id}",
            put(variants::update_variant_size).delete(variants::delete_variant_size),
        )
        // variant types, options, combinations
        .route(
            "/api/admin/products/{id}/variant-types",
            get(variant_types::list_variant_types).post(variant_types::create_variant_type),
        )
        .route(
            "/api/admin/variant-types/{id}",
            put(variant_types::update_variant_type).delete(variant_types::delete_variant_type),
        )
        .route(
            "/api/admin/variant-types/{id}/options",
            post(variant_types::add_option),
        )
        .route(
            "/api/admin/variant-options/{id}",
            delete(variant_types::delete_option),
        )
        .route(
            "/api/admin/products/{id}/combinations",
            get(combinations::list_combinations).post(combinations::create_combination),
        )
        .route(
            "/api/admin/products/{id}/combinations/generate",
            post(combinations::generate_combinations),
        )
        .route(
            "/api/admin/combinations/{id}",
            put(combinations::update_combination).delete(combinations::delete_combination),
        )
        .route(
            "/api/admin/combinations/{id}/image",
            post(combinations::upload_combination_image),
        )
        // banners
        .route("/api/admin/banners", post(banners::create_banner))
        .route(
            "/api/admin/banners/{id}",
            put(banners::update_banner).delete(banners::delete_banner),
        )
        .merge(superadmin)
        .route_layer(axum_middleware::from_fn_with_state(state, auth_middleware));

    public.merge(admin)
}

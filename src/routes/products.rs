use axum::{Extension, Json, extract::State};
use http::StatusCode;
use rust_decimal::Decimal;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        CurrentAdmin, Product, ProductChanges, ProductDetail, ProductListResponse, ProductQuery,
    },
    queries::{category_queries, product_queries, variant_queries, variant_type_queries},
    services::image_service::PRODUCT_FOLDER,
    utils::{
        extractors::{AppPath, AppQuery},
        form::FormData,
        validation::{optional_text, parse_colours, validate_price},
    },
};

/// Reads the product fields of a form; every field is optional here.
fn product_changes(form: &FormData) -> Result<ProductChanges> {
    Ok(ProductChanges {
        name: optional_text("name", form.text("name"))?,
        price: form
            .parse::<Decimal>("price")?
            .map(validate_price)
            .transpose()?,
        description: form.nullable_text("description"),
        category_id: form.parse::<i32>("category_id")?,
        colours: form.text("colours").map(parse_colours),
        image_url: None,
    })
}

async fn ensure_category(state: &AppState, category_id: Option<i32>) -> Result<()> {
    if let Some(category_id) = category_id {
        if category_queries::find_by_id(&state.db, category_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "Category with id {} not found",
                category_id
            )));
        }
    }

    Ok(())
}

pub async fn search_products(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ProductQuery>,
) -> Result<Json<ProductListResponse>> {
    if let (Some(min), Some(max)) = (params.min_price, params.max_price) {
        if min > max {
            return Err(AppError::BadRequest(
                "min_price cannot be greater than max_price".to_string(),
            ));
        }
    }

    let response = product_queries::search_products(&state.db, params).await?;

    Ok(Json(response))
}

pub async fn get_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<ProductDetail>> {
    let product = product_queries::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("Product not found".to_string()))?;

    let category = category_queries::find_by_id(&state.db, product.category_id).await?;
    let variants = variant_queries::get_details_by_product(&state.db, id).await?;
    let variant_types = variant_type_queries::get_types_with_options(&state.db, id).await?;
    let combinations = variant_type_queries::get_combinations(&state.db, id).await?;

    Ok(Json(ProductDetail {
        product,
        category,
        variants,
        variant_types,
        combinations,
    }))
}

pub async fn create_product(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    form: FormData,
) -> Result<(StatusCode, Json<Product>)> {
    let mut changes = product_changes(&form)?;

    if changes.name.is_none() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    if changes.price.is_none() {
        return Err(AppError::BadRequest("price is required".to_string()));
    }

    if changes.category_id.is_none() {
        return Err(AppError::BadRequest("category_id is required".to_string()));
    }

    ensure_category(&state, changes.category_id).await?;

    if let Some(file) = form.file("image") {
        changes.image_url = Some(state.images.upload(PRODUCT_FOLDER, file).await?);
    }

    let product = state
        .images
        .discard_on_error(
            changes.image_url.as_deref(),
            product_queries::create_product(&state.db, &changes, current.id).await,
        )
        .await?;

    tracing::info!(product_id = product.id, admin_id = current.id, "Product created");

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    form: FormData,
) -> Result<Json<Product>> {
    let existing = product_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))?;
    let mut changes = product_changes(&form)?;

    ensure_category(&state, changes.category_id).await?;

    if let Some(file) = form.file("image") {
        changes.image_url = Some(state.images.upload(PRODUCT_FOLDER, file).await?);
    }

    let product = state
        .images
        .discard_on_error(
            changes.image_url.as_deref(),
            product_queries::update_product(&state.db, id, &changes).await,
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))?;

    if changes.image_url.is_some() {
        state.images.remove(existing.image_url.as_deref()).await;
    }

    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode> {
    if product_queries::find_by_id(&state.db, id).await?.is_none() {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    let image_urls = product_queries::find_all_image_urls(&state.db, id).await?;

    product_queries::delete_product(&state.db, id).await?;

    state
        .images
        .remove_all(image_urls.iter().map(String::as_str))
        .await;

    tracing::info!(product_id = id, images = image_urls.len(), "Product deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_fields_become_product_changes() {
        let form = FormData::default()
            .with_field("name", " Linen Shirt ")
            .with_field("price", "49.90")
            .with_field("description", "   ")
            .with_field("category_id", "3")
            .with_field("colours", "white, navy");

        let changes = product_changes(&form).unwrap();

        assert_eq!(changes.name.as_deref(), Some("Linen Shirt"));
        assert_eq!(changes.price, Some(Decimal::new(4990, 2)));
        assert_eq!(changes.description, Some(None));
        assert_eq!(changes.category_id, Some(3));
        assert_eq!(
            changes.colours,
            Some(vec!["white".to_string(), "navy".to_string()])
        );
    }

    #[test]
    fn missing_fields_stay_untouched() {
        let changes = product_changes(&FormData::default()).unwrap();

        assert!(changes.name.is_none());
        assert!(changes.price.is_none());
        assert!(changes.description.is_none());
        assert!(changes.colours.is_none());
    }

    #[test]
    fn bad_price_is_rejected() {
        let negative = FormData::default().with_field("price", "-3");
        assert!(matches!(
            product_changes(&negative),
            Err(AppError::BadRequest(_))
        ));

        let garbage = FormData::default().with_field("price", "free");
        assert!(product_changes(&garbage).is_err());
    }

    #[test]
    fn blank_name_is_rejected() {
        let form = FormData::default().with_field("name", "  ");
        assert!(product_changes(&form).is_err());
    }
}

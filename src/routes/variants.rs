use axum::{Json, extract::State};
use http::StatusCode;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        AddVariantSizeRequest, ProductVariant, UpdateStockRequest, VariantDetail, VariantImage,
        VariantSizeDetail,
    },
    queries::{product_queries, size_queries, variant_queries},
    services::image_service::VARIANT_FOLDER,
    utils::{
        extractors::{AppJson, AppPath},
        form::FormData,
        validation::{optional_text, require_text, validate_stock},
    },
};

async fn find_variant(state: &AppState, id: i32) -> Result<ProductVariant> {
    variant_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Variant with id {} not found", id)))
}

async fn ensure_product(state: &AppState, product_id: i32) -> Result<()> {
    if product_queries::find_by_id(&state.db, product_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(format!(
            "Product with id {} not found",
            product_id
        )));
    }

    Ok(())
}

pub async fn list_variants(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<i32>,
) -> Result<Json<Vec<VariantDetail>>> {
    ensure_product(&state, product_id).await?;

    let variants = variant_queries::get_details_by_product(&state.db, product_id).await?;

    Ok(Json(variants))
}

pub async fn create_variant(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<i32>,
    form: FormData,
) -> Result<(StatusCode, Json<ProductVariant>)> {
    ensure_product(&state, product_id).await?;
    let name = require_text("name", form.text("name"))?;

    let image_url = match form.file("image") {
        Some(file) => Some(state.images.upload(VARIANT_FOLDER, file).await?),
        None => None,
    };

    let variant = state
        .images
        .discard_on_error(
            image_url.as_deref(),
            variant_queries::create_variant(&state.db, product_id, &name, image_url.as_deref())
                .await,
        )
        .await?;

    tracing::info!(variant_id = variant.id, product_id, "Variant created");

    Ok((StatusCode::CREATED, Json(variant)))
}

pub async fn update_variant(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    form: FormData,
) -> Result<Json<ProductVariant>> {
    let existing = find_variant(&state, id).await?;
    let name = optional_text("name", form.text("name"))?;

    let image_url = match form.file("image") {
        Some(file) => Some(state.images.upload(VARIANT_FOLDER, file).await?),
        None => None,
    };

    let variant = state
        .images
        .discard_on_error(
            image_url.as_deref(),
            variant_queries::update_variant(&state.db, id, name.as_deref(), image_url.as_deref())
                .await,
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Variant with id {} not found", id)))?;

    if image_url.is_some() {
        state.images.remove(existing.image_url.as_deref()).await;
    }

    Ok(Json(variant))
}

pub async fn delete_variant(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode> {
    let existing = find_variant(&state, id).await?;
    let gallery = variant_queries::find_gallery_urls(&state.db, id).await?;

    variant_queries::delete_variant(&state.db, id).await?;

    state.images.remove(existing.image_url.as_deref()).await;
    state
        .images
        .remove_all(gallery.iter().map(String::as_str))
        .await;

    tracing::info!(variant_id = id, "Variant deleted");

    Ok(StatusCode::NO_CONTENT)
}

// Gallery

pub async fn add_variant_images(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    form: FormData,
) -> Result<(StatusCode, Json<Vec<VariantImage>>)> {
    find_variant(&state, id).await?;
    let files: Vec<_> = form.files("images").chain(form.files("image")).collect();

    if files.is_empty() {
        return Err(AppError::BadRequest(
            "At least one image is required".to_string(),
        ));
    }

    let mut images = Vec::with_capacity(files.len());

    for file in files {
        let url = state.images.upload(VARIANT_FOLDER, file).await?;
        let image = state
            .images
            .discard_on_error(
                Some(url.as_str()),
                variant_queries::add_image(&state.db, id, &url).await,
            )
            .await?;
        images.push(image);
    }

    Ok((StatusCode::CREATED, Json(images)))
}

pub async fn delete_variant_image(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode> {
    let image = variant_queries::delete_image(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Variant image with id {} not found", id)))?;

    state.images.remove(Some(image.image_url.as_str())).await;

    Ok(StatusCode::NO_CONTENT)
}

// Sized stock

pub async fn list_variant_sizes(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<Vec<VariantSizeDetail>>> {
    find_variant(&state, id).await?;

    let sizes = variant_queries::find_sizes_for_variants(&state.db, &[id]).await?;

    Ok(Json(sizes))
}

pub async fn add_variant_size(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<AddVariantSizeRequest>,
) -> Result<(StatusCode, Json<VariantSizeDetail>)> {
    let size_id = payload
        .size_id
        .ok_or_else(|| AppError::BadRequest("size_id is required".to_string()))?;
    let stock = validate_stock(payload.stock.unwrap_or(0))?;

    find_variant(&state, id).await?;

    if size_queries::find_by_id(&state.db, size_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Size with id {} not found",
            size_id
        )));
    }

    if variant_queries::find_variant_size(&state.db, id, size_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "This size is already attached to the variant".to_string(),
        ));
    }

    let row = variant_queries::add_size(&state.db, id, size_id, stock).await?;

    let detail = variant_queries::find_size_detail(&state.db, row.id)
        .await?
        .ok_or_else(|| AppError::InternalError("Variant size vanished after insert".to_string()))?;

    Ok((StatusCode::CREATED, Json(detail)))
}

pub async fn update_variant_size(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateStockRequest>,
) -> Result<Json<VariantSizeDetail>> {
    let stock = payload
        .stock
        .ok_or_else(|| AppError::BadRequest("stock is required".to_string()))
        .and_then(validate_stock)?;

    variant_queries::update_stock(&state.db, id, stock)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Variant size with id {} not found", id)))?;

    let detail = variant_queries::find_size_detail(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Variant size with id {} not found", id)))?;

    Ok(Json(detail))
}

pub async fn delete_variant_size(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode> {
    if !variant_queries::delete_size(&state.db, id).await? {
        return Err(AppError::NotFound(format!(
            "Variant size with id {} not found",
            id
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}

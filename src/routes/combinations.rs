use axum::{Json, extract::State};
use http::StatusCode;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        CombinationChanges, CombinationDetail, CreateCombinationRequest, GenerateCombinationsRequest, Product,
        UpdateCombinationRequest,
    },
    queries::{product_queries, variant_type_queries},
    services::{
        combination_service::{existing_selections, missing_selections, validate_selection},
        image_service::COMBINATION_FOLDER,
    },
    utils::{
        extractors::{AppJson, AppPath},
        form::FormData,
        validation::{validate_price, validate_stock},
    },
};

async fn find_product(state: &AppState, product_id: i32) -> Result<Product> {
    product_queries::find_by_id(&state.db, product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", product_id)))
}

fn normalize_sku(sku: Option<&str>) -> Option<String> {
    sku.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Validates an update; a sent but blank SKU becomes an explicit clear.
fn combination_changes(payload: UpdateCombinationRequest) -> Result<CombinationChanges> {
    Ok(CombinationChanges {
        price: payload.price.map(validate_price).transpose()?,
        stock: payload.stock.map(validate_stock).transpose()?,
        sku: payload.sku.as_deref().map(|sku| normalize_sku(Some(sku))),
    })
}

async fn ensure_sku_free(state: &AppState, sku: Option<&str>, except_id: Option<i32>) -> Result<()> {
    if let Some(sku) = sku {
        if let Some(existing) = variant_type_queries::find_combination_by_sku(&state.db, sku).await? {
            if Some(existing.id) != except_id {
                return Err(AppError::Conflict(format!("SKU '{}' is already in use", sku)));
            }
        }
    }

    Ok(())
}

pub async fn list_combinations(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<i32>,
) -> Result<Json<Vec<CombinationDetail>>> {
    find_product(&state, product_id).await?;

    let combinations = variant_type_queries::get_combinations(&state.db, product_id).await?;

    Ok(Json(combinations))
}

pub async fn create_combination(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<i32>,
    AppJson(payload): AppJson<CreateCombinationRequest>,
) -> Result<(StatusCode, Json<CombinationDetail>)> {
    let product = find_product(&state, product_id).await?;

    let price = validate_price(payload.price.unwrap_or(product.price))?;
    let stock = validate_stock(payload.stock.unwrap_or(0))?;
    let sku = normalize_sku(payload.sku.as_deref());

    let types = variant_type_queries::get_types_with_options(&state.db, product_id).await?;
    let selection = validate_selection(&types, &payload.option_ids)?;

    let existing = existing_selections(&state.db, product_id).await?;
    if existing.contains(&selection) {
        return Err(AppError::Conflict(
            "A combination with these options already exists".to_string(),
        ));
    }

    ensure_sku_free(&state, sku.as_deref(), None).await?;

    let combination = variant_type_queries::create_combination(
        &state.db,
        product_id,
        &selection,
        price,
        stock,
        sku.as_deref(),
    )
    .await?;

    let detail = variant_type_queries::get_combination_detail(&state.db, combination).await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// Creates every missing combination of the product's options with a shared
/// price and stock. Combinations that already exist are left untouched.
pub async fn generate_combinations(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<i32>,
    AppJson(payload): AppJson<GenerateCombinationsRequest>,
) -> Result<(StatusCode, Json<Vec<CombinationDetail>>)> {
    let product = find_product(&state, product_id).await?;

    let price = validate_price(payload.price.unwrap_or(product.price))?;
    let stock = validate_stock(payload.stock.unwrap_or(0))?;

    let types = variant_type_queries::get_types_with_options(&state.db, product_id).await?;
    let existing = existing_selections(&state.db, product_id).await?;
    let selections = missing_selections(&types, &existing)?;

    let mut created = Vec::with_capacity(selections.len());

    for selection in selections {
        let combination = variant_type_queries::create_combination(
            &state.db, product_id, &selection, price, stock, None,
        )
        .await?;
        created.push(combination);
    }

    tracing::info!(
        product_id,
        created = created.len(),
        "Variant combinations generated"
    );

    let created_ids: Vec<i32> = created.iter().map(|c| c.id).collect();
    let details = variant_type_queries::get_combinations(&state.db, product_id)
        .await?
        .into_iter()
        .filter(|d| created_ids.contains(&d.combination.id))
        .collect();

    Ok((StatusCode::CREATED, Json(details)))
}

pub async fn update_combination(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateCombinationRequest>,
) -> Result<Json<CombinationDetail>> {
    let changes = combination_changes(payload)?;

    if let Some(Some(sku)) = &changes.sku {
        ensure_sku_free(&state, Some(sku), Some(id)).await?;
    }

    let combination = variant_type_queries::update_combination(&state.db, id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Combination with id {} not found", id)))?;

    let detail = variant_type_queries::get_combination_detail(&state.db, combination).await?;

    Ok(Json(detail))
}

pub async fn upload_combination_image(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    form: FormData,
) -> Result<Json<CombinationDetail>> {
    let existing = variant_type_queries::find_combination_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Combination with id {} not found", id)))?;
    let file = form
        .file("image")
        .ok_or_else(|| AppError::BadRequest("image is required".to_string()))?;

    let url = state.images.upload(COMBINATION_FOLDER, file).await?;

    let combination = state
        .images
        .discard_on_error(
            Some(url.as_str()),
            variant_type_queries::set_combination_image(&state.db, id, &url).await,
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Combination with id {} not found", id)))?;

    state.images.remove(existing.image_url.as_deref()).await;

    let detail = variant_type_queries::get_combination_detail(&state.db, combination).await?;

    Ok(Json(detail))
}

pub async fn delete_combination(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode> {
    let combination = variant_type_queries::delete_combination(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Combination with id {} not found", id)))?;

    state.images.remove(combination.image_url.as_deref()).await;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sku_is_trimmed_and_blank_dropped() {
        assert_eq!(normalize_sku(Some("  TS-RED-M ")), Some("TS-RED-M".to_string()));
        assert_eq!(normalize_sku(Some("   ")), None);
        assert_eq!(normalize_sku(None), None);
    }

    #[test]
    fn blank_sku_in_update_clears_it() {
        let update = |sku: Option<&str>| UpdateCombinationRequest {
            price: None,
            stock: None,
            sku: sku.map(str::to_string),
        };

        assert_eq!(combination_changes(update(Some("  "))).unwrap().sku, Some(None));
        assert_eq!(
            combination_changes(update(Some(" TS-1 "))).unwrap().sku,
            Some(Some("TS-1".to_string()))
        );
        assert_eq!(combination_changes(update(None)).unwrap().sku, None);
    }

    #[test]
    fn invalid_update_values_are_bad_request() {
        let negative_stock = UpdateCombinationRequest {
            price: None,
            stock: Some(-1),
            sku: None,
        };
        assert!(matches!(
            combination_changes(negative_stock),
            Err(AppError::BadRequest(_))
        ));
    }
}

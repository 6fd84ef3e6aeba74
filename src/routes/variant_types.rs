use axum::{Json, extract::State};
use http::StatusCode;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        CreateOptionRequest, CreateVariantTypeRequest, NameRequest, VariantOption, VariantType,
        VariantTypeWithOptions,
    },
    queries::{product_queries, variant_type_queries},
    utils::{
        extractors::{AppJson, AppPath},
        validation::require_text,
    },
};

/// Trims option values and rejects blanks and case-insensitive duplicates.
fn normalize_option_values(values: &[String]) -> Result<Vec<String>> {
    let mut normalized: Vec<String> = Vec::with_capacity(values.len());

    for value in values {
        let value = require_text("option value", Some(value.as_str()))?;

        if normalized.iter().any(|v| v.eq_ignore_ascii_case(&value)) {
            return Err(AppError::BadRequest(format!(
                "Duplicate option value '{}'",
                value
            )));
        }

        normalized.push(value);
    }

    Ok(normalized)
}

pub async fn list_variant_types(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<i32>,
) -> Result<Json<Vec<VariantTypeWithOptions>>> {
    if product_queries::find_by_id(&state.db, product_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    let types = variant_type_queries::get_types_with_options(&state.db, product_id).await?;

    Ok(Json(types))
}

pub async fn create_variant_type(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<i32>,
    AppJson(payload): AppJson<CreateVariantTypeRequest>,
) -> Result<(StatusCode, Json<VariantTypeWithOptions>)> {
    let name = require_text("name", payload.name.as_deref())?;
    let values = normalize_option_values(&payload.options)?;

    if product_queries::find_by_id(&state.db, product_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    if variant_type_queries::find_type_by_name(&state.db, product_id, &name)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Variant type '{}' already exists for this product",
            name
        )));
    }

    let variant_type = variant_type_queries::create_type(&state.db, product_id, &name).await?;
    let options = variant_type_queries::create_options(&state.db, variant_type.id, &values).await?;

    tracing::info!(
        variant_type_id = variant_type.id,
        product_id,
        options = options.len(),
        "Variant type created"
    );

    Ok((
        StatusCode::CREATED,
        Json(VariantTypeWithOptions {
            variant_type,
            options,
        }),
    ))
}

pub async fn update_variant_type(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<NameRequest>,
) -> Result<Json<VariantType>> {
    let name = require_text("name", payload.name.as_deref())?;

    let existing = variant_type_queries::find_type_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Variant type with id {} not found", id)))?;

    if let Some(other) =
        variant_type_queries::find_type_by_name(&state.db, existing.product_id, &name).await?
    {
        if other.id != id {
            return Err(AppError::Conflict(format!(
                "Variant type '{}' already exists for this product",
                name
            )));
        }
    }

    let variant_type = variant_type_queries::update_type(&state.db, id, &name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Variant type with id {} not found", id)))?;

    Ok(Json(variant_type))
}

pub async fn delete_variant_type(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode> {
    let in_use = variant_type_queries::count_type_usage(&state.db, id).await?;
    if in_use > 0 {
        return Err(AppError::Conflict(format!(
            "Variant type is used by {} combination(s)",
            in_use
        )));
    }

    if !variant_type_queries::delete_type(&state.db, id).await? {
        return Err(AppError::NotFound(format!(
            "Variant type with id {} not found",
            id
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_option(
    State(state): State<AppState>,
    AppPath(variant_type_id): AppPath<i32>,
    AppJson(payload): AppJson<CreateOptionRequest>,
) -> Result<(StatusCode, Json<VariantOption>)> {
    let value = require_text("value", payload.value.as_deref())?;

    if variant_type_queries::find_type_by_id(&state.db, variant_type_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(format!(
            "Variant type with id {} not found",
            variant_type_id
        )));
    }

    if variant_type_queries::find_option_by_value(&state.db, variant_type_id, &value)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Option '{}' already exists",
            value
        )));
    }

    let option = variant_type_queries::create_options(&state.db, variant_type_id, &[value])
        .await?
        .pop()
        .ok_or_else(|| AppError::InternalError("Option insert returned no row".to_string()))?;

    Ok((StatusCode::CREATED, Json(option)))
}

pub async fn delete_option(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode> {
    let in_use = variant_type_queries::count_option_usage(&state.db, id).await?;
    if in_use > 0 {
        return Err(AppError::Conflict(format!(
            "Option is used by {} combination(s)",
            in_use
        )));
    }

    if !variant_type_queries::delete_option(&state.db, id).await? {
        return Err(AppError::NotFound(format!(
            "Variant option with id {} not found",
            id
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn option_values_are_trimmed() {
        assert_eq!(
            normalize_option_values(&values(&[" S", "M ", "L"])).unwrap(),
            values(&["S", "M", "L"])
        );
    }

    #[test]
    fn duplicate_or_blank_options_are_rejected() {
        assert!(normalize_option_values(&values(&["Red", "red"])).is_err());
        assert!(normalize_option_values(&values(&["Red", "  "])).is_err());
        assert!(normalize_option_values(&[]).unwrap().is_empty());
    }
}

use axum::{Extension, Json, extract::State};
use http::StatusCode;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{Category, CategoryWithCount, CurrentAdmin, NameRequest},
    queries::category_queries,
    utils::{
        extractors::{AppJson, AppPath},
        validation::require_text,
    },
};

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryWithCount>>> {
    let categories = category_queries::get_all_with_counts(&state.db).await?;
    Ok(Json(categories))
}

pub async fn create_category(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    AppJson(payload): AppJson<NameRequest>,
) -> Result<(StatusCode, Json<Category>)> {
    let name = require_text("name", payload.name.as_deref())?;

    if category_queries::find_by_name(&state.db, &name)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Category '{}' already exists",
            name
        )));
    }

    let category = category_queries::create_category(&state.db, &name, current.id).await?;

    tracing::info!(category_id = category.id, "Category created");

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<NameRequest>,
) -> Result<Json<Category>> {
    let name = require_text("name", payload.name.as_deref())?;

    if category_queries::find_by_id(&state.db, id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Category with id {} not found",
            id
        )));
    }

    if let Some(existing) = category_queries::find_by_name(&state.db, &name).await? {
        if existing.id != id {
            return Err(AppError::Conflict(format!(
                "Another category named '{}' already exists",
                name
            )));
        }
    }

    let category = category_queries::update_category(&state.db, id, &name)
        .await?
        .ok_or(AppError::NotFound(format!(
            "Category with id {} not found",
            id
        )))?;

    Ok(Json(category))
}

pub async fn delete_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode> {
    if category_queries::find_by_id(&state.db, id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Category with id {} not found",
            id
        )));
    }

    let product_count = category_queries::count_products(&state.db, id).await?;
    if product_count > 0 {
        return Err(AppError::Conflict(format!(
            "Category is used by {} product(s)",
            product_count
        )));
    }

    category_queries::delete_category(&state.db, id).await?;

    tracing::info!(category_id = id, "Category deleted");

    Ok(StatusCode::NO_CONTENT)
}

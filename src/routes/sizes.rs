use axum::{Extension, Json, extract::State};
use http::StatusCode;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{CurrentAdmin, NameRequest, Size},
    queries::size_queries,
    utils::{
        extractors::{AppJson, AppPath},
        validation::require_text,
    },
};

pub async fn list_sizes(State(state): State<AppState>) -> Result<Json<Vec<Size>>> {
    let sizes = size_queries::get_all(&state.db).await?;
    Ok(Json(sizes))
}

pub async fn create_size(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    AppJson(payload): AppJson<NameRequest>,
) -> Result<(StatusCode, Json<Size>)> {
    let name = require_text("name", payload.name.as_deref())?;

    if size_queries::find_by_name(&state.db, &name).await?.is_some() {
        return Err(AppError::Conflict(format!("Size '{}' already exists", name)));
    }

    let size = size_queries::create_size(&state.db, &name, current.id).await?;

    Ok((StatusCode::CREATED, Json(size)))
}

pub async fn update_size(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<NameRequest>,
) -> Result<Json<Size>> {
    let name = require_text("name", payload.name.as_deref())?;

    if let Some(existing) = size_queries::find_by_name(&state.db, &name).await? {
        if existing.id != id {
            return Err(AppError::Conflict(format!(
                "Another size named '{}' already exists",
                name
            )));
        }
    }

    let size = size_queries::update_size(&state.db, id, &name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Size with id {} not found", id)))?;

    Ok(Json(size))
}

pub async fn delete_size(State(state): State<AppState>, AppPath(id): AppPath<i32>) -> Result<StatusCode> {
    if size_queries::find_by_id(&state.db, id).await?.is_none() {
        return Err(AppError::NotFound(format!("Size with id {} not found", id)));
    }

    let usage = size_queries::count_variant_usage(&state.db, id).await?;
    if usage > 0 {
        return Err(AppError::Conflict(format!(
            "Size is stocked by {} variant(s)",
            usage
        )));
    }

    size_queries::delete_size(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

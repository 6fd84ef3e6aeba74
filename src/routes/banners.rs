use axum::{Extension, Json, extract::State};
use http::StatusCode;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{Banner, BannerChanges, BannerQuery, BannerType, CurrentAdmin},
    queries::{banner_queries, product_queries},
    services::image_service::BANNER_FOLDER,
    utils::{
        extractors::{AppPath, AppQuery},
        form::FormData,
        validation::optional_text,
    },
};

fn parse_banner_type(raw: &str) -> Result<BannerType> {
    raw.parse::<BannerType>().map_err(AppError::BadRequest)
}

fn banner_changes(form: &FormData) -> Result<BannerChanges> {
    Ok(BannerChanges {
        title: optional_text("title", form.text("title"))?,
        subtitle: form.nullable_text("subtitle"),
        button_text: form.nullable_text("button_text"),
        button_link: form.nullable_text("button_link"),
        banner_type: form
            .text("type")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(parse_banner_type)
            .transpose()?,
        position: form.parse::<i32>("position")?,
        product_id: form.parse_nullable::<i32>("product_id")?,
        image_url: None,
    })
}

async fn ensure_product(state: &AppState, product_id: Option<Option<i32>>) -> Result<()> {
    if let Some(Some(product_id)) = product_id {
        if product_queries::find_by_id(&state.db, product_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "Product with id {} not found",
                product_id
            )));
        }
    }

    Ok(())
}

pub async fn list_banners(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<BannerQuery>,
) -> Result<Json<Vec<Banner>>> {
    let banner_type = params
        .banner_type
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(parse_banner_type)
        .transpose()?;

    let banners = banner_queries::get_all(&state.db, banner_type).await?;

    Ok(Json(banners))
}

pub async fn create_banner(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    form: FormData,
) -> Result<(StatusCode, Json<Banner>)> {
    let mut changes = banner_changes(&form)?;

    if changes.title.is_none() {
        return Err(AppError::BadRequest("title is required".to_string()));
    }

    if changes.banner_type.is_none() {
        return Err(AppError::BadRequest("type is required".to_string()));
    }

    ensure_product(&state, changes.product_id).await?;

    if let Some(file) = form.file("image") {
        changes.image_url = Some(state.images.upload(BANNER_FOLDER, file).await?);
    }

    let banner = state
        .images
        .discard_on_error(
            changes.image_url.as_deref(),
            banner_queries::create_banner(&state.db, &changes, current.id).await,
        )
        .await?;

    tracing::info!(banner_id = banner.id, banner_type = %banner.banner_type, "Banner created");

    Ok((StatusCode::CREATED, Json(banner)))
}

pub async fn update_banner(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    form: FormData,
) -> Result<Json<Banner>> {
    let existing = banner_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Banner with id {} not found", id)))?;
    let mut changes = banner_changes(&form)?;

    ensure_product(&state, changes.product_id).await?;

    if let Some(file) = form.file("image") {
        changes.image_url = Some(state.images.upload(BANNER_FOLDER, file).await?);
    }

    let banner = state
        .images
        .discard_on_error(
            changes.image_url.as_deref(),
            banner_queries::update_banner(&state.db, id, &changes).await,
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Banner with id {} not found", id)))?;

    if changes.image_url.is_some() {
        state.images.remove(existing.image_url.as_deref()).await;
    }

    Ok(Json(banner))
}

pub async fn delete_banner(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode> {
    let banner = banner_queries::delete_banner(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Banner with id {} not found", id)))?;

    state.images.remove(banner.image_url.as_deref()).await;

    tracing::info!(banner_id = id, "Banner deleted");

    Ok(StatusCode::NO_CONTENT)
}

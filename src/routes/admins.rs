use axum::{Extension, Json, extract::State};
use http::StatusCode;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{AdminChanges, AdminResponse, CurrentAdmin},
    queries::admin_queries,
    services::image_service::ADMIN_FOLDER,
    utils::{
        extractors::AppPath,
        form::FormData,
        validation::{optional_text, require_text, validate_email, validate_password},
    },
};

fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))
}

async fn ensure_unique(
    state: &AppState,
    username: Option<&str>,
    email: Option<&str>,
    except_id: Option<i32>,
) -> Result<()> {
    if let Some(username) = username {
        if let Some(existing) = admin_queries::find_by_username(&state.db, username).await? {
            if Some(existing.id) != except_id {
                return Err(AppError::Conflict(format!(
                    "Username '{}' is already taken",
                    username
                )));
            }
        }
    }

    if let Some(email) = email {
        if let Some(existing) = admin_queries::find_by_email(&state.db, email).await? {
            if Some(existing.id) != except_id {
                return Err(AppError::Conflict(format!(
                    "Email '{}' is already registered",
                    email
                )));
            }
        }
    }

    Ok(())
}

pub async fn list_admins(State(state): State<AppState>) -> Result<Json<Vec<AdminResponse>>> {
    let admins = admin_queries::get_all(&state.db).await?;

    Ok(Json(admins.into_iter().map(AdminResponse::from).collect()))
}

pub async fn create_admin(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    form: FormData,
) -> Result<(StatusCode, Json<AdminResponse>)> {

    let username = require_text("username", form.text("username"))?;
    let email = require_text("email", form.text("email"))?;
    validate_email(&email)?;

    let password = form
        .text("password")
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("password is required".to_string()))?;
    validate_password(password)?;

    let is_superadmin = form.flag("is_superadmin")?.unwrap_or(false);

    ensure_unique(&state, Some(&username), Some(&email), None).await?;

    let password_hash = hash_password(password)?;

    let image_url = match form.file("image") {
        Some(file) => Some(state.images.upload(ADMIN_FOLDER, file).await?),
        None => None,
    };

    let admin = state
        .images
        .discard_on_error(
            image_url.as_deref(),
            admin_queries::create_admin(
                &state.db,
                &username,
                &email,
                &password_hash,
                is_superadmin,
                image_url.as_deref(),
            )
            .await,
        )
        .await?;

    tracing::info!(
        admin_id = admin.id,
        created_by = current.id,
        is_superadmin,
        "Admin created"
    );

    Ok((StatusCode::CREATED, Json(admin.into())))
}

pub async fn update_admin(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    AppPath(id): AppPath<i32>,
    form: FormData,
) -> Result<Json<AdminResponse>> {
    let existing = admin_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Admin with id {} not found", id)))?;

    let username = optional_text("username", form.text("username"))?;
    let email = optional_text("email", form.text("email"))?;
    if let Some(ref email) = email {
        validate_email(email)?;
    }

    let password_hash = match form.text("password").filter(|p| !p.is_empty()) {
        Some(password) => {
            validate_password(password)?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    let is_superadmin = form.flag("is_superadmin")?;
    if id == current.id && is_superadmin == Some(false) {
        return Err(AppError::BadRequest(
            "You cannot revoke your own superadmin rights".to_string(),
        ));
    }

    ensure_unique(&state, username.as_deref(), email.as_deref(), Some(id)).await?;

    let image_url = match form.file("image") {
        Some(file) => Some(state.images.upload(ADMIN_FOLDER, file).await?),
        None => None,
    };

    let changes = AdminChanges {
        username,
        email,
        password_hash,
        is_superadmin,
        image_url,
    };

    let admin = state
        .images
        .discard_on_error(
            changes.image_url.as_deref(),
            admin_queries::update_admin(&state.db, id, &changes).await,
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Admin with id {} not found", id)))?;

    if changes.image_url.is_some() {
        state.images.remove(existing.image_url.as_deref()).await;
    }

    tracing::info!(admin_id = id, updated_by = current.id, "Admin updated");

    Ok(Json(admin.into()))
}

pub async fn delete_admin(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode> {
    if id == current.id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }

    let existing = admin_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Admin with id {} not found", id)))?;

    admin_queries::delete_admin(&state.db, id).await?;
    state.images.remove(existing.image_url.as_deref()).await;

    tracing::info!(admin_id = id, deleted_by = current.id, "Admin deleted");

    Ok(StatusCode::NO_CONTENT)
}

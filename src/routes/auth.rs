use axum::{Extension, Json, extract::State};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{AdminResponse, AuthResponse, CurrentAdmin, LoginRequest},
    queries::admin_queries,
    utils::{extractors::AppJson, jwt},
};

pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let identifier = payload
        .identifier
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("identifier is required".to_string()))?;

    let password = payload
        .password
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("password is required".to_string()))?;

    let admin = admin_queries::find_by_identifier(&state.db, identifier)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

    let is_valid = bcrypt::verify(password, &admin.password)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;

    if !is_valid {
        tracing::warn!(admin_id = admin.id, "Failed login attempt");
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let token = jwt::generate_token(&state.auth, &admin)?;

    tracing::info!(admin_id = admin.id, "Admin logged in");

    Ok(Json(AuthResponse {
        token,
        admin: admin.into(),
    }))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
) -> Result<Json<AdminResponse>> {
    let admin = admin_queries::find_by_id(&state.db, current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))?;

    Ok(Json(admin.into()))
}

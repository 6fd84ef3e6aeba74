use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    AppState,
    error::AppError,
    models::CurrentAdmin,
    queries::admin_queries,
    utils::jwt,
};

fn bearer_token(req: &Request) -> Result<&str, AppError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid token format".to_string()))
}

/// Verifies the bearer token and re-loads the admin, so deleted accounts and
/// revoked superadmin rights take effect without waiting for token expiry.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = jwt::verify_token(&state.auth, bearer_token(&req)?)?;

    let admin = admin_queries::find_by_id(&state.db, claims.admin_id()?)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Admin account no longer exists".to_string()))?;

    req.extensions_mut().insert(CurrentAdmin::from(&admin));

    Ok(next.run(req).await)
}

/// Must be layered inside [`auth_middleware`].
pub async fn superadmin_middleware(req: Request, next: Next) -> Result<Response, AppError> {
    let admin = req
        .extensions()
        .get::<CurrentAdmin>()
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    if !admin.is_superadmin {
        tracing::warn!(admin_id = admin.id, "Superadmin route refused");
        return Err(AppError::Forbidden("Superadmin access required".to_string()));
    }

    Ok(next.run(req).await)
}

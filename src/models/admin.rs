use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Admin row as stored. Never serialized directly: the password hash stays server side.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Admin {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
    pub image_url: Option<String>,
    pub is_superadmin: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub image_url: Option<String>,
    pub is_superadmin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Admin> for AdminResponse {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username,
            email: admin.email,
            image_url: admin.image_url,
            is_superadmin: admin.is_superadmin,
            created_at: admin.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email.
    pub identifier: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub admin: AdminResponse,
}

/// Validated admin fields, built from multipart form data.
#[derive(Debug, Default)]
pub struct AdminChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub is_superadmin: Option<bool>,
    pub image_url: Option<String>,
}

/// The authenticated caller, attached to request extensions by the auth middleware.
#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub id: i32,
    pub username: String,
    pub is_superadmin: bool,
}

impl From<&Admin> for CurrentAdmin {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username.clone(),
            is_superadmin: admin.is_superadmin,
        }
    }
}

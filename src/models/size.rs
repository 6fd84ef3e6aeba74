use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Size {
    pub id: i32,
    pub name: String,
    pub created_by_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Banner {
    pub id: i32,
    pub title: String,
    pub subtitle: Option<String>,
    pub button_text: Option<String>,
    pub button_link: Option<String>,
    pub image_url: Option<String>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub banner_type: String,
    pub position: i32,
    pub product_id: Option<i32>,
    pub admin_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Storefront slot a banner is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerType {
    Hero,
    Promo,
    Sidebar,
}

impl BannerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BannerType::Hero => "hero",
            BannerType::Promo => "promo",
            BannerType::Sidebar => "sidebar",
        }
    }
}

impl fmt::Display for BannerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BannerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hero" => Ok(BannerType::Hero),
            "promo" => Ok(BannerType::Promo),
            "sidebar" => Ok(BannerType::Sidebar),
            other => Err(format!(
                "Unknown banner type '{}', expected hero, promo or sidebar",
                other
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BannerQuery {
    #[serde(rename = "type")]
    pub banner_type: Option<String>,
}

/// Validated banner fields, built from multipart form data. Nullable columns
/// use `Some(None)` for "clear".
#[derive(Debug, Default)]
pub struct BannerChanges {
    pub title: Option<String>,
    pub subtitle: Option<Option<String>>,
    pub button_text: Option<Option<String>>,
    pub button_link: Option<Option<String>>,
    pub banner_type: Option<BannerType>,
    pub position: Option<i32>,
    pub product_id: Option<Option<i32>>,
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_type_parses_case_insensitively() {
        assert_eq!("Hero".parse::<BannerType>(), Ok(BannerType::Hero));
        assert_eq!(" promo ".parse::<BannerType>(), Ok(BannerType::Promo));
        assert_eq!(BannerType::Sidebar.to_string(), "sidebar");
    }

    #[test]
    fn unknown_banner_type_is_rejected() {
        assert!("popup".parse::<BannerType>().is_err());
    }
}

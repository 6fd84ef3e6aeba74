use aws_sdk_s3 as s3;
use aws_sdk_s3::primitives::ByteStream;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    utils::form::UploadedFile,
};

pub const ADMIN_FOLDER: &str = "admins";
pub const PRODUCT_FOLDER: &str = "products";
pub const VARIANT_FOLDER: &str = "variants";
pub const COMBINATION_FOLDER: &str = "combinations";
pub const BANNER_FOLDER: &str = "banners";

/// Bucket handle plus the public base URL objects are served from.
#[derive(Clone)]
pub struct ImageStore {
    pub client: s3::Client,
    pub bucket: String,
    pub assets_url: String,
}

impl ImageStore {
    pub fn new(client: s3::Client, bucket: String, assets_url: String) -> Self {
        Self {
            client,
            bucket,
            assets_url,
        }
    }

    pub async fn check_bucket(&self) -> Result<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| {
                AppError::StorageError(format!("Bucket {} unreachable: {}", self.bucket, e))
            })?;

        Ok(())
    }

    /// Uploads an image under `folder` and returns its public URL.
    pub async fn upload(&self, folder: &str, file: &UploadedFile) -> Result<String> {
        let extension = image_extension(&file.content_type).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unsupported image type '{}'",
                file.content_type
            ))
        })?;

        let key = object_key(folder, Uuid::new_v4(), extension);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(&file.content_type)
            .body(ByteStream::from(file.bytes.clone()))
            .send()
            .await
            .map_err(|e| AppError::StorageError(format!("Failed to upload {}: {}", key, e)))?;

        tracing::info!(key = %key, size = file.bytes.len(), "Image uploaded");

        Ok(public_url(&self.assets_url, &key))
    }

    /// Removes the object behind a public URL. Failures are logged only: the
    /// database row is already gone and a stray object is harmless.
    pub async fn remove(&self, url: Option<&str>) {
        let Some(url) = url else {
            return;
        };

        let Some(key) = key_from_url(&self.assets_url, url) else {
            tracing::warn!(url = %url, "Not an object of this bucket, skipping delete");
            return;
        };

        if let Err(e) = delete_single_object(&self.client, &self.bucket, key).await {
            tracing::warn!(key = %key, "Failed to delete image: {}", e);
        }
    }

    /// Passes `result` through, removing the freshly uploaded `url` when the
    /// database write it belonged to failed.
    pub async fn discard_on_error<T>(&self, url: Option<&str>, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.remove(url).await;
        }
        result
    }

    pub async fn remove_all<'a, I>(&self, urls: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for url in urls {
            self.remove(Some(url)).await;
        }
    }
}

pub async fn delete_single_object(
    client: &s3::Client,
    bucket: &str,
    key: &str,
) -> std::result::Result<(), s3::Error> {
    client
        .delete_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await?;

    Ok(())
}

pub fn image_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/avif" => Some("avif"),
        _ => None,
    }
}

pub fn object_key(folder: &str, id: Uuid, extension: &str) -> String {
    format!("{}/{}.{}", folder, id, extension)
}

pub fn public_url(assets_url: &str, key: &str) -> String {
    format!("{}/{}", assets_url.trim_end_matches('/'), key)
}

pub fn key_from_url<'a>(assets_url: &str, url: &'a str) -> Option<&'a str> {
    url.strip_prefix(assets_url.trim_end_matches('/'))?
        .strip_prefix('/')
        .filter(|key| !key.is_empty())
}

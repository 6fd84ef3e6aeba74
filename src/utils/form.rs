use std::{collections::HashMap, str::FromStr};

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
};

use crate::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Multipart body split into text fields and file parts.
///
/// A part counts as a file when it carries a filename; empty file inputs
/// (browsers send those when nothing was picked) are dropped.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: Vec<(String, UploadedFile)>,
}

impl FormData {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if let Some(file_name) = field.file_name().map(str::to_string) {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await?;

                if bytes.is_empty() {
                    continue;
                }

                form.files.push((
                    name,
                    UploadedFile {
                        file_name: Some(file_name),
                        content_type,
                        bytes,
                    },
                ));
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Raw value of a text field, if it was sent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Parses a text field; blank values count as absent.
    pub fn parse<T: FromStr>(&self, name: &str) -> Result<Option<T>> {
        match self.text(name).map(str::trim).filter(|v| !v.is_empty()) {
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|_| AppError::BadRequest(format!("Invalid value for {}", name))),
            None => Ok(None),
        }
    }

    /// Text field for a nullable column: `None` when not sent, `Some(None)`
    /// when sent blank, which clears the column.
    pub fn nullable_text(&self, name: &str) -> Option<Option<String>> {
        self.text(name).map(|v| {
            Some(v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        })
    }

    /// Like [`FormData::parse`], but a blank value clears the column.
    pub fn parse_nullable<T: FromStr>(&self, name: &str) -> Result<Option<Option<T>>> {
        match self.text(name) {
            Some(_) => self.parse::<T>(name).map(Some),
            None => Ok(None),
        }
    }

    /// Checkbox-style boolean: accepts true/false, 1/0, on/off.
    pub fn flag(&self, name: &str) -> Result<Option<bool>> {
        match self.text(name).map(|v| v.trim().to_ascii_lowercase()) {
            None => Ok(None),
            Some(v) if v.is_empty() => Ok(None),
            Some(v) => match v.as_str() {
                "true" | "1" | "on" | "yes" => Ok(Some(true)),
                "false" | "0" | "off" | "no" => Ok(Some(false)),
                _ => Err(AppError::BadRequest(format!("Invalid value for {}", name))),
            },
        }
    }

    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, file)| file)
    }

    pub fn files<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a UploadedFile> + 'a {
        self.files
            .iter()
            .filter(move |(field, _)| field == name)
            .map(|(_, file)| file)
    }

    #[cfg(test)]
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }
}

impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let multipart = Multipart::from_request(req, state).await?;
        Self::from_multipart(multipart).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::FromRequest, http::Request};
    use rust_decimal::Decimal;

    const BOUNDARY: &str = "XBOUNDARYX";

    async fn multipart(body: String) -> Multipart {
        let req = Request::builder()
            .method("POST")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();

        Multipart::from_request(req, &()).await.unwrap()
    }

    #[tokio::test]
    async fn splits_text_fields_and_files() {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nSneaker\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"a.png\"\r\n\
             Content-Type: image/png\r\n\r\nPNGDATA\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\r\n\
             --{b}--\r\n",
            b = BOUNDARY
        );

        let form = FormData::from_multipart(multipart(body).await).await.unwrap();

        assert_eq!(form.text("name"), Some("Sneaker"));
        let image = form.file("image").unwrap();
        assert_eq!(image.content_type, "image/png");
        assert_eq!(&image.bytes[..], b"PNGDATA");
        assert_eq!(form.files("images").count(), 0);
    }

    #[tokio::test]
    async fn non_multipart_body_is_bad_request() {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let err = FormData::from_request(req, &()).await.unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn parse_treats_blank_as_absent() {
        let form = FormData::default()
            .with_field("price", " 12.50 ")
            .with_field("category_id", "");

        assert_eq!(
            form.parse::<Decimal>("price").unwrap(),
            Some(Decimal::new(1250, 2))
        );
        assert_eq!(form.parse::<i32>("category_id").unwrap(), None);
        assert_eq!(form.parse::<i32>("missing").unwrap(), None);
    }

    #[test]
    fn unparseable_field_is_bad_request() {
        let form = FormData::default().with_field("price", "cheap");
        assert!(matches!(
            form.parse::<Decimal>("price"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn file_lookup_borrows_from_a_temporary_name() {
        let mut form = FormData::default();
        form.files.push((
            "image".to_string(),
            UploadedFile {
                file_name: Some("a.png".to_string()),
                content_type: "image/png".to_string(),
                bytes: Bytes::from_static(b"PNG"),
            },
        ));

        let found = {
            let field = String::from("image");
            form.file(&field)
        };

        assert_eq!(found.map(|f| f.content_type.as_str()), Some("image/png"));
        assert!(form.file("avatar").is_none());
    }

    #[test]
    fn blank_nullable_field_means_clear() {
        let form = FormData::default()
            .with_field("subtitle", "  ")
            .with_field("button_text", " Shop now ")
            .with_field("product_id", "")
            .with_field("position", "x");

        assert_eq!(form.nullable_text("subtitle"), Some(None));
        assert_eq!(
            form.nullable_text("button_text"),
            Some(Some("Shop now".to_string()))
        );
        assert_eq!(form.nullable_text("button_link"), None);
        assert_eq!(form.parse_nullable::<i32>("product_id").unwrap(), Some(None));
        assert_eq!(form.parse_nullable::<i32>("missing").unwrap(), None);
        assert!(form.parse_nullable::<i32>("position").is_err());
    }

    #[test]
    fn flag_accepts_checkbox_values() {
        let form = FormData::default()
            .with_field("a", "on")
            .with_field("b", "FALSE")
            .with_field("c", "maybe");

        assert_eq!(form.flag("a").unwrap(), Some(true));
        assert_eq!(form.flag("b").unwrap(), Some(false));
        assert!(form.flag("c").is_err());
        assert_eq!(form.flag("d").unwrap(), None);
    }
}

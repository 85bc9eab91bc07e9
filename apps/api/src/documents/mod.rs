//! Object storage for uploaded CV documents.

#[cfg(test)]
pub mod memory;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::errors::AppError;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[async_trait]
pub trait DocumentStorage: Send + Sync {
    /// Public URL the object under `key` is (or will be) served from.
    fn url_for(&self, key: &str) -> String;

    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), AppError>;

    async fn remove(&self, key: &str) -> Result<(), AppError>;
}

pub fn is_pdf(body: &[u8]) -> bool {
    body.starts_with(PDF_MAGIC)
}

/// Builds `cvs/{owner}/{position}-{millis}.pdf`, keeping only URL-safe
/// characters of the position name.
pub fn document_key(owner: Uuid, position: &str, timestamp_millis: i64) -> String {
    let mut slug = String::with_capacity(position.len());
    for c in position.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    let slug = if slug.is_empty() { "document" } else { slug };
    format!("cvs/{owner}/{slug}-{timestamp_millis}.pdf")
}

/// Joins a public base URL and an object key.
pub fn public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;

use crate::documents::{public_url, DocumentStorage};
use crate::errors::AppError;

/// Stores documents in an S3-compatible bucket (MinIO locally, AWS in production).
pub struct S3DocumentStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3DocumentStorage {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url,
        }
    }
}

#[async_trait]
impl DocumentStorage for S3DocumentStorage {
    fn url_for(&self, key: &str) -> String {
        public_url(&self.public_base_url, key)
    }

    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), AppError> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload of {key} failed: {e}")))?;

        info!("Uploaded document to s3://{}/{} ({size} bytes)", self.bucket, key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 delete of {key} failed: {e}")))?;

        info!("Deleted document s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

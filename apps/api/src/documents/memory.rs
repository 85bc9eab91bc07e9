use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::documents::{public_url, DocumentStorage};
use crate::errors::AppError;

pub const MEMORY_BASE_URL: &str = "https://files.test/documents";

#[derive(Default)]
pub struct MemoryDocumentStorage {
    objects: Mutex<HashMap<String, Bytes>>,
}

impl MemoryDocumentStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl DocumentStorage for MemoryDocumentStorage {
    fn url_for(&self, key: &str) -> String {
        public_url(MEMORY_BASE_URL, key)
    }

    async fn put(&self, key: &str, body: Bytes, _content_type: &str) -> Result<(), AppError> {
        self.objects.lock().unwrap().insert(key.to_string(), body);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}

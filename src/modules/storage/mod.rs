//! Content store for chirp images
//!
//! The store is addressed by relative keys (e.g. `chirps/<uuid>.png`) and is
//! exposed on a public-readable endpoint. `MediaStore` is the MinIO/S3-backed
//! implementation; tests substitute an in-memory fake.

mod media_store;

use async_trait::async_trait;

use crate::core::error::Result;

pub use media_store::MediaStore;

/// Public-readable object store addressed by relative key.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store an object under `key`, returning the key on success.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String>;

    /// Remove the object stored under `key`.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Browser-facing URL for the object stored under `key`.
    fn public_url(&self, key: &str) -> String;
}

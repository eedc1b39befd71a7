//! Image storage collaborator seam.
//!
//! The core never inspects image contents: an opaque binary goes in, a
//! reference string comes out and gets attached to a vehicle record.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use motoreserve_core::{DomainError, DomainResult, ValueObject};

/// Opaque reference to a stored vehicle image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for ImageRef {}

/// External file/image storage.
pub trait ImageStore: Send + Sync {
    /// Store an opaque binary, returning a reference to it.
    fn put(&self, bytes: &[u8]) -> DomainResult<ImageRef>;

    /// Fetch the binary behind a reference, if still present.
    fn get(&self, image: &ImageRef) -> Option<Vec<u8>>;
}

/// In-memory image store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryImageStore {
    inner: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageStore for InMemoryImageStore {
    fn put(&self, bytes: &[u8]) -> DomainResult<ImageRef> {
        if bytes.is_empty() {
            return Err(DomainError::validation("image payload is empty"));
        }

        let key = format!("motas/{}", Uuid::now_v7());
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::conflict("image store lock poisoned"))?;
        map.insert(key.clone(), bytes.to_vec());
        Ok(ImageRef(key))
    }

    fn get(&self, image: &ImageRef) -> Option<Vec<u8>> {
        let map = self.inner.read().ok()?;
        map.get(image.as_str()).cloned()
    }
}

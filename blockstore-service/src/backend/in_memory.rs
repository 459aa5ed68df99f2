//! In-memory backend for tests.
//!
//! This provides a [`Backend`] backed by a `HashMap`, removing the need for filesystem tempdir
//! management in tests. The backend is [`Clone`] so tests can keep a handle to insert objects
//! while the store owns a boxed copy.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use futures_util::StreamExt;

use super::Backend;
use crate::error::StoreResult;
use crate::stream::PayloadStream;

/// A [`Backend`] holding all objects in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    objects: Arc<Mutex<HashMap<String, Bytes>>>,
}

impl InMemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `contents` under `path`, replacing any previous object.
    pub fn insert(&self, path: impl Into<String>, contents: impl Into<Bytes>) {
        self.lock().insert(path.into(), contents.into());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Bytes>> {
        // A poisoned map still holds valid bytes.
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait::async_trait]
impl Backend for InMemoryBackend {
    fn name(&self) -> &'static str {
        "in-memory"
    }

    async fn get_object(&self, path: &str) -> StoreResult<Option<PayloadStream>> {
        let entry = self.lock().get(path).cloned();
        Ok(entry.map(|bytes| futures_util::stream::once(async move { Ok(bytes) }).boxed()))
    }
}

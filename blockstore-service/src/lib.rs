//! The block store provides read access to merged block files kept in a local directory or in a
//! cloud bucket.
//!
//! A [`BlockStore`] is created from a store URL (see [`StoreLocation`]) and opens objects by their
//! bare name. The store takes care of the object prefix, the file extension, and on-the-fly
//! decompression, and hands out an [`ObjectReader`] that can be drained with
//! [`tokio::io::AsyncReadExt`].
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod backend;
mod error;
pub mod location;
mod reader;
pub mod stream;

pub use error::{StoreError, StoreResult};
pub use location::{Compression, StoreLocation};
pub use reader::ObjectReader;

use crate::backend::BoxedBackend;
use crate::location::Storage;

/// Read-only handle on a store of block files.
#[derive(Debug)]
pub struct BlockStore {
    backend: BoxedBackend,
    prefix: String,
    extension: Option<String>,
    compression: Compression,
}

impl BlockStore {
    /// Creates a store for the given location.
    pub async fn new(location: StoreLocation) -> StoreResult<Self> {
        let (backend, prefix): (BoxedBackend, String) = match location.storage {
            Storage::FileSystem { path } => (Box::new(backend::LocalFs::new(&path)), String::new()),
            Storage::Gcs { bucket, prefix } => (backend::gcs(&bucket).await?, prefix),
            Storage::S3Compatible {
                endpoint,
                bucket,
                prefix,
            } => (
                Box::new(backend::S3Compatible::without_token(&endpoint, &bucket)?),
                prefix,
            ),
        };

        tracing::debug!(
            backend = backend.name(),
            %prefix,
            extension = location.extension.as_deref(),
            compression = %location.compression,
            "created block store"
        );

        Ok(Self {
            backend,
            prefix,
            extension: location.extension,
            compression: location.compression,
        })
    }

    /// Parses `url` and creates a store for it.
    pub async fn from_url(url: &str) -> StoreResult<Self> {
        Self::new(StoreLocation::parse(url)?).await
    }

    /// Creates a store that opens objects by their exact name on `backend`.
    pub fn with_backend(backend: BoxedBackend) -> Self {
        Self {
            backend,
            prefix: String::new(),
            extension: None,
            compression: Compression::None,
        }
    }

    /// Sets the extension appended to object names.
    pub fn extension(mut self, extension: Option<&str>) -> Self {
        self.extension = extension.map(ToOwned::to_owned);
        self
    }

    /// Sets the encoding of objects at rest.
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Opens the object with the given bare name for reading.
    ///
    /// Fails with [`StoreError::NotFound`] if the object does not exist.
    pub async fn open_object(&self, name: &str) -> StoreResult<ObjectReader> {
        let path = self.object_path(name);
        let Some(stream) = self.backend.get_object(&path).await? else {
            return Err(StoreError::NotFound { path });
        };

        Ok(ObjectReader::new(path, stream, self.compression))
    }

    fn object_path(&self, name: &str) -> String {
        let name = name.trim_start_matches('/');
        let mut path = match self.prefix.as_str() {
            "" => name.to_owned(),
            prefix => format!("{prefix}/{name}"),
        };
        if let Some(extension) = &self.extension {
            path.push('.');
            path.push_str(extension);
        }
        path
    }
}

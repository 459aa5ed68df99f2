use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::fs::OpenOptions;
use tokio_util::io::ReaderStream;

use super::Backend;
use crate::error::StoreResult;
use crate::stream::PayloadStream;

/// Serves objects from files below a root directory.
#[derive(Debug)]
pub struct LocalFs {
    path: PathBuf,
}

impl LocalFs {
    /// Creates a backend rooted at `path`.
    pub fn new(path: &Path) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl Backend for LocalFs {
    fn name(&self) -> &'static str {
        "local-fs"
    }

    #[tracing::instrument(level = "trace", fields(?path), skip_all)]
    async fn get_object(&self, path: &str) -> StoreResult<Option<PayloadStream>> {
        tracing::debug!("Reading from local_fs backend");
        let path = self.path.join(path);
        let file = match OpenOptions::new().read(true).open(path).await {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!("Object not found");
                return Ok(None);
            }
            err => err?,
        };

        Ok(Some(ReaderStream::new(file).boxed()))
    }
}

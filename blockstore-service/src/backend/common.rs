use std::fmt::Debug;

use crate::error::{StoreError, StoreResult};
use crate::stream::PayloadStream;

/// User agent string used for outgoing requests.
pub const USER_AGENT: &str = concat!("blockstore-readtest/", env!("CARGO_PKG_VERSION"));

/// A type-erased [`Backend`] instance.
pub type BoxedBackend = Box<dyn Backend>;

/// Read access to a flat namespace of objects.
#[async_trait::async_trait]
pub trait Backend: Debug + Send + Sync + 'static {
    /// The backend name, used for diagnostics.
    fn name(&self) -> &'static str;

    /// Retrieves the object at the given path as a stream of bytes.
    ///
    /// Returns `None` if the object does not exist.
    async fn get_object(&self, path: &str) -> StoreResult<Option<PayloadStream>>;
}

/// Creates a reqwest client with required defaults.
pub(crate) fn reqwest_client() -> StoreResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|cause| StoreError::reqwest("building http client", cause))
}

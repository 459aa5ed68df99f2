use thiserror::Error;

/// Errors that can occur when constructing a [`BlockStore`](crate::BlockStore) or opening objects.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store URL could not be parsed or points to an unusable location.
    #[error("invalid store url `{url}`: {reason}")]
    InvalidUrl {
        /// The URL as it was given.
        url: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The store URL uses a scheme without a backend.
    #[error("unsupported store scheme `{0}`")]
    UnsupportedScheme(String),

    /// The requested object does not exist in the store.
    #[error("object not found: {path}")]
    NotFound {
        /// Full path of the object within the backend.
        path: String,
    },

    /// IO errors related to payload streaming or file operations.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors stemming from the reqwest client, used by the cloud backends.
    ///
    /// These can be network errors encountered when sending the requests, but can also indicate
    /// errors returned by the API itself.
    #[error("reqwest error: {context}")]
    Reqwest {
        /// The operation that failed.
        context: String,
        /// The underlying client error.
        #[source]
        cause: reqwest::Error,
    },

    /// Errors encountered when attempting to authenticate with GCP.
    #[error("GCP authentication error: {0}")]
    GcpAuth(#[from] gcp_auth::Error),
}

impl StoreError {
    pub(crate) fn invalid_url(url: &str, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn reqwest(context: impl Into<String>, cause: reqwest::Error) -> Self {
        Self::Reqwest {
            context: context.into(),
            cause,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

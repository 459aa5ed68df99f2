use blockstore_service::StoreError;
use thiserror::Error;

/// Fatal errors that abort a read test run.
#[derive(Debug, Error)]
pub enum SamplerError {
    /// An object could not be opened.
    #[error("unable to open object {name}")]
    Open {
        /// Bare name of the object.
        name: String,
        /// The store failure.
        #[source]
        source: StoreError,
    },

    /// Reading an opened object failed before its end.
    #[error("unable to read object {name}")]
    Read {
        /// Bare name of the object.
        name: String,
        /// The stream failure.
        #[source]
        source: std::io::Error,
    },

    /// Writing a report line failed.
    #[error("unable to write report")]
    Report(#[source] std::io::Error),
}

/// Errors in the read test configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration sources could not be merged or deserialized.
    #[error("unable to load configuration")]
    Load(#[from] Box<figment::Error>),

    /// A setting has a value the sampler cannot work with.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Name of the offending setting.
        field: &'static str,
        /// Why the value is rejected.
        reason: &'static str,
    },
}

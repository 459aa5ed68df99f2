//! Parsing of store URLs.
//!
//! A store URL names the backend and the base location of the objects, and carries hints about
//! how objects are named and encoded:
//!
//! ```text
//! file:///var/lib/blocks/merged?extension=dbin.zst
//! /var/lib/blocks/merged
//! gs://blocks-bucket/mainnet/merged?compression=zstd
//! s3://blocks-bucket/mainnet/merged?endpoint=http://localhost:9000
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use url::Url;

use crate::error::{StoreError, StoreResult};

/// Extension appended to object names unless the URL overrides it.
pub const DEFAULT_EXTENSION: &str = "dbin.zst";

/// Endpoint used for `s3://` URLs without an `endpoint` parameter.
pub const DEFAULT_S3_ENDPOINT: &str = "https://s3.amazonaws.com";

/// The backend a store URL points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    /// A directory on the local filesystem.
    FileSystem {
        /// Canonical path of the directory.
        path: PathBuf,
    },
    /// A Google Cloud Storage bucket.
    Gcs {
        /// Bucket name.
        bucket: String,
        /// Object prefix inside the bucket, without leading or trailing slashes.
        prefix: String,
    },
    /// A bucket behind an S3-compatible API.
    S3Compatible {
        /// Base URL of the API.
        endpoint: String,
        /// Bucket name.
        bucket: String,
        /// Object prefix inside the bucket, without leading or trailing slashes.
        prefix: String,
    },
}

/// How objects are encoded at rest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// Bytes are read as stored.
    #[default]
    None,
    /// Objects are zstd frames, decompressed while reading.
    Zstd,
}

impl FromStr for Compression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "none" => Ok(Self::None),
            "zstd" | "zst" => Ok(Self::Zstd),
            other => Err(format!("unknown compression `{other}`")),
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Zstd => f.write_str("zstd"),
        }
    }
}

/// A parsed store URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLocation {
    /// The backend and base location.
    pub storage: Storage,
    /// Extension appended to every object name, if any.
    pub extension: Option<String>,
    /// Encoding applied to objects at rest.
    pub compression: Compression,
}

impl StoreLocation {
    /// Parses a store URL or a plain filesystem path.
    ///
    /// Filesystem locations are canonicalized, so the directory must exist.
    pub fn parse(input: &str) -> StoreResult<Self> {
        let url = match Url::parse(input) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                return Ok(Self {
                    storage: Storage::FileSystem {
                        path: canonical_dir(input, input.into())?,
                    },
                    extension: Some(DEFAULT_EXTENSION.to_owned()),
                    compression: Compression::None,
                });
            }
            Err(err) => return Err(StoreError::invalid_url(input, err.to_string())),
        };

        let mut extension = Some(DEFAULT_EXTENSION.to_owned());
        let mut compression = Compression::None;
        let mut endpoint = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "extension" => {
                    let value = value.trim_start_matches('.');
                    extension = (!value.is_empty()).then(|| value.to_owned());
                }
                "compression" => {
                    compression = value
                        .parse()
                        .map_err(|reason| StoreError::invalid_url(input, reason))?;
                }
                "endpoint" => endpoint = Some(value.into_owned()),
                other => tracing::warn!(parameter = other, "ignoring unknown store url parameter"),
            }
        }

        let storage = match url.scheme() {
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|()| StoreError::invalid_url(input, "not a local file path"))?;
                Storage::FileSystem {
                    path: canonical_dir(input, path)?,
                }
            }
            "gs" => Storage::Gcs {
                bucket: bucket_name(input, &url)?,
                prefix: object_prefix(&url),
            },
            "s3" => Storage::S3Compatible {
                endpoint: endpoint.unwrap_or_else(|| DEFAULT_S3_ENDPOINT.to_owned()),
                bucket: bucket_name(input, &url)?,
                prefix: object_prefix(&url),
            },
            scheme => return Err(StoreError::UnsupportedScheme(scheme.to_owned())),
        };

        Ok(Self {
            storage,
            extension,
            compression,
        })
    }
}

fn canonical_dir(input: &str, path: PathBuf) -> StoreResult<PathBuf> {
    let path = std::fs::canonicalize(&path)
        .map_err(|err| StoreError::invalid_url(input, format!("{}: {err}", path.display())))?;
    if !path.is_dir() {
        return Err(StoreError::invalid_url(
            input,
            format!("{} is not a directory", path.display()),
        ));
    }
    Ok(path)
}

fn bucket_name(input: &str, url: &Url) -> StoreResult<String> {
    match url.host_str() {
        Some(bucket) if !bucket.is_empty() => Ok(bucket.to_owned()),
        _ => Err(StoreError::invalid_url(input, "missing bucket name")),
    }
}

fn object_prefix(url: &Url) -> String {
    url.path().trim_matches('/').to_owned()
}

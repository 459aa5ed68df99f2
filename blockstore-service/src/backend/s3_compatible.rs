use std::fmt;
use std::io;

use futures_util::{StreamExt, TryStreamExt};
use reqwest::StatusCode;

use super::Backend;
use super::common::reqwest_client;
use crate::error::{StoreError, StoreResult};
use crate::stream::PayloadStream;

/// A bearer token attached to outgoing requests.
pub trait Token: Send + Sync {
    /// The raw token value.
    fn as_str(&self) -> &str;
}

/// Hands out tokens for authenticated backends.
pub trait TokenProvider: Send + Sync + 'static {
    /// Returns a token that is valid for at least the next request.
    fn get_token(&self) -> impl Future<Output = StoreResult<impl Token>> + Send;
}

/// Placeholder provider for anonymous access; never consulted.
#[derive(Debug)]
pub struct NoToken;

impl TokenProvider for NoToken {
    async fn get_token(&self) -> StoreResult<impl Token> {
        Ok(NoToken)
    }
}

impl Token for NoToken {
    fn as_str(&self) -> &str {
        ""
    }
}

/// Reads objects over HTTP from an S3-compatible API, `{endpoint}/{bucket}/{path}`.
pub struct S3Compatible<T> {
    client: reqwest::Client,

    endpoint: String,
    bucket: String,

    token_provider: Option<T>,
}

impl<T> S3Compatible<T> {
    /// Creates a backend that authenticates every request with a token from `token_provider`.
    pub fn new(endpoint: &str, bucket: &str, token_provider: T) -> StoreResult<Self> {
        Ok(Self {
            client: reqwest_client()?,
            endpoint: endpoint.trim_end_matches('/').into(),
            bucket: bucket.into(),
            token_provider: Some(token_provider),
        })
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/{}/{path}", self.endpoint, self.bucket)
    }
}

impl S3Compatible<NoToken> {
    /// Creates a backend that sends anonymous requests.
    pub fn without_token(endpoint: &str, bucket: &str) -> StoreResult<Self> {
        Ok(Self {
            client: reqwest_client()?,
            endpoint: endpoint.trim_end_matches('/').into(),
            bucket: bucket.into(),
            token_provider: None,
        })
    }
}

impl<T> fmt::Debug for S3Compatible<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Compatible")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("authenticated", &self.token_provider.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl<T: TokenProvider> Backend for S3Compatible<T> {
    fn name(&self) -> &'static str {
        "s3-compatible"
    }

    #[tracing::instrument(level = "trace", fields(?path), skip_all)]
    async fn get_object(&self, path: &str) -> StoreResult<Option<PayloadStream>> {
        tracing::debug!("Reading from s3_compatible backend");
        let get_url = self.object_url(path);

        let mut builder = self.client.get(&get_url);
        if let Some(provider) = &self.token_provider {
            builder = builder.bearer_auth(provider.get_token().await?.as_str());
        }
        let response = builder
            .send()
            .await
            .map_err(|cause| StoreError::reqwest(format!("requesting {get_url}"), cause))?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("Object not found");
            return Ok(None);
        }

        let response = response
            .error_for_status()
            .map_err(|cause| StoreError::reqwest(format!("reading {get_url}"), cause))?;

        let stream = response.bytes_stream().map_err(io::Error::other);
        Ok(Some(stream.boxed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_url_joins_endpoint_and_bucket() {
        let backend = S3Compatible::without_token("http://localhost:9000/", "blocks").unwrap();

        assert_eq!(
            backend.object_url("mainnet/0000000100.dbin.zst"),
            "http://localhost:9000/blocks/mainnet/0000000100.dbin.zst"
        );
    }

    #[test]
    fn debug_hides_client() {
        let backend = S3Compatible::without_token("http://localhost:9000", "blocks").unwrap();

        let debug = format!("{backend:?}");
        assert!(debug.contains("\"blocks\""));
        assert!(debug.contains("authenticated: false"));
    }
}

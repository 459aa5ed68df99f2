use std::sync::Arc;

use super::BoxedBackend;
use super::s3_compatible::{S3Compatible, Token, TokenProvider};
use crate::error::StoreResult;

const GCS_ENDPOINT: &str = "https://storage.googleapis.com";
const GCS_READ_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_only";

impl TokenProvider for Arc<dyn gcp_auth::TokenProvider> {
    async fn get_token(&self) -> StoreResult<impl Token> {
        let token = self.token(&[GCS_READ_SCOPE]).await?;
        Ok(token)
    }
}

impl Token for Arc<gcp_auth::Token> {
    fn as_str(&self) -> &str {
        gcp_auth::Token::as_str(self)
    }
}

/// Creates a Google Cloud Storage backend for `bucket` using Application Default Credentials.
pub async fn gcs(bucket: &str) -> StoreResult<BoxedBackend> {
    let token_provider = gcp_auth::provider().await?;
    Ok(Box::new(S3Compatible::new(
        GCS_ENDPOINT,
        bucket,
        token_provider,
    )?))
}

//! Payload stream type and test utilities.

use futures_util::stream::BoxStream;

/// Type alias for the byte streams returned by backends.
pub type PayloadStream = BoxStream<'static, std::io::Result<bytes::Bytes>>;

/// Creates a [`PayloadStream`] yielding the given chunks in order.
#[cfg(test)]
pub(crate) fn make_stream(chunks: &[&[u8]]) -> PayloadStream {
    use futures_util::StreamExt;
    let chunks: Vec<_> = chunks
        .iter()
        .map(|chunk| Ok(bytes::Bytes::copy_from_slice(chunk)))
        .collect();
    futures_util::stream::iter(chunks).boxed()
}

/// Collects a [`PayloadStream`] into a `Vec<u8>`.
#[cfg(test)]
pub(crate) async fn read_to_vec(mut stream: PayloadStream) -> std::io::Result<Vec<u8>> {
    use futures_util::TryStreamExt;
    let mut payload = Vec::new();
    while let Some(chunk) = stream.try_next().await? {
        payload.extend(&chunk);
    }
    Ok(payload)
}

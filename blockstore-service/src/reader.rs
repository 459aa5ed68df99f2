use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use async_compression::tokio::bufread::ZstdDecoder;
use tokio::io::{AsyncRead, ReadBuf};
use tokio_util::io::StreamReader;

use crate::location::Compression;
use crate::stream::PayloadStream;

/// A readable handle on a single object.
///
/// Reading `0` bytes into a non-empty buffer signals the end of the object. Dropping the reader
/// releases the underlying file handle or connection.
pub struct ObjectReader {
    path: String,
    inner: Pin<Box<dyn AsyncRead + Send>>,
}

impl ObjectReader {
    pub(crate) fn new(path: String, stream: PayloadStream, compression: Compression) -> Self {
        let reader = StreamReader::new(stream);
        let inner: Pin<Box<dyn AsyncRead + Send>> = match compression {
            Compression::None => Box::pin(reader),
            Compression::Zstd => Box::pin(ZstdDecoder::new(reader)),
        };

        Self { path, inner }
    }

    /// Full path of the object within its backend.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl AsyncRead for ObjectReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        self.inner.as_mut().poll_read(cx, buf)
    }
}

impl fmt::Debug for ObjectReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectReader")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

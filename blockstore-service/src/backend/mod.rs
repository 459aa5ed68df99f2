//! Storage backends serving object bytes by path.

mod common;
mod gcs;
mod in_memory;
mod local_fs;
mod s3_compatible;

pub use common::{Backend, BoxedBackend, USER_AGENT};
pub use gcs::gcs;
pub use in_memory::InMemoryBackend;
pub use local_fs::LocalFs;
pub use s3_compatible::{NoToken, S3Compatible, Token, TokenProvider};

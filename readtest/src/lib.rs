//! A read throughput tester for stores of merged block files.
//!
//! The sampler opens the objects `base_offset`, `base_offset + stride`, ... one after another,
//! drains each of them through a scratch buffer, and reports the transfer rate of every sampling
//! window plus summary statistics. See [`Sampler`] for the loop and [`config::Config`] for the
//! settings.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod cli;
pub mod config;
mod error;
pub mod observability;
pub mod offset;
pub mod report;
pub mod sampler;

pub use crate::error::{ConfigError, SamplerError};
pub use crate::sampler::{Sampler, Summary};

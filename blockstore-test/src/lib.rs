//! Test utilities for the block store and the read tester.
//!
//! See the modules for all available utilities.

pub mod tracing;

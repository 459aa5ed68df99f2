//! Logging setup for the readtest binary.

use std::env;

use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, prelude::*};

/// Installs the global `tracing` subscriber, logging to stderr.
///
/// Report lines go to stdout, so logs never interleave with them in a redirected file.
pub fn init_tracing() {
    let (level, env_filter) = parse_rust_log();
    let format = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(format.with_filter(LevelFilter::from(level)))
        .with(env_filter)
        .init();
}

/// Interprets `RUST_LOG`.
///
/// A plain level applies to the workspace crates. Anything else is used literally as a filter
/// directive.
pub fn parse_rust_log() -> (Level, EnvFilter) {
    parse_log_filter(env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
}

fn parse_log_filter(value: Option<&str>) -> (Level, EnvFilter) {
    let level = match value {
        Some(value) => match value.parse::<Level>() {
            Ok(level) => level,
            Err(_) => return (Level::TRACE, EnvFilter::new(value)),
        },
        None => Level::WARN,
    };

    // This is the maximum verbosity that will be logged, we filter this down to `level`.
    let env_filter = EnvFilter::new(
        "WARN,\
        readtest=TRACE,\
        blockstore_service=TRACE,\
        ",
    );

    (level, env_filter)
}

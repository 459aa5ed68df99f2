//! Command line entry point.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use argh::FromArgs;
use blockstore_service::BlockStore;

use crate::config::Config;
use crate::observability;
use crate::offset::parse_block_offset;
use crate::report::TextReport;
use crate::sampler::Sampler;

/// Measure sequential read throughput and open latency of a merged blocks store.
#[derive(Debug, FromArgs)]
struct Args {
    /// path to the YAML configuration file
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// store location: a directory, or a file://, gs:// or s3:// URL
    #[argh(positional)]
    store_url: String,

    /// first block number to read, decimal or 0x/0o/0b prefixed
    #[argh(positional, from_str_fn(parse_block_offset), default = "0")]
    block_offset: u64,
}

/// Bootstrap the runtime and run the read test.
pub fn execute() -> Result<()> {
    let args: Args = argh::from_env();

    observability::init_tracing();
    if !std::io::stdout().is_terminal() {
        yansi::disable();
    }

    let config = Config::load(args.config.as_deref()).context("invalid configuration")?;
    tracing::debug!(?config);

    // A single thread keeps every fetch strictly serialized.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let store = BlockStore::from_url(&args.store_url)
            .await
            .context("unable to create store")?;
        tracing::info!(store = ?store, offset = args.block_offset, "store ready");

        let sampler = Sampler::new(config, args.block_offset);
        let mut report = TextReport::stdout();
        let summary = sampler.run(&store, &mut report).await?;
        report.summary(&summary)?;

        Ok(())
    })
}

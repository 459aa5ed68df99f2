//! Reads a sequence of merged block files from a store and reports the transfer rate.
//!
//! See [`readtest::cli`] for the arguments.

fn main() -> anyhow::Result<()> {
    readtest::cli::execute()
}

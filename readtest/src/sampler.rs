//! The throughput sampler drives the read loop and does all accounting.
//!
//! Objects are opened one after another and drained through a fixed-size scratch buffer. Every
//! chunk is counted twice: into the run total, and into the currently open rate window. A window
//! closes on the first chunk read after its period has elapsed, and its rate is handed to the
//! [`Report`]. The time budget is only checked between objects.

use std::fmt;
use std::time::Duration;

use blockstore_service::BlockStore;
use sketches_ddsketch::DDSketch;
use tokio::io::AsyncReadExt;
use tokio::time::Instant;

use crate::config::Config;
use crate::error::SamplerError;

/// Width of the zero-padded decimal object names.
pub const NAME_WIDTH: usize = 10;

/// Name of the object read at `index`, or `None` once the block number overflows.
pub fn object_name(base_offset: u64, index: u64, stride: u64) -> Option<String> {
    let block_number = index.checked_mul(stride)?.checked_add(base_offset)?;
    Some(format!("{block_number:0NAME_WIDTH$}"))
}

/// Receives progress of a running sampler.
pub trait Report {
    /// Called once before the first object is opened.
    fn start(&mut self, window_period: Duration) -> std::io::Result<()>;

    /// Called every time a rate window closes.
    fn window(&mut self, sample: &WindowSample) -> std::io::Result<()>;
}

/// Bytes read during one closed rate window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSample {
    /// Bytes read while the window was open.
    pub bytes: u64,
    /// Configured window length.
    pub period: Duration,
    /// Time between the window opening and closing, at least `period`.
    pub elapsed: Duration,
}

impl WindowSample {
    /// Transfer rate of the window in bytes per second, over the configured period.
    pub fn rate(&self) -> f64 {
        rate(self.bytes, self.period)
    }
}

/// Bytes per second, or `0.0` for an empty period.
pub fn rate(bytes: u64, period: Duration) -> f64 {
    let seconds = period.as_secs_f64();
    if seconds > 0.0 {
        bytes as f64 / seconds
    } else {
        0.0
    }
}

/// Final statistics of a completed run.
pub struct Summary {
    /// Bytes read across all objects.
    pub total_bytes: u64,
    /// Number of successfully opened objects.
    pub fetch_count: u64,
    /// Sum of all open latencies.
    pub total_fetch_time: Duration,
    /// Distribution of open latencies, in seconds.
    pub fetch_latency: DDSketch,
    /// Actual run time.
    pub elapsed: Duration,
    /// Configured time budget.
    pub test_duration: Duration,
}

impl Summary {
    /// Mean open latency, or `None` if no object was opened.
    pub fn mean_fetch_time(&self) -> Option<Duration> {
        if self.fetch_count == 0 {
            return None;
        }
        let nanos = self.total_fetch_time.as_nanos() / u128::from(self.fetch_count);
        Some(Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX)))
    }

    /// Open latency quantile, or `None` if no object was opened.
    pub fn fetch_time_quantile(&self, quantile: f64) -> Option<Duration> {
        let seconds = self.fetch_latency.quantile(quantile).ok().flatten()?;
        Some(Duration::from_secs_f64(seconds.max(0.0)))
    }

    /// Share of the time budget spent opening objects, in percent.
    pub fn fetch_time_share(&self) -> f64 {
        let budget = self.test_duration.as_secs_f64();
        if budget > 0.0 {
            self.total_fetch_time.as_secs_f64() / budget * 100.0
        } else {
            0.0
        }
    }

    /// Overall transfer rate over the actual run time, in bytes per second.
    pub fn overall_rate(&self) -> f64 {
        rate(self.total_bytes, self.elapsed)
    }
}

impl fmt::Debug for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Summary")
            .field("total_bytes", &self.total_bytes)
            .field("fetch_count", &self.fetch_count)
            .field("total_fetch_time", &self.total_fetch_time)
            .field("elapsed", &self.elapsed)
            .field("test_duration", &self.test_duration)
            .finish_non_exhaustive()
    }
}

/// The rate window that is currently accumulating.
#[derive(Debug)]
struct Window {
    start: Instant,
    period: Duration,
    bytes: u64,
}

impl Window {
    fn new(start: Instant, period: Duration) -> Self {
        Self {
            start,
            period,
            bytes: 0,
        }
    }

    /// Closes the window if its period has elapsed at `now`, and opens the next one.
    fn roll(&mut self, now: Instant) -> Option<WindowSample> {
        let elapsed = now.duration_since(self.start);
        if elapsed < self.period {
            return None;
        }

        let sample = WindowSample {
            bytes: self.bytes,
            period: self.period,
            elapsed,
        };
        self.start = now;
        self.bytes = 0;
        Some(sample)
    }
}

/// Accumulators of a single run, owned by the sampler loop.
struct Accounting {
    start: Instant,
    total_bytes: u64,
    total_fetch_time: Duration,
    fetch_count: u64,
    fetch_latency: DDSketch,
    window: Window,
}

impl Accounting {
    fn new(start: Instant, window_period: Duration) -> Self {
        Self {
            start,
            total_bytes: 0,
            total_fetch_time: Duration::ZERO,
            fetch_count: 0,
            fetch_latency: DDSketch::default(),
            window: Window::new(start, window_period),
        }
    }

    fn record_fetch(&mut self, latency: Duration) {
        self.total_fetch_time += latency;
        self.fetch_count += 1;
        self.fetch_latency.add(latency.as_secs_f64());
    }

    fn record_bytes(&mut self, bytes: u64) {
        self.total_bytes += bytes;
        self.window.bytes += bytes;
        debug_assert!(self.window.bytes <= self.total_bytes);
    }

    fn finish(self, test_duration: Duration) -> Summary {
        Summary {
            total_bytes: self.total_bytes,
            fetch_count: self.fetch_count,
            total_fetch_time: self.total_fetch_time,
            fetch_latency: self.fetch_latency,
            elapsed: self.start.elapsed(),
            test_duration,
        }
    }
}

impl fmt::Debug for Accounting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accounting")
            .field("start", &self.start)
            .field("total_bytes", &self.total_bytes)
            .field("total_fetch_time", &self.total_fetch_time)
            .field("fetch_count", &self.fetch_count)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

/// Sequential read throughput sampler.
#[derive(Debug, Clone)]
pub struct Sampler {
    config: Config,
    base_offset: u64,
}

impl Sampler {
    /// Creates a sampler probing objects from `base_offset` on.
    pub fn new(config: Config, base_offset: u64) -> Self {
        Self {
            config,
            base_offset,
        }
    }

    /// Runs the read test against `store` until the time budget or the iteration cap is exhausted.
    ///
    /// Any failure to open or read an object aborts the run; no summary is produced then.
    pub async fn run(
        &self,
        store: &BlockStore,
        report: &mut impl Report,
    ) -> Result<Summary, SamplerError> {
        let mut buffer = vec![0u8; self.config.buffer_len()];
        report
            .start(self.config.window_period)
            .map_err(SamplerError::Report)?;

        let mut accounting = Accounting::new(Instant::now(), self.config.window_period);
        for index in 0..self.config.max_iterations {
            let Some(name) = object_name(self.base_offset, index, self.config.stride) else {
                tracing::warn!(index, "block number overflows, stopping early");
                break;
            };

            read_object(store, &name, &mut buffer, &mut accounting, report).await?;

            if accounting.start.elapsed() > self.config.test_duration {
                tracing::debug!(index, "time budget exhausted");
                break;
            }
        }

        Ok(accounting.finish(self.config.test_duration))
    }
}

/// Opens one object and drains it, closing rate windows along the way.
///
/// The reader is dropped on every return path.
#[tracing::instrument(level = "trace", skip(store, buffer, accounting, report))]
async fn read_object(
    store: &BlockStore,
    name: &str,
    buffer: &mut [u8],
    accounting: &mut Accounting,
    report: &mut impl Report,
) -> Result<(), SamplerError> {
    let open_start = Instant::now();
    let mut reader = store
        .open_object(name)
        .await
        .map_err(|source| SamplerError::Open {
            name: name.to_owned(),
            source,
        })?;
    accounting.record_fetch(open_start.elapsed());

    let mut object_bytes = 0;
    loop {
        let read = reader
            .read(buffer)
            .await
            .map_err(|source| SamplerError::Read {
                name: name.to_owned(),
                source,
            })?;
        if read == 0 {
            break;
        }

        if let Some(sample) = accounting.window.roll(Instant::now()) {
            report.window(&sample).map_err(SamplerError::Report)?;
        }

        accounting.record_bytes(read as u64);
        object_bytes += read as u64;
    }

    tracing::trace!(path = reader.path(), object_bytes, "drained object");
    Ok(())
}

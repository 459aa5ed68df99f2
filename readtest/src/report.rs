//! Human-readable output of a read test run.

use std::io::{self, Write};
use std::time::Duration;

use bytesize::ByteSize;
use yansi::Paint;

use crate::sampler::{self, Report, Summary, WindowSample};

/// Formats a transfer rate with binary unit prefixes, e.g. `12.3 MiB/s`.
pub fn format_rate(bytes_per_second: f64) -> String {
    // Fractions of a byte per second are not worth printing.
    let rate = if bytes_per_second.is_finite() && bytes_per_second > 0.0 {
        bytes_per_second as u64
    } else {
        0
    };
    format!("{}/s", ByteSize::b(rate).display().iec())
}

/// Formats the rate of `bytes` read over `period`.
pub fn bytes_rate(bytes: u64, period: Duration) -> String {
    format_rate(sampler::rate(bytes, period))
}

/// Writes line-oriented progress and the final summary.
#[derive(Debug)]
pub struct TextReport<W> {
    out: W,
}

impl TextReport<io::Stdout> {
    /// A report printing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TextReport<W> {
    /// A report writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the report and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Prints the statistics of a completed run.
    pub fn summary(&mut self, summary: &Summary) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", "## SUMMARY".bold())?;

        match summary.mean_fetch_time() {
            Some(mean) => writeln!(
                self.out,
                "Overall average fetch time: {:.2?} ({} fetches, {:.2}% of total time)",
                mean.bold(),
                summary.fetch_count,
                summary.fetch_time_share(),
            )?,
            None => writeln!(
                self.out,
                "Overall average fetch time: {} (0 fetches)",
                "n/a".bold()
            )?,
        }

        if let (Some(p50), Some(p90), Some(p99)) = (
            summary.fetch_time_quantile(0.5),
            summary.fetch_time_quantile(0.9),
            summary.fetch_time_quantile(0.99),
        ) {
            writeln!(self.out, "  p50: {p50:.2?}; p90: {p90:.2?}; p99: {p99:.2?}")?;
        }

        writeln!(
            self.out,
            "Overall transfer rate: {} ({} bytes in {:.2?})",
            format_rate(summary.overall_rate()).bold().green(),
            summary.total_bytes,
            summary.elapsed,
        )?;
        self.out.flush()
    }
}

impl<W: Write> Report for TextReport<W> {
    fn start(&mut self, window_period: Duration) -> io::Result<()> {
        writeln!(
            self.out,
            "Starting read test (transfer rate will be printed each {window_period:?})"
        )?;
        self.out.flush()
    }

    fn window(&mut self, sample: &WindowSample) -> io::Result<()> {
        writeln!(
            self.out,
            "{} ({} in {:.2?})",
            format_rate(sample.rate()).bold(),
            ByteSize::b(sample.bytes).display().iec(),
            sample.elapsed,
        )?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use sketches_ddsketch::DDSketch;

    use super::*;

    fn render(f: impl FnOnce(&mut TextReport<Vec<u8>>) -> io::Result<()>) -> String {
        yansi::disable();
        let mut report = TextReport::new(Vec::new());
        f(&mut report).unwrap();
        String::from_utf8(report.into_inner()).unwrap()
    }

    #[test]
    fn rates_use_binary_units() {
        assert_eq!(bytes_rate(1_048_576, Duration::from_secs(1)), "1.0 MiB/s");
        assert_eq!(bytes_rate(10 * 1024, Duration::from_secs(5)), "2.0 KiB/s");
        assert_eq!(bytes_rate(1000, Duration::from_secs(1)), "1000 B/s");
        assert_eq!(format_rate(1.5 * 1024.0 * 1024.0 * 1024.0), "1.5 GiB/s");
    }

    #[test]
    fn degenerate_rates_are_zero() {
        assert_eq!(bytes_rate(1000, Duration::ZERO), "0 B/s");
        assert_eq!(format_rate(f64::NAN), "0 B/s");
    }

    #[test]
    fn banner_and_windows() {
        let output = render(|report| {
            report.start(Duration::from_secs(5))?;
            report.window(&WindowSample {
                bytes: 5 * 1024 * 1024,
                period: Duration::from_secs(5),
                elapsed: Duration::from_secs(5),
            })?;
            // A late chunk stretches the window; the rate still uses the period.
            report.window(&WindowSample {
                bytes: 3000,
                period: Duration::from_secs(5),
                elapsed: Duration::from_secs(6),
            })
        });

        let lines: Vec<_> = output.lines().collect();
        assert_eq!(
            lines,
            [
                "Starting read test (transfer rate will be printed each 5s)",
                "1.0 MiB/s (5.0 MiB in 5.00s)",
                "600 B/s (2.9 KiB in 6.00s)",
            ]
        );
    }

    #[test]
    fn summary_lines() {
        let mut fetch_latency = DDSketch::default();
        fetch_latency.add(0.01);
        fetch_latency.add(0.03);
        let summary = Summary {
            total_bytes: 7596,
            fetch_count: 2,
            total_fetch_time: Duration::from_millis(40),
            fetch_latency,
            elapsed: Duration::from_secs(2),
            test_duration: Duration::from_secs(120),
        };

        let output = render(|report| report.summary(&summary));

        assert!(output.contains("## SUMMARY"));
        assert!(
            output.contains("Overall average fetch time: 20.00ms (2 fetches, 0.03% of total time)"),
            "{output}"
        );
        assert!(output.contains("  p50: "));
        assert!(
            output.contains("Overall transfer rate: 3.7 KiB/s (7596 bytes in 2.00s)"),
            "{output}"
        );
    }

    #[test]
    fn summary_without_fetches() {
        let summary = Summary {
            total_bytes: 0,
            fetch_count: 0,
            total_fetch_time: Duration::ZERO,
            fetch_latency: DDSketch::default(),
            elapsed: Duration::from_millis(3),
            test_duration: Duration::from_secs(120),
        };

        let output = render(|report| report.summary(&summary));

        assert!(output.contains("Overall average fetch time: n/a (0 fetches)"));
        assert!(!output.contains("p50"));
        assert!(output.contains("Overall transfer rate: 0 B/s (0 bytes in 3.00ms)"));
    }
}

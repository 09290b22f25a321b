//! CLI argument definitions

use crate::analysis::{AnalyzerConfig, Thresholds};
use crate::export::DEFAULT_REPORT_PATH;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "taskscope",
    version,
    about = "Run a battery of async concurrency probes and flag slow, leaky or memory-hungry ones",
    after_help = "\
EXAMPLES:
    taskscope                                Run every probe, write analysis_report.json
    taskscope --probe join_set --probe run_tasks
                                             Run a subset, in the order given
    taskscope --with-leak --trace trace.json Include the leaking probe, export a timeline
    taskscope --concurrent                   Run all probes at once, print start/end times
    taskscope --replay analysis_report.json  Print a saved report"
)]
pub struct Args {
    /// Write the JSON report to FILE
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_REPORT_PATH)]
    pub output: PathBuf,

    /// Also export a Chrome trace timeline to FILE
    #[arg(long, value_name = "FILE")]
    pub trace: Option<PathBuf>,

    /// Print a previously saved report instead of running probes
    #[arg(long, value_name = "FILE", conflicts_with_all = ["concurrent", "list"])]
    pub replay: Option<PathBuf>,

    /// Start every probe at once and report timings only
    #[arg(long)]
    pub concurrent: bool,

    /// Run only the named probe (repeatable)
    #[arg(short, long = "probe", value_name = "NAME")]
    pub probes: Vec<String>,

    /// List available probes and exit
    #[arg(long)]
    pub list: bool,

    /// Append the deliberately leaking probe to the battery
    #[arg(long)]
    pub with_leak: bool,

    /// Pause before each probe's baseline snapshot, in milliseconds
    #[arg(long, value_name = "MS", default_value = "100")]
    pub settle_before_ms: u64,

    /// Pause between probe completion and the closing snapshot, in milliseconds
    #[arg(long, value_name = "MS", default_value = "50")]
    pub settle_after_ms: u64,

    /// Per-probe deadline in seconds (0 = unlimited)
    #[arg(long, value_name = "SECS", default_value = "10")]
    pub timeout_secs: u64,

    /// Flag probes slower than this, in milliseconds
    #[arg(long, value_name = "MS", default_value = "500")]
    pub slow_ms: u64,

    /// Flag probes leaving more than this many extra tasks alive
    #[arg(long, value_name = "N", default_value = "3")]
    pub leak_workers: i64,

    /// Flag probes growing the heap by more than this many MiB
    #[arg(long, value_name = "MIB", default_value = "5")]
    pub memory_mib: i64,

    /// Flag probes triggering more than this many GC passes
    #[arg(long, value_name = "N", default_value = "2")]
    pub gc_cycles: u64,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            slow: Duration::from_millis(self.slow_ms),
            leak_workers: self.leak_workers,
            high_memory_bytes: self.memory_mib.saturating_mul(1024 * 1024),
            frequent_gc_cycles: self.gc_cycles,
        }
    }

    pub fn probe_timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            settle_before: Duration::from_millis(self.settle_before_ms),
            settle_after: Duration::from_millis(self.settle_after_ms),
            probe_timeout: self.probe_timeout(),
            thresholds: self.thresholds(),
        }
    }
}

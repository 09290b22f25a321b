//! Human-readable formatting for byte counts and durations.

// Display values intentionally lose precision
#![allow(clippy::cast_precision_loss)]

use std::time::Duration;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Format a signed byte count: `"512 B"`, `"1.5 KB"`, `"6.0 MB"`, `"-2.0 KB"`.
#[must_use]
pub fn format_bytes(bytes: i64) -> String {
    let sign = if bytes < 0 { "-" } else { "" };
    let magnitude = bytes.unsigned_abs();
    if magnitude < KIB {
        format!("{sign}{magnitude} B")
    } else if magnitude < MIB {
        format!("{sign}{:.1} KB", magnitude as f64 / KIB as f64)
    } else {
        format!("{sign}{:.1} MB", magnitude as f64 / MIB as f64)
    }
}

/// Format a duration: `"750 ns"`, `"1.5 µs"`, `"600.0 ms"`, `"1.50 s"`.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    if d < Duration::from_micros(1) {
        format!("{} ns", d.as_nanos())
    } else if d < Duration::from_millis(1) {
        format!("{:.1} µs", d.as_nanos() as f64 / 1_000.0)
    } else if d < Duration::from_secs(1) {
        format!("{:.1} ms", d.as_secs_f64() * 1_000.0)
    } else {
        format!("{:.2} s", d.as_secs_f64())
    }
}

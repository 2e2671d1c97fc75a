//! Shared formatting helpers for the rendered report.
//!
//! Pure conversions only; layout lives in [`crate::render`].

use chrono::{DateTime, TimeZone};

/// Placeholder for a value that was read but could not be resolved.
pub const UNKNOWN: &str = "unknown";

/// Placeholder for a numeric sentinel.
pub const UNAVAILABLE: &str = "unavailable";

const KIB_PER_GB: f64 = 1024.0 * 1024.0;
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// KiB to GB (binary, 1024^2 KiB). Signed so inconsistent memory figures
/// survive the conversion.
pub fn kib_to_gb(kib: i64) -> f64 {
    kib as f64 / KIB_PER_GB
}

/// Bytes to GB (binary, 1024^3 bytes).
pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

/// Seconds as `HH:MM:SS`. Hours are not wrapped at 24; fractions are dropped.
///
/// `"00:00:59"`, `"03:25:45"`, `"100:00:00"`
pub fn format_hms(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs as u64
    } else {
        0
    };
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Wall-clock stamp: `[14:03:27][Mon][Oct][2026-10-19][+02:00]`.
pub fn format_timestamp<Tz: TimeZone>(ts: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.format("[%H:%M:%S][%a][%b][%Y-%m-%d][%:z]").to_string()
}

/// The string itself, or the unknown placeholder when absent or empty.
pub fn or_unknown(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => UNKNOWN,
    }
}

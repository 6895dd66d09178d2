//! Human-scale formatting of raw metric magnitudes.
//!
//! The backend reports rates in MB/s and cumulative totals in MB. These
//! functions pick the largest unit that keeps the displayed magnitude
//! readable. All of them are pure: identical input always yields identical
//! output, and NaN input collapses to a canonical zero string rather than
//! leaking "NaN" into the UI.

/// Format a network rate given in MB/s.
///
/// - `x < 1` → KB/s (×1024)
/// - `1 ≤ x < 1024` → MB/s
/// - `x ≥ 1024` → GB/s (÷1024)
///
/// NaN → `"0 KB/s"`.
pub fn format_network_rate(mb_per_s: f64) -> String {
    if mb_per_s.is_nan() {
        return "0 KB/s".to_string();
    }
    scale_rate(mb_per_s)
}

/// Format a disk I/O rate given in MB/s.
///
/// Same scaling as [`format_network_rate`], but NaN → `"0 MB/s"` to match
/// the disk card's resting display.
pub fn format_disk_rate(mb_per_s: f64) -> String {
    if mb_per_s.is_nan() {
        return "0 MB/s".to_string();
    }
    scale_rate(mb_per_s)
}

fn scale_rate(mb_per_s: f64) -> String {
    if mb_per_s < 1.0 {
        format!("{:.2} KB/s", mb_per_s * 1024.0)
    } else if mb_per_s < 1024.0 {
        format!("{mb_per_s:.2} MB/s")
    } else {
        format!("{:.2} GB/s", mb_per_s / 1024.0)
    }
}

/// Format a raw percentage with fixed precision. No clamping is applied.
///
/// NaN → `"0.00%"` regardless of the requested precision.
pub fn format_percent(percent: f64, decimals: usize) -> String {
    if percent.is_nan() {
        return "0.00%".to_string();
    }
    format!("{percent:.decimals$}%")
}

/// Format a cumulative traffic total given in MB.
///
/// - `x ≥ 1024²` → TB
/// - `x ≥ 1024` → GB
/// - otherwise → MB
///
/// NaN → `"0 MB"`.
pub fn format_total(mb: f64) -> String {
    if mb.is_nan() {
        return "0 MB".to_string();
    }
    if mb >= 1024.0 * 1024.0 {
        format!("{:.2} TB", mb / 1024.0 / 1024.0)
    } else if mb >= 1024.0 {
        format!("{:.2} GB", mb / 1024.0)
    } else {
        format!("{mb:.2} MB")
    }
}

/// Format an uptime in seconds as whole days and hours.
pub fn format_uptime(seconds: f64) -> String {
    if seconds.is_nan() || seconds < 0.0 {
        return "0d 0h".to_string();
    }
    let total = seconds as u64;
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    format!("{days}d {hours}h")
}

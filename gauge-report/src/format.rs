//! Human-Readable Units
//!
//! Auto-scales picoseconds and byte counts to the largest unit that keeps
//! the printed magnitude at three or four significant digits.

use gauge_stats::Estimate;

const TIME_UNITS: [(&str, f64); 5] = [
    ("ps", 1.0),
    ("ns", 1e3),
    ("μs", 1e6),
    ("ms", 1e9),
    ("s", 1e12),
];

const BYTE_UNITS: [(&str, f64); 5] = [
    ("B", 1.0),
    ("KB", 1024.0),
    ("MB", 1024.0 * 1024.0),
    ("GB", 1024.0 * 1024.0 * 1024.0),
    ("TB", 1024.0 * 1024.0 * 1024.0 * 1024.0),
];

/// Format a picosecond count.
///
/// Moves to the next unit once the value reaches 995 of the current one and
/// prints one decimal while the scaled value is below 99.5. The 9.95
/// decimal cut applies to [`format_bytes`] only.
///
/// ```
/// use gauge_report::format_time;
///
/// assert_eq!(format_time(994), "994 ps");
/// assert_eq!(format_time(995), "1.0 ns");
/// assert_eq!(format_time(12_300), "12.3 ns");
/// assert_eq!(format_time(99_600), "100 ns");
/// assert_eq!(format_time(1_500_000), "1.5 μs");
/// ```
pub fn format_time(ps: i64) -> String {
    format_scaled(ps, &TIME_UNITS, 995.0, 99.5)
}

/// Format a byte count with 1024-based units.
///
/// Moves to the next unit once the value would round to 1000 and prints one
/// decimal while the scaled value is below 9.95.
///
/// ```
/// use gauge_report::format_bytes;
///
/// assert_eq!(format_bytes(10_188), "9.9 KB");
/// assert_eq!(format_bytes(10_189), "10 KB");
/// ```
pub fn format_bytes(bytes: i64) -> String {
    format_scaled(bytes, &BYTE_UNITS, 999.5, 9.95)
}

/// Render an estimate as `mean ± 2σ`, followed by allocation figures when
/// accounting is available.
pub fn format_estimate(estimate: &Estimate, accounting: bool) -> String {
    let mut out = format!(
        "{} ± {}",
        format_time(estimate.mean.time),
        format_time(estimate.sigma.saturating_mul(2))
    );
    if accounting {
        out.push_str(&format!(
            ", {} allocated, {} copied",
            format_bytes(estimate.mean.allocated),
            format_bytes(estimate.mean.copied)
        ));
    }
    out
}

fn format_scaled(value: i64, units: &[(&str, f64)], switch_at: f64, decimal_below: f64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let magnitude = value.unsigned_abs() as f64;

    let mut index = 0;
    while index + 1 < units.len() && magnitude / units[index].1 >= switch_at {
        index += 1;
    }

    let (unit, factor) = units[index];
    let scaled = magnitude / factor;
    if index == 0 {
        // base units are whole numbers
        format!("{sign}{scaled:.0} {unit}")
    } else if scaled < decimal_below {
        format!("{sign}{scaled:.1} {unit}")
    } else {
        format!("{sign}{scaled:.0} {unit}")
    }
}

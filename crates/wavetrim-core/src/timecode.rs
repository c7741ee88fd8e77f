//! Human-readable time labels

/// Format whole seconds as `m:ss` (67 -> "1:07")
///
/// Negative inputs are treated as zero.
pub fn format_timecode(whole_secs: i64) -> String {
    let secs = whole_secs.max(0);
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Format seconds with two decimals, rounding the fraction half-up
///
/// Used for the start/end text fields. A fraction that rounds to 100
/// carries into the whole part (`1.999` -> `"2.00"`).
pub fn format_decimal(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let mut whole = seconds.trunc() as i64;
    let mut frac = (100.0 * (seconds - whole as f64) + 0.5) as i64;
    if frac >= 100 {
        whole += 1;
        frac -= 100;
    }
    format!("{}.{:02}", whole, frac)
}

/// Parse a seconds value typed into a text field
///
/// Returns `None` for anything that isn't a finite, non-negative number.
pub fn parse_seconds(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite() && *s >= 0.0)
}

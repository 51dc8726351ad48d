/// Renders a duration in seconds as `m:ss`, truncating both components.
/// Anything unusable (absent, negative, NaN) renders as `0:00`.
pub fn format_time(seconds: Option<f64>) -> String {
    let secs = match seconds {
        Some(s) if s.is_finite() && s >= 0.0 => s as u64,
        _ => 0,
    };
    format!("{}:{:02}", secs / 60, secs % 60)
}

pub fn format_millis(millis: u64) -> String {
    format_time(Some(millis as f64 / 1000.0))
}

/// Parses a metadata duration value. Accepts a bare seconds figure.
pub fn parse_duration(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|s| s.is_finite() && *s >= 0.0)
}

//! Shot timestamp parsing and formatting.
//!
//! The analysis model reports shot times as `m:ss.S` (older prompt) or
//! `mm:ss` (current prompt). Both are accepted without a format flag; the
//! shape of the seconds field decides which one was sent.

/// Timestamp used when a shot record carries no usable time.
pub const DEFAULT_TIMESTAMP: &str = "0:00.0";

/// Structural shape of a timestamp string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// `m:ss.S`, seconds with a fractional part
    Fractional,
    /// `mm:ss`, whole seconds
    Whole,
}

impl TimestampFormat {
    /// Detect the format of a timestamp that parses successfully.
    pub fn detect(ts: &str) -> Result<Self, TimestampError> {
        parse_timestamp(ts)?;
        if ts.contains('.') {
            Ok(Self::Fractional)
        } else {
            Ok(Self::Whole)
        }
    }
}

/// Parse a `minutes:seconds` timestamp to total seconds.
///
/// Minutes must be a whole number. Seconds may carry a fractional part.
/// There is no hours component, so a second colon is rejected.
///
/// # Examples
/// ```
/// use courtside_models::timestamp::parse_timestamp;
/// assert_eq!(parse_timestamp("1:23.5").unwrap(), 83.5);
/// assert_eq!(parse_timestamp("00:04").unwrap(), 4.0);
/// ```
pub fn parse_timestamp(ts: &str) -> Result<f64, TimestampError> {
    let ts = ts.trim();
    if ts.is_empty() {
        return Err(TimestampError::Empty);
    }

    let (minutes, seconds) = ts
        .split_once(':')
        .ok_or_else(|| TimestampError::InvalidFormat(ts.to_string()))?;

    if !is_digits(minutes) {
        return Err(TimestampError::InvalidValue("minutes", minutes.to_string()));
    }
    if !is_seconds(seconds) {
        return Err(TimestampError::InvalidValue("seconds", seconds.to_string()));
    }

    let minutes: f64 = minutes
        .parse()
        .map_err(|_| TimestampError::InvalidValue("minutes", minutes.to_string()))?;
    let seconds: f64 = seconds
        .parse()
        .map_err(|_| TimestampError::InvalidValue("seconds", seconds.to_string()))?;

    Ok(minutes * 60.0 + seconds)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_seconds(s: &str) -> bool {
    match s.split_once('.') {
        Some((whole, frac)) => is_digits(whole) && is_digits(frac),
        None => is_digits(s),
    }
}

/// Format seconds as a `m:ss` clock for timelines and shot lists.
pub fn format_clock(total_secs: f64) -> String {
    let total_secs = if total_secs.is_finite() { total_secs.max(0.0) } else { 0.0 };
    let mins = (total_secs / 60.0).floor() as u64;
    let secs = (total_secs % 60.0).floor() as u64;
    format!("{}:{:02}", mins, secs)
}

/// Format seconds in the canonical `m:ss.S` shot timestamp form.
pub fn format_timestamp(total_secs: f64) -> String {
    let total_secs = if total_secs.is_finite() { total_secs.max(0.0) } else { 0.0 };
    // Round to tenths first so 59.96 becomes 1:00.0 rather than 0:60.0
    let tenths = (total_secs * 10.0).round() as u64;
    let mins = tenths / 600;
    let rem = tenths % 600;
    format!("{}:{:02}.{}", mins, rem / 10, rem % 10)
}

/// Timestamp parsing error.
#[derive(Debug, Clone, PartialEq)]
pub enum TimestampError {
    /// Timestamp string is empty
    Empty,
    /// Invalid numeric value for a component
    InvalidValue(&'static str, String),
    /// No `minutes:seconds` separator
    InvalidFormat(String),
}

impl std::fmt::Display for TimestampError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Timestamp cannot be empty"),
            Self::InvalidValue(component, value) => {
                write!(f, "Invalid {} value: {}", component, value)
            }
            Self::InvalidFormat(ts) => write!(
                f,
                "Invalid timestamp format '{}'. Use m:ss.S or mm:ss",
                ts
            ),
        }
    }
}

impl std::error::Error for TimestampError {}

//! Duration literals used in target expressions and configuration
//!
//! Accepted syntax is one or more `<integer><unit>` groups, e.g. `6h`,
//! `1h5m0s`, `2w`, with units `s`, `m`, `h`, `d`, `w`. Formatting follows the
//! hour/minute/second layout (`1h5m0s`, `30m0s`, `45s`).

use std::time::Duration;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;
const SECONDS_PER_WEEK: u64 = 7 * SECONDS_PER_DAY;

fn unit_seconds(unit: char) -> Option<u64> {
    match unit {
        's' => Some(1),
        'm' => Some(SECONDS_PER_MINUTE),
        'h' => Some(SECONDS_PER_HOUR),
        'd' => Some(SECONDS_PER_DAY),
        'w' => Some(SECONDS_PER_WEEK),
        _ => None,
    }
}

/// Parse a duration literal such as `6h` or `1h5m0s`
pub fn parse_duration(s: &str) -> Result<Duration, DurationError> {
    if s.is_empty() {
        return Err(DurationError::Empty);
    }

    let invalid = || DurationError::Invalid(s.to_string());
    let mut total: u64 = 0;
    let mut chars = s.chars().peekable();

    while chars.peek().is_some() {
        let mut amount: u64 = 0;
        let mut digits = 0;
        while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
            amount = amount
                .checked_mul(10)
                .and_then(|a| a.checked_add(u64::from(digit)))
                .ok_or(DurationError::Overflow)?;
            digits += 1;
            chars.next();
        }
        if digits == 0 {
            return Err(invalid());
        }

        let unit = chars.next().ok_or_else(invalid)?;
        let scale = unit_seconds(unit).ok_or_else(invalid)?;
        total = amount
            .checked_mul(scale)
            .and_then(|part| total.checked_add(part))
            .ok_or(DurationError::Overflow)?;
    }

    Ok(Duration::from_secs(total))
}

/// Render a duration as hours, minutes and seconds, e.g. `1h5m0s`
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let nanos = d.subsec_nanos();

    if secs == 0 {
        return match nanos {
            0 => "0s".to_string(),
            n if n % 1_000_000 == 0 => format!("{}ms", n / 1_000_000),
            n if n % 1_000 == 0 => format!("{}µs", n / 1_000),
            n => format!("{}ns", n),
        };
    }

    let hours = secs / SECONDS_PER_HOUR;
    let minutes = (secs % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = secs % SECONDS_PER_MINUTE;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    if nanos == 0 {
        out.push_str(&format!("{}s", seconds));
    } else {
        let fraction = format!("{:09}", nanos);
        out.push_str(&format!("{}.{}s", seconds, fraction.trim_end_matches('0')));
    }
    out
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DurationError {
    #[error("empty duration")]
    Empty,

    #[error("invalid duration: {0}")]
    Invalid(String),

    #[error("duration out of range")]
    Overflow,
}

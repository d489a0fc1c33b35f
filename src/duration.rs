//! Signed elapsed time, as accepted on the command line.
//!
//! Text is a compound of `<number><unit>` groups, `1h2m3s`, `1.5s`,
//! `-250ms`, with units `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`.
use std::{fmt, fmt::Write as _, str::FromStr};

use thiserror::Error;

const NANOSECOND: i64 = 1;
const MICROSECOND: i64 = 1_000 * NANOSECOND;
const MILLISECOND: i64 = 1_000 * MICROSECOND;
const SECOND: i64 = 1_000 * MILLISECOND;
const MINUTE: i64 = 60 * SECOND;
const HOUR: i64 = 60 * MINUTE;

/// Nanoseconds, which may be negative.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(i64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDurationError {
    #[error("invalid duration {0:?}")]
    Invalid(String),
    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),
    #[error("unknown unit {unit:?} in duration {text:?}")]
    UnknownUnit { unit: String, text: String },
    #[error("duration {0:?} is out of range")]
    OutOfRange(String),
}

impl Duration {
    pub const ZERO: Duration = Duration(0);
    pub const NANOSECOND: Duration = Duration(NANOSECOND);
    pub const MICROSECOND: Duration = Duration(MICROSECOND);
    pub const MILLISECOND: Duration = Duration(MILLISECOND);
    pub const SECOND: Duration = Duration(SECOND);
    pub const MINUTE: Duration = Duration(MINUTE);
    pub const HOUR: Duration = Duration(HOUR);

    pub const fn from_nanos(nanos: i64) -> Duration {
        Duration(nanos)
    }
    pub const fn from_millis(millis: i64) -> Duration {
        Duration(millis * MILLISECOND)
    }
    pub const fn from_secs(secs: i64) -> Duration {
        Duration(secs * SECOND)
    }
    pub const fn from_mins(mins: i64) -> Duration {
        Duration(mins * MINUTE)
    }
    pub const fn from_hours(hours: i64) -> Duration {
        Duration(hours * HOUR)
    }

    pub const fn as_nanos(self) -> i64 {
        self.0
    }
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / SECOND as f64
    }
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// `None` for negative durations.
    pub fn to_std(self) -> Option<std::time::Duration> {
        u64::try_from(self.0).ok().map(std::time::Duration::from_nanos)
    }
}

impl TryFrom<std::time::Duration> for Duration {
    type Error = std::num::TryFromIntError;

    fn try_from(d: std::time::Duration) -> Result<Duration, Self::Error> {
        i64::try_from(d.as_nanos()).map(Duration)
    }
}

impl FromStr for Duration {
    type Err = ParseDurationError;

    fn from_str(text: &str) -> Result<Duration, ParseDurationError> {
        parse(text)
    }
}

fn parse(text: &str) -> Result<Duration, ParseDurationError> {
    let invalid = || ParseDurationError::Invalid(text.to_string());
    let out_of_range = || ParseDurationError::OutOfRange(text.to_string());

    let (negative, mut s) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err(invalid());
    }

    // One past i64::MAX, so that i64::MIN is reachable.
    let limit = i64::MAX as u128 + 1;
    let mut total: u128 = 0;
    while !s.is_empty() {
        let (int_part, rest) = split_digits(s);
        let (frac_part, rest) = match rest.strip_prefix('.') {
            Some(rest) => split_digits(rest),
            None => ("", rest),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }

        let unit_len = rest.find(|c: char| c == '.' || c.is_ascii_digit()).unwrap_or(rest.len());
        let (unit, rest) = rest.split_at(unit_len);
        let scale = match unit {
            "" => return Err(ParseDurationError::MissingUnit(text.to_string())),
            "ns" => NANOSECOND,
            "us" | "\u{b5}s" | "\u{3bc}s" => MICROSECOND,
            "ms" => MILLISECOND,
            "s" => SECOND,
            "m" => MINUTE,
            "h" => HOUR,
            _ => {
                return Err(ParseDurationError::UnknownUnit {
                    unit: unit.to_string(),
                    text: text.to_string(),
                })
            }
        };
        let scale = scale as u128;

        let int = if int_part.is_empty() {
            0
        } else {
            int_part.parse::<u128>().map_err(|_| out_of_range())?
        };
        let mut value = int.checked_mul(scale).ok_or_else(out_of_range)?;
        if !frac_part.is_empty() {
            // Digits past the eighteenth cannot move the result by a nanosecond.
            let digits = &frac_part[..frac_part.len().min(18)];
            let frac = digits.parse::<u128>().map_err(|_| invalid())?;
            value += frac * scale / 10u128.pow(digits.len() as u32);
        }

        total = total.checked_add(value).filter(|it| *it <= limit).ok_or_else(out_of_range)?;
        s = rest;
    }

    if !negative && total == limit {
        return Err(out_of_range());
    }
    let nanos = if negative { -(total as i128) } else { total as i128 };
    Ok(Duration(nanos as i64))
}

fn split_digits(s: &str) -> (&str, &str) {
    let n = s.bytes().take_while(u8::is_ascii_digit).count();
    s.split_at(n)
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.pad("0s");
        }
        let mut buf = String::new();
        if self.0 < 0 {
            buf.push('-');
        }
        let u = self.0.unsigned_abs();
        if u < SECOND as u64 {
            let (unit, prec) = if u < MICROSECOND as u64 {
                ("ns", 0)
            } else if u < MILLISECOND as u64 {
                ("\u{b5}s", 3)
            } else {
                ("ms", 6)
            };
            let (int, frac) = split_frac(u, prec);
            let _ = write!(buf, "{int}{frac}{unit}");
        } else {
            let (secs, frac) = split_frac(u, 9);
            let mins = secs / 60;
            let hours = mins / 60;
            if hours > 0 {
                let _ = write!(buf, "{hours}h");
            }
            if mins > 0 {
                let _ = write!(buf, "{}m", mins % 60);
            }
            let _ = write!(buf, "{}{frac}s", secs % 60);
        }
        f.pad(&buf)
    }
}

/// Splits `v` into its integer part at `10^prec` and the `.digits` suffix,
/// trailing zeros trimmed.
fn split_frac(v: u64, prec: u32) -> (u64, String) {
    let scale = 10u64.pow(prec);
    let frac = v % scale;
    if frac == 0 {
        return (v / scale, String::new());
    }
    let digits = format!("{:0width$}", frac, width = prec as usize);
    (v / scale, format!(".{}", digits.trim_end_matches('0')))
}

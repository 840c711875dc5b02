//! Compound unit-suffixed durations: `300ms`, `1.5s`, `1h30m`.
//!
//! Units: `ns`, `us` (`µs`, `μs`), `ms`, `s`, `m`, `h`. A bare `0` needs no
//! unit. Rendering uses the largest units first and keeps seconds:
//! `1h30m0s`, `1m30s`, `1.5s`, `300ms`.

use std::fmt::Write;
use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

// Fraction digits beyond this are below nanosecond resolution for every unit.
const MAX_FRACTION_DIGITS: usize = 18;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    #[error("invalid duration {0:?}")]
    Invalid(String),

    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),

    #[error("unknown unit {unit:?} in duration {raw:?}")]
    UnknownUnit { unit: String, raw: String },

    #[error("duration {0:?} out of range")]
    Overflow(String),

    #[error("negative duration {0:?}")]
    Negative(String),
}

fn unit_nanos(unit: &str) -> Option<u128> {
    Some(match unit {
        "ns" => 1,
        "us" | "\u{b5}s" | "\u{3bc}s" => 1_000,
        "ms" => 1_000_000,
        "s" => NANOS_PER_SEC,
        "m" => 60 * NANOS_PER_SEC,
        "h" => 3_600 * NANOS_PER_SEC,
        _ => return None,
    })
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

pub fn parse(raw: &str) -> Result<Duration, DurationError> {
    let (negative, mut rest) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(DurationError::Invalid(raw.to_owned()));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, tail) = split_digits(rest);
        let (fraction, tail) = match tail.strip_prefix('.') {
            Some(after_dot) => split_digits(after_dot),
            None => ("", tail),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(DurationError::Invalid(raw.to_owned()));
        }

        let unit_end = tail
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);
        if unit.is_empty() {
            return Err(DurationError::MissingUnit(raw.to_owned()));
        }
        let per_unit = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_owned(),
            raw: raw.to_owned(),
        })?;

        let overflow = || DurationError::Overflow(raw.to_owned());
        let whole_value: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let mut value = whole_value.checked_mul(per_unit).ok_or_else(overflow)?;

        if !fraction.is_empty() {
            let digits = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
            let numerator: u128 = digits
                .parse()
                .map_err(|_| DurationError::Invalid(raw.to_owned()))?;
            let scale = 10u128.pow(digits.len() as u32);
            value = value
                .checked_add(numerator * per_unit / scale)
                .ok_or_else(overflow)?;
        }

        total = total.checked_add(value).ok_or_else(overflow)?;
        rest = tail;
    }

    if negative && total != 0 {
        return Err(DurationError::Negative(raw.to_owned()));
    }

    let secs = u64::try_from(total / NANOS_PER_SEC)
        .map_err(|_| DurationError::Overflow(raw.to_owned()))?;
    Ok(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

pub fn format(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        return "0s".to_owned();
    }

    if nanos < NANOS_PER_SEC {
        let (unit, precision) = if nanos < 1_000 {
            ("ns", 0)
        } else if nanos < 1_000_000 {
            ("\u{b5}s", 3)
        } else {
            ("ms", 6)
        };
        let mut out = with_fraction(nanos, precision);
        out.push_str(unit);
        return out;
    }

    let secs = d.as_secs();
    let (hours, minutes, seconds) = (secs / 3_600, secs / 60 % 60, secs % 60);
    let mut out = String::new();
    if hours > 0 {
        let _ = write!(out, "{hours}h");
    }
    if hours > 0 || minutes > 0 {
        let _ = write!(out, "{minutes}m");
    }
    let second_nanos = u128::from(seconds) * NANOS_PER_SEC + u128::from(d.subsec_nanos());
    out.push_str(&with_fraction(second_nanos, 9));
    out.push('s');
    out
}

/// `value / 10^precision` in decimal, trailing fraction zeros dropped.
fn with_fraction(value: u128, precision: u32) -> String {
    let scale = 10u128.pow(precision);
    let (whole, fraction) = (value / scale, value % scale);
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{fraction:0width$}", width = precision as usize);
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compound_units() {
        assert_eq!(parse("1h30m"), Ok(Duration::from_secs(5_400)));
        assert_eq!(parse("1h"), Ok(Duration::from_secs(3_600)));
        assert_eq!(parse("1.5s"), Ok(Duration::from_millis(1_500)));
        assert_eq!(parse(".5m"), Ok(Duration::from_secs(30)));
        assert_eq!(parse("300ms"), Ok(Duration::from_millis(300)));
        assert_eq!(parse("2us"), Ok(Duration::from_micros(2)));
        assert_eq!(parse("2\u{b5}s"), Ok(Duration::from_micros(2)));
        assert_eq!(parse("1m1s1ms1us1ns"), Ok(Duration::new(61, 1_001_001)));
        assert_eq!(parse("+5s"), Ok(Duration::from_secs(5)));
    }

    #[test]
    fn zero_forms() {
        assert_eq!(parse("0"), Ok(Duration::ZERO));
        assert_eq!(parse("-0"), Ok(Duration::ZERO));
        assert_eq!(parse("0s"), Ok(Duration::ZERO));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(parse(""), Err(DurationError::Invalid(_))));
        assert!(matches!(parse("."), Err(DurationError::Invalid(_))));
        assert!(matches!(parse("12"), Err(DurationError::MissingUnit(_))));
        assert!(matches!(parse("3d"), Err(DurationError::UnknownUnit { .. })));
        assert!(matches!(parse("-1s"), Err(DurationError::Negative(_))));
        assert!(matches!(
            parse("99999999999999999999999999999999999999999h"),
            Err(DurationError::Overflow(_))
        ));
    }

    #[test]
    fn formats_like_parse_reads() {
        assert_eq!(format(Duration::ZERO), "0s");
        assert_eq!(format(Duration::from_secs(5_400)), "1h30m0s");
        assert_eq!(format(Duration::from_secs(90)), "1m30s");
        assert_eq!(format(Duration::from_millis(1_500)), "1.5s");
        assert_eq!(format(Duration::from_millis(300)), "300ms");
        assert_eq!(format(Duration::from_micros(1_500)), "1.5ms");
        assert_eq!(format(Duration::from_nanos(1_500)), "1.5\u{b5}s");
        assert_eq!(format(Duration::from_nanos(42)), "42ns");
        assert_eq!(format(Duration::from_secs(3_601)), "1h0m1s");
    }

    #[test]
    fn round_trips_through_text() {
        for d in [
            Duration::from_secs(5_400),
            Duration::new(61, 1_001_001),
            Duration::from_millis(1_500),
            Duration::from_nanos(7),
        ] {
            assert_eq!(parse(&format(d)), Ok(d));
        }
    }
}

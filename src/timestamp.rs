// src/timestamp.rs

use crate::error::{HistoryError, HistoryResult};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Timelike};

/// How far back the history goes when no cutoff is given
pub const DEFAULT_WINDOW_DAYS: i64 = 365;

const OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";
const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A parsed commit date, with or without a UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Offset(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

impl Timestamp {
    pub fn parse(raw: &str) -> HistoryResult<Self> {
        let raw = raw.trim();
        let expanded = expand_iso(raw);

        if let Ok(dt) = DateTime::parse_from_str(&expanded, OFFSET_FORMAT) {
            return Ok(Timestamp::Offset(dt));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(&expanded, NAIVE_FORMAT) {
            return Ok(Timestamp::Naive(dt));
        }
        if let Some(midnight) = NaiveDate::parse_from_str(&expanded, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return Ok(Timestamp::Naive(midnight));
        }

        Err(HistoryError::InvalidTimestamp {
            value: raw.to_string(),
        })
    }

    /// Canonical `YYYY-MM-DDTHH:MM:SS[.ffffff][+HH:MM]` form
    pub fn to_iso(&self) -> String {
        match self {
            Timestamp::Offset(dt) => {
                format!("{}{}", format_naive(&dt.naive_local()), dt.format("%:z"))
            }
            Timestamp::Naive(dt) => format_naive(dt),
        }
    }
}

fn format_naive(dt: &NaiveDateTime) -> String {
    if dt.nanosecond() / 1_000 == 0 {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Rewrites the ISO-8601 spellings seen in the wild into
/// `YYYY-MM-DDTHH:MM:SS[.f][+HH:MM]`, or a bare `YYYY-MM-DD`.
///
/// Covers basic format (`20230101T100000`), a space instead of `T` with a
/// spaced offset (`git log --date=iso`), hour-only times and offsets, comma
/// fractions and `Z`. Anything else is returned as-is and fails to parse.
fn expand_iso(raw: &str) -> String {
    let (date, rest) = match raw.get(..8).filter(|d| all_digits(d)) {
        Some(d) => (format!("{}-{}-{}", &d[..4], &d[4..6], &d[6..]), &raw[8..]),
        None => match raw.get(..10) {
            Some(d) => (d.to_string(), &raw[10..]),
            None => return raw.to_string(),
        },
    };
    if rest.is_empty() {
        return date;
    }
    let time = match rest.strip_prefix(['T', 't', ' ']) {
        Some(time) => time.trim_start(),
        None => return raw.to_string(),
    };

    let (clock, offset) = match time.find(['+', '-', 'Z', 'z']) {
        Some(i) => (time[..i].trim_end(), &time[i..]),
        None => (time, ""),
    };
    format!("{date}T{}{}", expand_clock(clock), expand_offset(offset))
}

fn expand_clock(clock: &str) -> String {
    let (main, fraction) = match clock.find(['.', ',']) {
        Some(i) => (&clock[..i], &clock[i + 1..]),
        None => (clock, ""),
    };

    let mut parts: Vec<&str> = if main.contains(':') {
        main.split(':').collect()
    } else if all_digits(main) && main.len() % 2 == 0 {
        (0..main.len()).step_by(2).map(|i| &main[i..i + 2]).collect()
    } else {
        vec![main]
    };
    while parts.len() < 3 {
        parts.push("00");
    }

    let mut expanded = parts.join(":");
    if !fraction.is_empty() {
        expanded.push('.');
        expanded.push_str(fraction);
    }
    expanded
}

fn expand_offset(offset: &str) -> String {
    if offset.eq_ignore_ascii_case("z") {
        return "+00:00".to_string();
    }
    let Some(sign) = offset.get(..1) else {
        return String::new();
    };
    let body = &offset[1..];
    if !all_digits(body) {
        return offset.to_string();
    }
    match body.len() {
        2 => format!("{sign}{body}:00"),
        4 => format!("{sign}{}:{}", &body[..2], &body[2..]),
        _ => offset.to_string(),
    }
}

pub fn normalize_timestamp(raw: &str) -> HistoryResult<String> {
    Ok(Timestamp::parse(raw)?.to_iso())
}

/// Cutoff used when none is supplied: one year before `now`.
pub fn default_cutoff(now: NaiveDateTime) -> String {
    format_naive(&(now - Duration::days(DEFAULT_WINDOW_DAYS)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naive_timestamp_is_unchanged() {
        assert_eq!(
            normalize_timestamp("2023-01-01T10:00:00").unwrap(),
            "2023-01-01T10:00:00"
        );
    }

    #[test]
    fn test_git_iso_date_is_normalized() {
        assert_eq!(
            normalize_timestamp("2023-01-01 10:00:00 +0100").unwrap(),
            "2023-01-01T10:00:00+01:00"
        );
        assert_eq!(
            normalize_timestamp("2023-06-30 23:59:59 -0730").unwrap(),
            "2023-06-30T23:59:59-07:30"
        );
    }

    #[test]
    fn test_offset_spellings_agree() {
        let expected = "2023-01-01T10:00:00+00:00";
        for raw in [
            "2023-01-01T10:00:00Z",
            "2023-01-01T10:00:00+00:00",
            "2023-01-01T10:00:00+0000",
            "2023-01-01 10:00:00 +0000",
            "2023-01-01T10:00:00+00",
            "20230101T100000Z",
            "20230101T100000+0000",
        ] {
            assert_eq!(normalize_timestamp(raw).unwrap(), expected, "input {raw}");
        }
    }

    #[test]
    fn test_fractional_seconds_keep_microseconds() {
        assert_eq!(
            normalize_timestamp("2023-01-01T10:00:00.250").unwrap(),
            "2023-01-01T10:00:00.250000"
        );
        assert_eq!(
            normalize_timestamp("2023-01-01T10:00:00.000").unwrap(),
            "2023-01-01T10:00:00"
        );
    }

    #[test]
    fn test_compact_and_partial_forms() {
        for (raw, expected) in [
            ("20230101T100000", "2023-01-01T10:00:00"),
            ("20230101T1000", "2023-01-01T10:00:00"),
            ("2023-01-01T10", "2023-01-01T10:00:00"),
            ("2023-01-01T10:00:00+01", "2023-01-01T10:00:00+01:00"),
            ("2023-01-01T10:00:00,5", "2023-01-01T10:00:00.500000"),
            ("20230101", "2023-01-01T00:00:00"),
        ] {
            assert_eq!(normalize_timestamp(raw).unwrap(), expected, "input {raw}");
        }
    }

    #[test]
    fn test_date_only_is_midnight() {
        assert_eq!(
            normalize_timestamp("2023-02-01").unwrap(),
            "2023-02-01T00:00:00"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in [
            "2023-01-01T10:00:00",
            "2023-01-01 10:00:00 +0100",
            "2023-01-01T10:00:00.123456-05:00",
            "2023-01-01 08:15",
            "20230101T100000",
            "2023-01-01T10",
            "2023-01-01T10:00:00+01",
            "2023-01-01T10:00:00,5",
        ] {
            let once = normalize_timestamp(raw).unwrap();
            assert_eq!(normalize_timestamp(&once).unwrap(), once);
        }
    }

    #[test]
    fn test_garbage_is_rejected() {
        for raw in [
            "",
            "yesterday",
            "2023-13-01T00:00:00",
            "abc123",
            "2023-01-01X10:00:00",
            "2023-01-01T10:00:00+1",
            "2023-01-01T25",
        ] {
            assert!(matches!(
                normalize_timestamp(raw),
                Err(HistoryError::InvalidTimestamp { .. })
            ));
        }
    }

    #[test]
    fn test_default_cutoff_is_one_year_back() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        // 2024 is a leap year, so 365 days back lands on March 2nd.
        assert_eq!(default_cutoff(now), "2023-03-02T12:30:00");
    }
}

//! Partial ISO-8601 parsing and canonicalization for date literals.
//!
//! Two facets of the same calendar arithmetic live here: the
//! [`IsoPartialFormatter`] used when building date filters (it completes
//! partial date/time strings into full UTC-denoted timestamps), and
//! [`epoch_millis`] used when encoding date literals into the index (it
//! turns a full lexical date/dateTime into a zone-adjusted millisecond
//! instant).

use crate::error::{Error, Result};

/// Completes partial ISO-8601 date/time strings into canonical
/// `yyyy-MM-ddTHH:mm:ssZ` form.
///
/// The accepted grammar is layered: a mandatory `yyyy-MM-dd`, optionally
/// followed by `T` and an hour, which may be followed by `:mm`, which may be
/// followed by `:ss`. Missing trailing components default to zero. The
/// result reformats the parsed components verbatim with a trailing `Z`; no
/// timezone conversion takes place.
///
/// The formatter holds no shared state, so each caller can own its instance
/// and use it concurrently with others.
#[derive(Debug, Clone, Default)]
pub struct IsoPartialFormatter;

impl IsoPartialFormatter {
    /// Creates a new formatter.
    pub fn new() -> Self {
        IsoPartialFormatter
    }

    /// Normalizes a partial date/time string into full-precision UTC form.
    ///
    /// Input already carrying the `Z` marker is returned unchanged without
    /// reparsing.
    pub fn normalize(&self, value: &str) -> Result<String> {
        if value.ends_with('Z') {
            return Ok(value.to_string());
        }

        let parts =
            parse_partial(value).ok_or_else(|| Error::InvalidDateValue(value.to_string()))?;
        Ok(format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            parts.year, parts.month, parts.day, parts.hour, parts.minute, parts.second
        ))
    }
}

/// Parses a full lexical `xsd:date` or `xsd:dateTime` value into a
/// zone-adjusted epoch-millisecond instant.
///
/// The calendar components are taken as-if UTC: a trailing offset (`Z` or
/// `±HH:mm`) is accepted and validated but deliberately not applied, so the
/// stored instant reflects the literal's wall-clock reading. Optional
/// fractional seconds contribute their millisecond part.
pub fn epoch_millis(value: &str) -> Result<i64> {
    parse_instant(value).ok_or_else(|| Error::InvalidDateValue(value.to_string()))
}

struct DateTimeParts {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
}

fn parse_partial(text: &str) -> Option<DateTimeParts> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    let mut parts = parse_date(bytes, &mut pos)?;

    if pos < bytes.len() {
        if bytes[pos] != b'T' {
            return None;
        }
        pos += 1;
        parts.hour = take_number(bytes, &mut pos, 2).filter(|h| *h <= 23)?;

        if pos < bytes.len() {
            if bytes[pos] != b':' {
                return None;
            }
            pos += 1;
            parts.minute = take_number(bytes, &mut pos, 2).filter(|m| *m <= 59)?;

            if pos < bytes.len() {
                if bytes[pos] != b':' {
                    return None;
                }
                pos += 1;
                parts.second = take_number(bytes, &mut pos, 2).filter(|s| *s <= 59)?;
            }
        }
    }

    (pos == bytes.len()).then_some(parts)
}

fn parse_instant(text: &str) -> Option<i64> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    let mut parts = parse_date(bytes, &mut pos)?;
    let mut millis: i64 = 0;

    if pos < bytes.len() && bytes[pos] == b'T' {
        pos += 1;
        parts.hour = take_number(bytes, &mut pos, 2).filter(|h| *h <= 23)?;
        expect(bytes, &mut pos, b':')?;
        parts.minute = take_number(bytes, &mut pos, 2).filter(|m| *m <= 59)?;
        expect(bytes, &mut pos, b':')?;
        parts.second = take_number(bytes, &mut pos, 2).filter(|s| *s <= 59)?;

        if pos < bytes.len() && bytes[pos] == b'.' {
            pos += 1;
            let start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            if pos == start {
                return None;
            }
            let mut fraction = [0u32; 3];
            for (i, slot) in fraction.iter_mut().enumerate() {
                *slot = bytes
                    .get(start + i)
                    .filter(|b| b.is_ascii_digit())
                    .map_or(0, |b| u32::from(b - b'0'));
            }
            millis = i64::from(fraction[0] * 100 + fraction[1] * 10 + fraction[2]);
        }
    }

    // An offset only marks the literal's zone; the stored instant keeps the
    // wall-clock components.
    if pos < bytes.len() {
        match bytes[pos] {
            b'Z' => pos += 1,
            b'+' | b'-' => {
                pos += 1;
                take_number(bytes, &mut pos, 2).filter(|h| *h <= 23)?;
                expect(bytes, &mut pos, b':')?;
                take_number(bytes, &mut pos, 2).filter(|m| *m <= 59)?;
            }
            _ => return None,
        }
    }

    if pos != bytes.len() {
        return None;
    }

    let days = days_from_civil(i64::from(parts.year), parts.month, parts.day);
    let seconds = i64::from(parts.hour * 3600 + parts.minute * 60 + parts.second);
    Some(days * 86_400_000 + seconds * 1000 + millis)
}

fn parse_date(bytes: &[u8], pos: &mut usize) -> Option<DateTimeParts> {
    let year = take_number(bytes, pos, 4)? as i32;
    expect(bytes, pos, b'-')?;
    let month = take_number(bytes, pos, 2).filter(|m| (1..=12).contains(m))?;
    expect(bytes, pos, b'-')?;
    let day = take_number(bytes, pos, 2).filter(|d| (1..=days_in_month(year, month)).contains(d))?;
    Some(DateTimeParts { year, month, day, hour: 0, minute: 0, second: 0 })
}

fn take_number(bytes: &[u8], pos: &mut usize, digits: usize) -> Option<u32> {
    let end = pos.checked_add(digits)?;
    let slice = bytes.get(*pos..end)?;
    let mut value = 0u32;
    for byte in slice {
        if !byte.is_ascii_digit() {
            return None;
        }
        value = value * 10 + u32::from(byte - b'0');
    }
    *pos = end;
    Some(value)
}

fn expect(bytes: &[u8], pos: &mut usize, wanted: u8) -> Option<()> {
    if bytes.get(*pos) == Some(&wanted) {
        *pos += 1;
        Some(())
    } else {
        None
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Days since 1970-01-01 in the proleptic Gregorian calendar.
fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = if year >= 0 { year } else { year - 399 } / 400;
    let year_of_era = year - era * 400;
    let shifted_month = if month > 2 { month - 3 } else { month + 9 };
    let day_of_year = i64::from((153 * shifted_month + 2) / 5 + day - 1);
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_date_only() {
        let formatter = IsoPartialFormatter::new();
        assert_eq!(formatter.normalize("2020-01-01").unwrap(), "2020-01-01T00:00:00Z");
    }

    #[test]
    fn test_normalize_date_and_hour() {
        let formatter = IsoPartialFormatter::new();
        assert_eq!(formatter.normalize("2020-01-01T10").unwrap(), "2020-01-01T10:00:00Z");
    }

    #[test]
    fn test_normalize_date_hour_minute() {
        let formatter = IsoPartialFormatter::new();
        assert_eq!(formatter.normalize("2020-01-01T10:30").unwrap(), "2020-01-01T10:30:00Z");
    }

    #[test]
    fn test_normalize_full_timestamp() {
        let formatter = IsoPartialFormatter::new();
        assert_eq!(formatter.normalize("2020-01-01T10:30:45").unwrap(), "2020-01-01T10:30:45Z");
    }

    #[test]
    fn test_normalize_canonical_input_passes_through() {
        let formatter = IsoPartialFormatter::new();
        assert_eq!(formatter.normalize("2020-01-01T10:30:45Z").unwrap(), "2020-01-01T10:30:45Z");
    }

    #[test]
    fn test_normalize_rejects_malformed_input() {
        let formatter = IsoPartialFormatter::new();
        for bad in [
            "not-a-date",
            "2020",
            "2020-13-01",
            "2020-01-32",
            "2020-01-01T24",
            "2020-01-01T10:61",
            "2020-01-01T10:30:99",
            "2020-01-01X10",
            "2020-01-01T10:30:45 trailing",
        ] {
            let err = formatter.normalize(bad).unwrap_err();
            assert!(matches!(err, Error::InvalidDateValue(_)), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_normalize_validates_leap_years() {
        let formatter = IsoPartialFormatter::new();
        assert_eq!(formatter.normalize("2020-02-29").unwrap(), "2020-02-29T00:00:00Z");
        assert!(formatter.normalize("2021-02-29").is_err());
        assert!(formatter.normalize("1900-02-29").is_err());
        assert_eq!(formatter.normalize("2000-02-29").unwrap(), "2000-02-29T00:00:00Z");
    }

    #[test]
    fn test_epoch_millis_at_the_epoch() {
        assert_eq!(epoch_millis("1970-01-01T00:00:00Z").unwrap(), 0);
        assert_eq!(epoch_millis("1970-01-01").unwrap(), 0);
        assert_eq!(epoch_millis("1970-01-02").unwrap(), 86_400_000);
    }

    #[test]
    fn test_epoch_millis_keeps_wall_clock_components() {
        // The offset denotes the zone but the stored instant keeps the
        // literal's calendar reading.
        assert_eq!(
            epoch_millis("1970-01-01T01:00:00+05:00").unwrap(),
            epoch_millis("1970-01-01T01:00:00Z").unwrap()
        );
    }

    #[test]
    fn test_epoch_millis_fractional_seconds() {
        assert_eq!(epoch_millis("1970-01-01T00:00:00.250Z").unwrap(), 250);
        assert_eq!(epoch_millis("1970-01-01T00:00:00.5").unwrap(), 500);
    }

    #[test]
    fn test_epoch_millis_known_instant() {
        // 2020-01-01T00:00:00Z
        assert_eq!(epoch_millis("2020-01-01").unwrap(), 1_577_836_800_000);
    }

    #[test]
    fn test_epoch_millis_rejects_partial_time() {
        assert!(epoch_millis("2020-01-01T10").is_err());
        assert!(epoch_millis("2020-01-01T10:30").is_err());
        assert!(epoch_millis("not-a-date").is_err());
    }
}

//! Partial-date coercion
//!
//! Cantons deliver date fields at whatever precision they track: `2022`,
//! `2022-05` or `2022-05-17`. Missing segments default to the first month
//! or day; the time of day is always midnight. An empty value stays null
//! and must never be zero-dated.

use crate::domain::{HarvestError, Result};
use chrono::{NaiveDate, NaiveDateTime};

/// Parses a hyphen-separated partial ISO date (`yyyy`, `yyyy-MM` or
/// `yyyy-MM-dd`) into a datetime at midnight.
///
/// Returns `Ok(None)` for an empty input. A non-empty value that is not a
/// partial date is an error; it aborts the layer transform.
pub fn parse_partial_date(raw: &str) -> Result<Option<NaiveDateTime>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let mut segments = raw.split('-');
    let year = parse_segment(segments.next(), raw)?;
    let month = segments.next().map(|s| parse_segment(Some(s), raw)).transpose()?;
    let day = segments.next().map(|s| parse_segment(Some(s), raw)).transpose()?;

    if segments.next().is_some() {
        return Err(invalid(raw));
    }

    let date = NaiveDate::from_ymd_opt(
        i32::try_from(year).map_err(|_| invalid(raw))?,
        month.unwrap_or(1),
        day.unwrap_or(1),
    )
    .ok_or_else(|| invalid(raw))?;

    Ok(Some(date.and_hms_opt(0, 0, 0).expect("midnight is valid")))
}

fn parse_segment(segment: Option<&str>, raw: &str) -> Result<u32> {
    segment
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| invalid(raw))
}

fn invalid(raw: &str) -> HarvestError {
    HarvestError::Transform(format!("Invalid partial date: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("2022", 2022, 1, 1; "year only defaults month and day")]
    #[test_case("2022-05", 2022, 5, 1; "year and month defaults day")]
    #[test_case("2022-05-17", 2022, 5, 17; "full date")]
    fn test_parse_partial_date(raw: &str, year: i32, month: u32, day: u32) {
        let parsed = parse_partial_date(raw).unwrap().unwrap();
        let expected = NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_empty_input_stays_null() {
        assert_eq!(parse_partial_date("").unwrap(), None);
        assert_eq!(parse_partial_date("   ").unwrap(), None);
    }

    #[test_case("abc"; "not a date")]
    #[test_case("2022-13"; "month out of range")]
    #[test_case("2022-02-30"; "day out of range")]
    #[test_case("2022-05-17-01"; "too many segments")]
    fn test_malformed_input_is_an_error(raw: &str) {
        assert!(parse_partial_date(raw).is_err());
    }
}

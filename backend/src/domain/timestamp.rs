//! Sheet timestamps in Indian Standard Time.
//!
//! Timestamps are written as civil time at a fixed UTC+05:30 offset, e.g.
//! `2025-03-01T14:05:09.120+05:30`. Reading is lenient: any RFC 3339 value
//! is accepted, and offset-less values are taken to be IST.

use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Utc};

const IST_OFFSET_MINUTES: i64 = 5 * 60 + 30;
const IST_SUFFIX: &str = "+05:30";
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn ist_offset() -> TimeDelta {
    TimeDelta::minutes(IST_OFFSET_MINUTES)
}

/// Render `instant` in the sheet's IST timestamp format.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use invigilation::domain::format_ist;
///
/// let instant = Utc.with_ymd_and_hms(2025, 3, 1, 8, 35, 9).single().expect("valid");
/// assert_eq!(format_ist(instant), "2025-03-01T14:05:09.000+05:30");
/// ```
#[must_use]
pub fn format_ist(instant: DateTime<Utc>) -> String {
    let civil = instant.naive_utc() + ist_offset();
    format!("{}{IST_SUFFIX}", civil.format("%Y-%m-%dT%H:%M:%S%.3f"))
}

/// Parse a stored timestamp cell. Blank or unrecognised cells yield `None`.
#[must_use]
pub fn parse_sheet_timestamp(cell: &str) -> Option<DateTime<Utc>> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|civil| Utc.from_utc_datetime(&(civil - ist_offset())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
            .single()
            .expect("valid instant")
    }

    #[rstest]
    fn formats_with_fixed_offset_across_midnight() {
        assert_eq!(
            format_ist(utc(2024, 12, 31, 20, 0, 0)),
            "2025-01-01T01:30:00.000+05:30"
        );
    }

    #[rstest]
    fn written_values_parse_back_to_the_same_instant() {
        let instant = utc(2025, 6, 15, 3, 4, 5);
        assert_eq!(parse_sheet_timestamp(&format_ist(instant)), Some(instant));
    }

    #[rstest]
    #[case("2025-06-15T03:04:05Z")]
    #[case("2025-06-15T03:04:05.000Z")]
    #[case("2025-06-15T08:34:05+05:30")]
    #[case("2025-06-15T08:34:05")]
    #[case("2025-06-15 08:34:05")]
    fn accepts_common_spellings(#[case] cell: &str) {
        assert_eq!(parse_sheet_timestamp(cell), Some(utc(2025, 6, 15, 3, 4, 5)));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("yesterday")]
    #[case("15/06/2025")]
    fn unrecognised_cells_are_absent(#[case] cell: &str) {
        assert_eq!(parse_sheet_timestamp(cell), None);
    }
}

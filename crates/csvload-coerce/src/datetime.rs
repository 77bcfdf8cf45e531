//! Date and time-of-day parsing.
//!
//! Dates are tried against [`EXACT_DATE_FORMATS`] in order, each requiring
//! the exact digit layout of its pattern, before the day-first free-form
//! fallback. Running the exact list first keeps `01/02/2024` as 1 February.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// An exact date format: display pattern, chrono pattern and digit layout.
#[derive(Debug, Clone, Copy)]
pub struct ExactFormat {
    pub pattern: &'static str,
    chrono: &'static str,
    /// `0` marks a required ASCII digit; other characters must match literally.
    shape: &'static str,
    has_time: bool,
}

/// Exact formats in priority order. The first one that matches wins.
pub static EXACT_DATE_FORMATS: [ExactFormat; 6] = [
    ExactFormat {
        pattern: "dd/MM/yyyy",
        chrono: "%d/%m/%Y",
        shape: "00/00/0000",
        has_time: false,
    },
    ExactFormat {
        pattern: "dd-MM-yyyy",
        chrono: "%d-%m-%Y",
        shape: "00-00-0000",
        has_time: false,
    },
    ExactFormat {
        pattern: "yyyy-MM-dd",
        chrono: "%Y-%m-%d",
        shape: "0000-00-00",
        has_time: false,
    },
    ExactFormat {
        pattern: "yyyy/MM/dd",
        chrono: "%Y/%m/%d",
        shape: "0000/00/00",
        has_time: false,
    },
    ExactFormat {
        pattern: "dd/MM/yyyy HH:mm:ss",
        chrono: "%d/%m/%Y %H:%M:%S",
        shape: "00/00/0000 00:00:00",
        has_time: true,
    },
    ExactFormat {
        pattern: "yyyy-MM-dd HH:mm:ss",
        chrono: "%Y-%m-%d %H:%M:%S",
        shape: "0000-00-00 00:00:00",
        has_time: true,
    },
];

// Two-digit years come before four-digit ones: `%Y` would read `24` as year 24.
const FALLBACK_DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%y %H:%M",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %I:%M:%S %p",
    "%d/%m/%Y %I:%M %p",
    "%d-%m-%y %H:%M:%S%.f",
    "%d-%m-%Y %H:%M:%S%.f",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S%.f",
    "%d.%m.%Y %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

const FALLBACK_DATE_FORMATS: &[&str] = &[
    "%d/%m/%y",
    "%d/%m/%Y",
    "%d-%m-%y",
    "%d-%m-%Y",
    "%d.%m.%y",
    "%d.%m.%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d %b %Y",
    "%d-%b-%Y",
    "%d %B %Y",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

/// Parses a date or date-time; date-only values get midnight.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    parse_exact(value).or_else(|| parse_free_form(value))
}

/// Tries only the exact formats. Returns the matched format with the value.
pub fn parse_exact_with_format(value: &str) -> Option<(NaiveDateTime, &'static ExactFormat)> {
    EXACT_DATE_FORMATS.iter().find_map(|format| {
        if !matches_shape(value, format.shape) {
            return None;
        }
        let parsed = if format.has_time {
            NaiveDateTime::parse_from_str(value, format.chrono).ok()
        } else {
            NaiveDate::parse_from_str(value, format.chrono)
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        };
        parsed.map(|parsed| (parsed, format))
    })
}

fn parse_exact(value: &str) -> Option<NaiveDateTime> {
    parse_exact_with_format(value).map(|(parsed, _)| parsed)
}

/// Day-first free-form parse used when no exact format matches.
fn parse_free_form(value: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_local());
    }
    FALLBACK_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            FALLBACK_DATE_FORMATS.iter().find_map(|format| {
                NaiveDate::parse_from_str(value, format)
                    .ok()
                    .map(|date| date.and_time(NaiveTime::MIN))
            })
        })
}

/// Parses a culture-invariant time of day (`HH:mm`, `HH:mm:ss[.fffffff]`).
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let value = raw.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
}

fn matches_shape(value: &str, shape: &str) -> bool {
    value.len() == shape.len()
        && value.bytes().zip(shape.bytes()).all(|(actual, expected)| {
            if expected == b'0' {
                actual.is_ascii_digit()
            } else {
                actual == expected
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    fn ymd_hms(year: i32, month: u32, day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn exact_formats_in_order() {
        let cases = [
            ("01/02/2024", "dd/MM/yyyy"),
            ("01-02-2024", "dd-MM-yyyy"),
            ("2024-02-01", "yyyy-MM-dd"),
            ("2024/02/01", "yyyy/MM/dd"),
        ];
        for (raw, pattern) in cases {
            let (parsed, format) = parse_exact_with_format(raw).unwrap();
            assert_eq!(parsed, ymd(2024, 2, 1), "{raw}");
            assert_eq!(format.pattern, pattern);
        }
        let (parsed, format) = parse_exact_with_format("01/02/2024 13:45:10").unwrap();
        assert_eq!(parsed, ymd_hms(2024, 2, 1, 13, 45, 10));
        assert_eq!(format.pattern, "dd/MM/yyyy HH:mm:ss");
        let (_, format) = parse_exact_with_format("2024-02-01 13:45:10").unwrap();
        assert_eq!(format.pattern, "yyyy-MM-dd HH:mm:ss");
    }

    #[test]
    fn exact_formats_require_full_digit_layout() {
        assert!(parse_exact_with_format("1/2/2024").is_none());
        assert!(parse_exact_with_format("01/02/24").is_none());
        assert!(parse_exact_with_format("31/02/2024").is_none());
    }

    #[test]
    fn free_form_is_day_first() {
        assert_eq!(parse_date("1/2/2024"), Some(ymd(2024, 2, 1)));
        assert_eq!(parse_date("01/02/24"), Some(ymd(2024, 2, 1)));
        assert_eq!(parse_date("1.2.2024"), Some(ymd(2024, 2, 1)));
        assert_eq!(parse_date("5/3/2024 7:30"), Some(ymd_hms(2024, 3, 5, 7, 30, 0)));
        assert_eq!(parse_date("15 Jan 2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(
            parse_date("2024-02-01T08:15:00"),
            Some(ymd_hms(2024, 2, 1, 8, 15, 0))
        );
        assert_eq!(
            parse_date("2024-02-01T08:15:00+02:00"),
            Some(ymd_hms(2024, 2, 1, 8, 15, 0))
        );
    }

    #[test]
    fn invalid_dates() {
        assert_eq!(parse_date("13/13/2024"), None);
        assert_eq!(parse_date("tomorrow"), None);
        assert_eq!(parse_date("2024-02-30"), None);
    }

    #[test]
    fn times() {
        assert_eq!(parse_time("08:30"), NaiveTime::from_hms_opt(8, 30, 0));
        assert_eq!(parse_time("23:59:59"), NaiveTime::from_hms_opt(23, 59, 59));
        assert_eq!(
            parse_time("10:00:00.1234567"),
            NaiveTime::from_hms_nano_opt(10, 0, 0, 123_456_700)
        );
        assert_eq!(parse_time("24:00"), None);
        assert_eq!(parse_time("noon"), None);
    }
}

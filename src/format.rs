// src/format.rs
//! Small pure helpers shared by the normalizer and the report.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// A count that renders without a trailing `.0` when it is integral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn is_zero(&self) -> bool {
        match *self {
            Number::Int(i) => i == 0,
            Number::Float(f) => f == 0.0,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Converts a float to an integer if nothing would be lost.
pub fn optimistic_float_to_int(value: f64) -> Number {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Number::Int(value as i64)
    } else {
        Number::Float(value)
    }
}

/// `425000` -> `"$425,000"`. Fractions are rounded to whole dollars.
pub fn format_price(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Parses provider timestamps: RFC 3339 (`...Z` or with offset), naive
/// ISO-8601 date-time (taken as UTC) and plain `YYYY-MM-DD` (midnight UTC).
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let s = value.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = s.strip_suffix('Z').unwrap_or(s);
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Some(ndt.and_utc());
        }
    }

    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn collapses_only_whole_values() {
        assert_eq!(optimistic_float_to_int(2.0), Number::Int(2));
        assert_eq!(optimistic_float_to_int(2.5), Number::Float(2.5));
        assert_eq!(optimistic_float_to_int(0.0).to_string(), "0");
        assert_eq!(optimistic_float_to_int(3.5).to_string(), "3.5");
        assert!(matches!(optimistic_float_to_int(f64::NAN), Number::Float(_)));
    }

    #[test]
    fn price_groups_thousands() {
        assert_eq!(format_price(425_000.0), "$425,000");
        assert_eq!(format_price(0.0), "$0");
        assert_eq!(format_price(999.0), "$999");
        assert_eq!(format_price(1_000.0), "$1,000");
        assert_eq!(format_price(12_345_678.0), "$12,345,678");
        assert_eq!(format_price(199_999.6), "$200,000");
    }

    #[test]
    fn parses_zulu_and_plain_forms() {
        let z = parse_datetime("2024-05-01T12:30:00Z").unwrap();
        assert_eq!(z, Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());

        let frac = parse_datetime("2024-05-01T12:30:00.000000Z").unwrap();
        assert_eq!(frac, z);

        let naive = parse_datetime("2024-05-01T12:30:00").unwrap();
        assert_eq!(naive, z);

        let offset = parse_datetime("2024-05-01T14:30:00+02:00").unwrap();
        assert_eq!(offset, z);

        let date = parse_datetime("2024-05-01").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_datetime("").is_none());
        assert!(parse_datetime("yesterday").is_none());
        assert!(parse_datetime("2024-13-01").is_none());
    }
}

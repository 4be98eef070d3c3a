//! Date and coordinate parsing for frog census attributes.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use frog_map_sighting_models::{RawCoordinate, RawDate, SightingDate};

/// Date-time layouts tried in order for text dates.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Date-only layouts. Slash dates are day-first (Australian publisher).
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

/// Parses a census date attribute.
///
/// Never fails: absent or blank input gives [`SightingDate::Unknown`] and
/// unrecognised text is kept as [`SightingDate::Raw`].
#[must_use]
pub fn parse_sighting_date(raw: Option<&RawDate>) -> SightingDate {
    match raw {
        None => SightingDate::Unknown,
        Some(RawDate::EpochMillis(ms)) => DateTime::from_timestamp_millis(*ms)
            .map_or_else(|| SightingDate::Raw(ms.to_string()), SightingDate::Parsed),
        Some(RawDate::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return SightingDate::Unknown;
            }
            parse_date_text(text).map_or_else(
                || SightingDate::Raw(text.to_string()),
                SightingDate::Parsed,
            )
        }
    }
}

/// Parses a text date in any of the recognised layouts.
#[must_use]
pub fn parse_date_text(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}

/// Parses a single coordinate value. Returns `None` if missing,
/// unparseable or not finite.
#[must_use]
pub fn parse_coordinate(raw: Option<&RawCoordinate>) -> Option<f64> {
    let value = match raw? {
        RawCoordinate::Number(n) => *n,
        RawCoordinate::Text(s) => s.trim().parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

/// Parses a lat/lng pair. Returns `None` if either side is missing, out of
/// WGS84 range, or zero.
#[must_use]
pub fn parse_lat_lng(
    lat: Option<&RawCoordinate>,
    lng: Option<&RawCoordinate>,
) -> Option<(f64, f64)> {
    let latitude = parse_coordinate(lat)?;
    let longitude = parse_coordinate(lng)?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return None;
    }
    if latitude == 0.0 || longitude == 0.0 {
        return None;
    }
    Some((latitude, longitude))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn parses_iso_date() {
        let date = parse_sighting_date(Some(&RawDate::Text("2020-01-01".into())));
        assert_eq!(date, SightingDate::Parsed(ymd(2020, 1, 1)));
    }

    #[test]
    fn parses_day_first_slash_date() {
        let date = parse_sighting_date(Some(&RawDate::Text("25/12/2019".into())));
        assert_eq!(date, SightingDate::Parsed(ymd(2019, 12, 25)));
    }

    #[test]
    fn parses_epoch_millis() {
        let date = parse_sighting_date(Some(&RawDate::EpochMillis(1_577_836_800_000)));
        assert_eq!(date, SightingDate::Parsed(ymd(2020, 1, 1)));
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let dt = parse_date_text("2020-01-01T10:00:00+10:00").unwrap();
        assert_eq!(dt, ymd(2020, 1, 1));
    }

    #[test]
    fn blank_or_missing_date_is_unknown() {
        assert_eq!(parse_sighting_date(None), SightingDate::Unknown);
        assert_eq!(
            parse_sighting_date(Some(&RawDate::Text("   ".into()))),
            SightingDate::Unknown
        );
    }

    #[test]
    fn garbage_date_is_kept_raw() {
        let date = parse_sighting_date(Some(&RawDate::Text("last spring".into())));
        assert_eq!(date, SightingDate::Raw("last spring".to_string()));
    }

    #[test]
    fn parses_numeric_and_text_coordinates() {
        let lat = RawCoordinate::Number(-37.81);
        let lng = RawCoordinate::Text(" 144.96 ".into());
        let (la, lo) = parse_lat_lng(Some(&lat), Some(&lng)).unwrap();
        assert!((la - -37.81).abs() < f64::EPSILON);
        assert!((lo - 144.96).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_missing_zero_and_out_of_range() {
        let lng = RawCoordinate::Number(144.96);
        assert!(parse_lat_lng(None, Some(&lng)).is_none());
        assert!(parse_lat_lng(Some(&RawCoordinate::Number(0.0)), Some(&lng)).is_none());
        assert!(parse_lat_lng(Some(&RawCoordinate::Number(-137.0)), Some(&lng)).is_none());
        assert!(parse_lat_lng(Some(&RawCoordinate::Text("n/a".into())), Some(&lng)).is_none());
    }
}

//! Reduction of raw census features into sighting records.

use frog_map_sighting_models::{RawFeature, SightingRecord, UNKNOWN_NAME};

use crate::parsing::{parse_lat_lng, parse_sighting_date};

/// Reduces one raw feature.
///
/// Coordinates are cleared (both sides) when the pair is not a usable
/// WGS84 position, so the record stays in the sequence but is not
/// plottable.
#[must_use]
pub fn to_sighting(raw: &RawFeature) -> SightingRecord {
    let common_name = raw
        .common_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_NAME)
        .to_string();

    let position = parse_lat_lng(raw.latitude.as_ref(), raw.longitude.as_ref());

    SightingRecord {
        common_name,
        date: parse_sighting_date(raw.date.as_ref()),
        latitude: position.map(|(lat, _)| lat),
        longitude: position.map(|(_, lng)| lng),
    }
}

/// Reduces every feature, preserving length and order.
#[must_use]
pub fn transform_features(raw: &[RawFeature]) -> Vec<SightingRecord> {
    let records: Vec<SightingRecord> = raw.iter().map(to_sighting).collect();

    let unplottable = records.iter().filter(|r| !r.is_plottable()).count();
    if unplottable > 0 {
        log::warn!(
            "{unplottable} of {} sightings have no usable coordinates",
            records.len()
        );
    }

    records
}

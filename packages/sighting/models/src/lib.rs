#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Frog census record types.
//!
//! [`RawFeature`] is the typed view of one `ArcGIS` feature's `attributes`
//! object as returned by the Melbourne Water frog census service.
//! [`SightingRecord`] is the reduced record every downstream layer is built
//! from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label used when a feature carries no common name.
pub const UNKNOWN_NAME: &str = "Unknown frog";

/// Top-level body of an `ArcGIS` feature query (`f=json`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureQueryResponse {
    /// Features in service order.
    pub features: Vec<QueryFeature>,
    /// Set by `ArcGIS` when more records exist past this page.
    #[serde(default)]
    pub exceeded_transfer_limit: bool,
}

/// A single feature in a query response. Geometry is ignored; the census
/// layer carries its location as `Latitude`/`Longitude` attributes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueryFeature {
    /// The feature's attribute table row.
    pub attributes: RawFeature,
}

/// Attributes of one frog census feature.
///
/// Every field is optional at the wire level. A field that is present but
/// of the wrong JSON type fails deserialization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawFeature {
    /// Species common name (e.g. `"Southern Brown Tree Frog"`).
    #[serde(rename = "Common_name", default)]
    pub common_name: Option<String>,
    /// Observation date.
    #[serde(rename = "Date", default)]
    pub date: Option<RawDate>,
    /// Latitude in decimal degrees (WGS84).
    #[serde(rename = "Latitude", default)]
    pub latitude: Option<RawCoordinate>,
    /// Longitude in decimal degrees (WGS84).
    #[serde(rename = "Longitude", default)]
    pub longitude: Option<RawCoordinate>,
}

/// A date attribute as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    /// `ArcGIS` `esriFieldTypeDate` values: milliseconds since the Unix epoch.
    EpochMillis(i64),
    /// Free text in whatever format the publisher used.
    Text(String),
}

/// A coordinate attribute. Some exports store numbers as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCoordinate {
    /// Numeric value.
    Number(f64),
    /// Textual value, parsed downstream.
    Text(String),
}

/// Observation date of a sighting after parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum SightingDate {
    /// Successfully parsed timestamp.
    Parsed(DateTime<Utc>),
    /// Present but in no recognised format; kept verbatim.
    Raw(String),
    /// Absent or blank.
    Unknown,
}

impl SightingDate {
    /// Returns the parsed timestamp, if any.
    #[must_use]
    pub const fn parsed(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Parsed(dt) => Some(dt),
            Self::Raw(_) | Self::Unknown => None,
        }
    }
}

impl std::fmt::Display for SightingDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parsed(dt) => write!(f, "{}", dt.format("%Y-%m-%d")),
            Self::Raw(text) => f.write_str(text),
            Self::Unknown => f.write_str("Unknown date"),
        }
    }
}

/// A frog sighting reduced to what the map needs.
///
/// Coordinates are `None` when the source value was missing or unusable;
/// such records are kept (the sequence stays aligned with the source) but
/// are not plottable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SightingRecord {
    /// Species common name, or [`UNKNOWN_NAME`].
    pub common_name: String,
    /// Observation date.
    pub date: SightingDate,
    /// Latitude (WGS84).
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    pub longitude: Option<f64>,
}

impl SightingRecord {
    /// Returns `(latitude, longitude)` when both are present and finite.
    #[must_use]
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some((lat, lng)),
            _ => None,
        }
    }

    /// Whether this record can be placed on the map.
    #[must_use]
    pub fn is_plottable(&self) -> bool {
        self.position().is_some()
    }
}

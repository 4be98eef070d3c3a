#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map view types shared by the presenter and the HTTP API.
//!
//! A [`MapView`] is a declarative description of the Leaflet map the host
//! page builds: base tile layers, overlays, viewport and layer control.
//! Field names serialize in camelCase so tile and style options can be
//! handed to Leaflet unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

impl LatLng {
    /// Creates a position.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Initial camera position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Map center.
    pub center: LatLng,
    /// Zoom level.
    pub zoom: u8,
}

/// Background tile styles. Exactly one is shown at a time.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BaseLayerKind {
    /// Street cartography.
    Street,
    /// Dark cartography.
    Dark,
}

impl BaseLayerKind {
    /// Name shown in the layer control.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Street => "Street Map",
            Self::Dark => "Dark Map",
        }
    }
}

/// Data overlays. Each is toggled independently.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OverlayKind {
    /// Clustered frog sighting markers.
    FrogSightings,
    /// Suburb boundary outlines.
    SuburbBoundaries,
    /// Wetland and lake asset polygons.
    WetlandAssets,
}

impl OverlayKind {
    /// Returns all overlay kinds in layer-control order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::FrogSightings, Self::SuburbBoundaries, Self::WetlandAssets]
    }

    /// Name shown in the layer control.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::FrogSightings => "Frog Sightings",
            Self::SuburbBoundaries => "Suburb Boundaries",
            Self::WetlandAssets => "Wetland and Lake Assets",
        }
    }
}

/// Leaflet `TileLayer` options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayerOptions {
    /// Attribution HTML.
    pub attribution: String,
    /// Rendered tile size in pixels.
    pub tile_size: u32,
    /// Maximum zoom level.
    pub max_zoom: u8,
    /// Offset applied to the zoom in tile URLs.
    pub zoom_offset: i8,
    /// Style id substituted for `{id}` in the URL template.
    pub id: String,
    /// Credential substituted for `{accessToken}`. Empty when unconfigured.
    pub access_token: String,
}

/// A background tile layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer {
    /// Which base style this is.
    pub kind: BaseLayerKind,
    /// Layer-control label.
    pub name: String,
    /// URL template with `{z}`, `{x}`, `{y}`, `{id}` and `{accessToken}`.
    pub url_template: String,
    /// Leaflet options.
    pub options: TileLayerOptions,
}

/// Leaflet `Path` style for vector overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStyle {
    /// Stroke colour (CSS).
    pub color: String,
    /// Stroke width in pixels.
    pub weight: f64,
    /// Fill opacity, 0 to 1.
    pub fill_opacity: f64,
}

/// A single point marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Marker position.
    pub position: LatLng,
    /// Plain-text popup label.
    pub label: String,
    /// Secondary popup line, if any.
    pub detail: Option<String>,
}

/// Leaflet.markercluster options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerClusterOptions {
    /// Outline a cluster's extent on hover.
    pub show_coverage_on_hover: bool,
    /// Zoom into a cluster's bounds when it is clicked.
    pub zoom_to_bounds_on_click: bool,
    /// Maximum cluster radius in pixels.
    pub max_cluster_radius: u32,
}

impl Default for MarkerClusterOptions {
    fn default() -> Self {
        Self {
            show_coverage_on_hover: true,
            zoom_to_bounds_on_click: true,
            max_cluster_radius: 80,
        }
    }
}

/// Markers grouped by a single clustering container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerClusterLayer {
    /// Clustering options.
    pub options: MarkerClusterOptions,
    /// Markers in source order.
    pub markers: Vec<Marker>,
}

/// What an overlay draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OverlayContent {
    /// Clustered point markers.
    MarkerCluster(MarkerClusterLayer),
    /// An opaque `GeoJSON` document drawn with one style.
    GeoJson {
        /// The document as loaded.
        data: serde_json::Value,
        /// Style applied to every feature.
        style: PathStyle,
    },
}

/// A toggleable data layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayLayer {
    /// Which overlay this is.
    pub kind: OverlayKind,
    /// Layer-control label.
    pub name: String,
    /// Whether the overlay is shown when first added.
    pub visible: bool,
    /// Layer content.
    pub content: OverlayContent,
}

/// Layer control options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerControlOptions {
    /// Whether the control starts collapsed.
    pub collapsed: bool,
}

/// The composed map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// Id of the host-page element the map mounts into.
    pub container: String,
    /// Initial camera.
    pub viewport: Viewport,
    /// Base tile layers in layer-control order.
    pub base_layers: Vec<TileLayer>,
    /// The base layer shown on load.
    pub active_base: BaseLayerKind,
    /// Overlays in attachment order.
    pub overlays: Vec<OverlayLayer>,
    /// Layer control options.
    pub layer_control: LayerControlOptions,
}

impl MapView {
    /// Returns the attached overlay of the given kind.
    #[must_use]
    pub fn overlay(&self, kind: OverlayKind) -> Option<&OverlayLayer> {
        self.overlays.iter().find(|o| o.kind == kind)
    }

    /// Returns the marker cluster layer, if attached.
    #[must_use]
    pub fn marker_layer(&self) -> Option<&MarkerClusterLayer> {
        match &self.overlay(OverlayKind::FrogSightings)?.content {
            OverlayContent::MarkerCluster(layer) => Some(layer),
            OverlayContent::GeoJson { .. } => None,
        }
    }
}

/// Load progress of one overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum LayerStatus {
    /// Load still in flight.
    Pending,
    /// Overlay is on the map.
    Attached,
    /// Load failed; the overlay will not appear.
    Failed {
        /// Error description.
        reason: String,
    },
}

/// Point-in-time view of the map and the load state of every overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSnapshot {
    /// The map as composed so far.
    pub map: MapView,
    /// Load status per overlay kind.
    pub layers: BTreeMap<OverlayKind, LayerStatus>,
}

impl MapSnapshot {
    /// Whether any overlay is still loading.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.layers.values().any(|s| *s == LayerStatus::Pending)
    }
}

//! Layer construction and map initialization.

use frog_map_config::{MapSettings, TileSettings, TileStyleSettings};
use frog_map_map_models::{
    BaseLayerKind, LatLng, LayerControlOptions, MapView, Marker, MarkerClusterLayer,
    MarkerClusterOptions, OverlayContent, OverlayKind, OverlayLayer, PathStyle, TileLayer,
    TileLayerOptions, Viewport,
};
use frog_map_sighting_models::SightingRecord;

/// Outline colour for suburb boundaries.
const SUBURB_COLOR: &str = "#00EE00";

/// Leaflet's default path colour, used for wetland polygons.
const WETLAND_COLOR: &str = "#3388ff";

/// Builds the map view and its layers from settings.
#[derive(Debug, Clone)]
pub struct Presenter {
    map: MapSettings,
    tiles: TileSettings,
}

impl Presenter {
    /// Creates a presenter.
    #[must_use]
    pub const fn new(map: MapSettings, tiles: TileSettings) -> Self {
        Self { map, tiles }
    }

    /// Creates the map: both base layers with the street style active, the
    /// configured viewport, an expanded layer control and no overlays yet.
    ///
    /// A missing tile token is logged and the layers are built with an
    /// empty one; tiles then fail to load but the map still works.
    #[must_use]
    pub fn initialize(&self) -> MapView {
        log::info!("Creating map");
        MapView {
            container: self.map.container.clone(),
            viewport: Viewport {
                center: LatLng::new(self.map.center_lat, self.map.center_lng),
                zoom: self.map.zoom,
            },
            base_layers: self.base_layers(),
            active_base: BaseLayerKind::Street,
            overlays: Vec::new(),
            layer_control: LayerControlOptions { collapsed: false },
        }
    }

    /// Builds the street and dark tile layers.
    #[must_use]
    pub fn base_layers(&self) -> Vec<TileLayer> {
        let access_token = match self.tiles.access_token() {
            Ok(token) => token.to_string(),
            Err(e) => {
                log::warn!("{e}; base map tiles will not load");
                String::new()
            }
        };

        vec![
            tile_layer(BaseLayerKind::Street, &self.tiles.street, &access_token),
            tile_layer(BaseLayerKind::Dark, &self.tiles.dark, &access_token),
        ]
    }

    /// Builds the clustered marker overlay. Records without a usable
    /// position are left out.
    #[must_use]
    pub fn marker_overlay(&self, records: &[SightingRecord]) -> OverlayLayer {
        log::info!("Creating frog layer");
        let layer = build_marker_layer(
            records,
            MarkerClusterOptions {
                max_cluster_radius: self.map.max_cluster_radius,
                ..MarkerClusterOptions::default()
            },
        );

        let skipped = records.len() - layer.markers.len();
        if skipped > 0 {
            log::warn!("Skipped {skipped} sightings without a plottable position");
        }

        overlay(OverlayKind::FrogSightings, OverlayContent::MarkerCluster(layer))
    }

    /// Builds the suburb boundary overlay: thin green outlines, no fill.
    #[must_use]
    pub fn suburb_overlay(&self, data: serde_json::Value) -> OverlayLayer {
        overlay(
            OverlayKind::SuburbBoundaries,
            OverlayContent::GeoJson {
                data,
                style: PathStyle {
                    color: SUBURB_COLOR.to_string(),
                    weight: 0.5,
                    fill_opacity: 0.0,
                },
            },
        )
    }

    /// Builds the wetland and lake overlay: semi-transparent fill.
    #[must_use]
    pub fn wetland_overlay(&self, data: serde_json::Value) -> OverlayLayer {
        overlay(
            OverlayKind::WetlandAssets,
            OverlayContent::GeoJson {
                data,
                style: PathStyle {
                    color: WETLAND_COLOR.to_string(),
                    weight: 1.5,
                    fill_opacity: 0.2,
                },
            },
        )
    }
}

/// One marker per plottable record, in record order.
#[must_use]
pub fn build_marker_layer(
    records: &[SightingRecord],
    options: MarkerClusterOptions,
) -> MarkerClusterLayer {
    let markers = records
        .iter()
        .filter_map(|record| {
            let (lat, lng) = record.position()?;
            Some(Marker {
                position: LatLng::new(lat, lng),
                label: record.common_name.clone(),
                detail: record
                    .date
                    .parsed()
                    .map(|dt| format!("Sighted {}", dt.format("%-d %B %Y"))),
            })
        })
        .collect();

    MarkerClusterLayer { options, markers }
}

fn overlay(kind: OverlayKind, content: OverlayContent) -> OverlayLayer {
    OverlayLayer {
        kind,
        name: kind.display_name().to_string(),
        visible: true,
        content,
    }
}

fn tile_layer(kind: BaseLayerKind, style: &TileStyleSettings, access_token: &str) -> TileLayer {
    TileLayer {
        kind,
        name: kind.display_name().to_string(),
        url_template: style.url_template.clone(),
        options: TileLayerOptions {
            attribution: style.attribution.clone(),
            tile_size: style.tile_size,
            max_zoom: style.max_zoom,
            zoom_offset: style.zoom_offset,
            id: style.style_id.clone(),
            access_token: access_token.to_string(),
        },
    }
}

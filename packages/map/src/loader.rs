//! Concurrent loading of the three map layers.
//!
//! The census fetch and both `GeoJSON` reads are started together and
//! polled on the same task. Each one attaches its overlay as soon as it
//! resolves, and each handles its own failure: an error is logged and
//! recorded against that overlay only.

use frog_map_map_models::{OverlayKind, OverlayLayer};
use frog_map_source::transform::transform_features;
use frog_map_source::{FeatureSource, GeoJsonSource, SourceError};

use crate::MapHandle;
use crate::presenter::Presenter;

/// The three layer loads for one map.
///
/// [`MapLoader::run`] consumes the loader, so every source is read exactly
/// once.
pub struct MapLoader {
    presenter: Presenter,
    sightings: Box<dyn FeatureSource>,
    suburbs: Box<dyn GeoJsonSource>,
    wetlands: Box<dyn GeoJsonSource>,
}

impl MapLoader {
    /// Creates a loader.
    #[must_use]
    pub fn new(
        presenter: Presenter,
        sightings: Box<dyn FeatureSource>,
        suburbs: Box<dyn GeoJsonSource>,
        wetlands: Box<dyn GeoJsonSource>,
    ) -> Self {
        Self {
            presenter,
            sightings,
            suburbs,
            wetlands,
        }
    }

    /// Runs all loads to completion, attaching overlays to `map` in
    /// whatever order they finish.
    pub async fn run(self, map: &MapHandle) {
        let sightings = async {
            let result = self.sightings.fetch_features().await.map(|raw| {
                log::info!("{}: received {} features", self.sightings.label(), raw.len());
                let records = transform_features(&raw);
                self.presenter.marker_overlay(&records)
            });
            settle(map, OverlayKind::FrogSightings, self.sightings.label(), result).await;
        };

        let suburbs = async {
            let result = self
                .suburbs
                .load_geojson()
                .await
                .map(|data| self.presenter.suburb_overlay(data));
            settle(map, OverlayKind::SuburbBoundaries, self.suburbs.label(), result).await;
        };

        let wetlands = async {
            let result = self
                .wetlands
                .load_geojson()
                .await
                .map(|data| self.presenter.wetland_overlay(data));
            settle(map, OverlayKind::WetlandAssets, self.wetlands.label(), result).await;
        };

        tokio::join!(sightings, suburbs, wetlands);
        log::info!("All layer loads finished");
    }
}

async fn settle(
    map: &MapHandle,
    kind: OverlayKind,
    label: &str,
    result: Result<OverlayLayer, SourceError>,
) {
    match result {
        Ok(overlay) => {
            if let Err(e) = map.attach(overlay).await {
                log::error!("{label}: {e}");
            }
        }
        Err(e) => {
            log::error!("{label}: failed to load {}: {e}", kind.display_name());
            map.mark_failed(kind, e.to_string()).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use frog_map_config::{MapSettings, TileSettings};
    use frog_map_map_models::LayerStatus;
    use frog_map_sighting_models::{RawCoordinate, RawDate, RawFeature};

    use super::*;

    struct FakeFeatures {
        delay: Duration,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl FeatureSource for FakeFeatures {
        fn label(&self) -> &str {
            "fake census"
        }

        async fn fetch_features(&self) -> Result<Vec<RawFeature>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(SourceError::Status {
                    status: 503,
                    url: "http://census.test/query".to_string(),
                });
            }
            Ok(vec![RawFeature {
                common_name: Some("Litoria ewingii".to_string()),
                date: Some(RawDate::Text("2020-01-01".to_string())),
                latitude: Some(RawCoordinate::Number(-37.81)),
                longitude: Some(RawCoordinate::Number(144.96)),
            }])
        }
    }

    struct FakeGeoJson {
        delay: Duration,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl GeoJsonSource for FakeGeoJson {
        fn label(&self) -> &str {
            "fake geojson"
        }

        async fn load_geojson(&self) -> Result<serde_json::Value, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(SourceError::MalformedData {
                    message: "not a feature collection".to_string(),
                });
            }
            Ok(serde_json::json!({"type": "FeatureCollection", "features": []}))
        }
    }

    struct Setup {
        loader: MapLoader,
        map: MapHandle,
        calls: Arc<AtomicUsize>,
    }

    fn setup(
        (sightings_ms, sightings_fail): (u64, bool),
        (suburbs_ms, suburbs_fail): (u64, bool),
        (wetlands_ms, wetlands_fail): (u64, bool),
    ) -> Setup {
        let calls = Arc::new(AtomicUsize::new(0));
        let presenter = Presenter::new(MapSettings::default(), TileSettings::default());
        let map = MapHandle::new(presenter.initialize());
        let loader = MapLoader::new(
            presenter,
            Box::new(FakeFeatures {
                delay: Duration::from_millis(sightings_ms),
                fail: sightings_fail,
                calls: Arc::clone(&calls),
            }),
            Box::new(FakeGeoJson {
                delay: Duration::from_millis(suburbs_ms),
                fail: suburbs_fail,
                calls: Arc::clone(&calls),
            }),
            Box::new(FakeGeoJson {
                delay: Duration::from_millis(wetlands_ms),
                fail: wetlands_fail,
                calls: Arc::clone(&calls),
            }),
        );
        Setup { loader, map, calls }
    }

    #[tokio::test]
    async fn all_layers_attach_once_in_completion_order() {
        let Setup { loader, map, calls } = setup((30, false), (5, false), (15, false));
        loader.run(&map).await;

        let snapshot = map.snapshot().await;
        let kinds: Vec<OverlayKind> = snapshot.map.overlays.iter().map(|o| o.kind).collect();
        assert_eq!(
            kinds,
            vec![
                OverlayKind::SuburbBoundaries,
                OverlayKind::WetlandAssets,
                OverlayKind::FrogSightings,
            ]
        );
        assert!(!snapshot.is_loading());
        assert!(
            snapshot
                .layers
                .values()
                .all(|s| *s == LayerStatus::Attached)
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        let markers = snapshot.map.marker_layer().unwrap();
        assert_eq!(markers.markers.len(), 1);
        assert_eq!(markers.markers[0].label, "Litoria ewingii");
    }

    #[tokio::test]
    async fn census_failure_leaves_other_overlays() {
        let Setup { loader, map, .. } = setup((1, true), (10, false), (1, false));
        loader.run(&map).await;

        let snapshot = map.snapshot().await;
        assert!(snapshot.map.overlay(OverlayKind::FrogSightings).is_none());
        assert!(snapshot.map.overlay(OverlayKind::SuburbBoundaries).is_some());
        assert!(snapshot.map.overlay(OverlayKind::WetlandAssets).is_some());
        assert!(matches!(
            snapshot.layers[&OverlayKind::FrogSightings],
            LayerStatus::Failed { .. }
        ));
        assert_eq!(snapshot.map.base_layers.len(), 2);
    }

    #[tokio::test]
    async fn overlay_failure_leaves_markers() {
        let Setup { loader, map, .. } = setup((5, false), (1, true), (1, true));
        loader.run(&map).await;

        let snapshot = map.snapshot().await;
        assert_eq!(snapshot.map.overlays.len(), 1);
        assert!(snapshot.map.marker_layer().is_some());
        assert!(matches!(
            snapshot.layers[&OverlayKind::WetlandAssets],
            LayerStatus::Failed { .. }
        ));
    }
}

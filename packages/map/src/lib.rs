#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map composition for the frog map.
//!
//! The [`presenter::Presenter`] builds the base layers and each overlay.
//! The [`loader::MapLoader`] drives the three independent data loads and
//! attaches overlays to a shared [`MapHandle`] as each one resolves.

pub mod export;
pub mod loader;
pub mod presenter;

use std::collections::BTreeMap;
use std::sync::Arc;

use frog_map_map_models::{LayerStatus, MapSnapshot, MapView, OverlayKind, OverlayLayer};
use tokio::sync::RwLock;

/// Errors raised while composing the map.
#[derive(Debug, thiserror::Error)]
pub enum PresentError {
    /// An overlay of this kind is already on the map.
    #[error("Overlay {0} is already attached")]
    DuplicateOverlay(OverlayKind),
}

struct MapState {
    view: MapView,
    layers: BTreeMap<OverlayKind, LayerStatus>,
}

/// Shared handle to the initialized map.
///
/// Cloning is cheap. Overlays are only ever added; each kind at most once.
#[derive(Clone)]
pub struct MapHandle {
    state: Arc<RwLock<MapState>>,
}

impl MapHandle {
    /// Wraps an initialized view. Every overlay kind not already present
    /// starts out [`LayerStatus::Pending`].
    #[must_use]
    pub fn new(view: MapView) -> Self {
        let layers = OverlayKind::all()
            .iter()
            .map(|kind| {
                let status = if view.overlay(*kind).is_some() {
                    LayerStatus::Attached
                } else {
                    LayerStatus::Pending
                };
                (*kind, status)
            })
            .collect();

        Self {
            state: Arc::new(RwLock::new(MapState { view, layers })),
        }
    }

    /// Adds an overlay to the map.
    ///
    /// # Errors
    ///
    /// Returns [`PresentError::DuplicateOverlay`] if an overlay of the same
    /// kind is already attached; the map is left unchanged.
    pub async fn attach(&self, overlay: OverlayLayer) -> Result<(), PresentError> {
        let mut state = self.state.write().await;
        let kind = overlay.kind;
        if state.view.overlay(kind).is_some() {
            return Err(PresentError::DuplicateOverlay(kind));
        }

        log::info!("Attaching overlay \"{}\"", overlay.name);
        state.view.overlays.push(overlay);
        state.layers.insert(kind, LayerStatus::Attached);
        Ok(())
    }

    /// Records that an overlay's load failed. Ignored if it is already
    /// attached.
    pub async fn mark_failed(&self, kind: OverlayKind, reason: impl Into<String>) {
        let mut state = self.state.write().await;
        if state.view.overlay(kind).is_none() {
            state.layers.insert(
                kind,
                LayerStatus::Failed {
                    reason: reason.into(),
                },
            );
        }
    }

    /// Returns a copy of the current map and overlay statuses.
    pub async fn snapshot(&self) -> MapSnapshot {
        let state = self.state.read().await;
        MapSnapshot {
            map: state.view.clone(),
            layers: state.layers.clone(),
        }
    }
}

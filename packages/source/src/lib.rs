#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Data loading for the frog map.
//!
//! The map is fed by three independent loads: the frog census
//! [`FeatureSource`] (remote `ArcGIS` query) and two [`GeoJsonSource`]s
//! (local suburb and wetland files). [`transform`] reduces raw census
//! features into [`SightingRecord`](frog_map_sighting_models::SightingRecord)s.

pub mod arcgis;
pub mod geojson_file;
pub mod parsing;
pub mod transform;

use std::time::Duration;

use async_trait::async_trait;
use frog_map_sighting_models::RawFeature;

/// Errors that can occur while loading a layer's data.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP transport failure, including timeouts.
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Response status code.
        status: u16,
        /// Request URL.
        url: String,
    },

    /// `ArcGIS` reported an error in an otherwise successful response.
    #[error("ArcGIS service error {code}: {message}")]
    Service {
        /// Error code from the `error` object.
        code: i64,
        /// Error message from the `error` object.
        message: String,
    },

    /// The body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The body was JSON but did not have the expected shape.
    #[error("Malformed data: {message}")]
    MalformedData {
        /// Description of what went wrong.
        message: String,
    },

    /// I/O error reading a local file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A source of frog census features.
#[async_trait]
pub trait FeatureSource: Send + Sync {
    /// Label for log messages.
    fn label(&self) -> &str;

    /// Fetches every raw feature, in service order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request fails or the response does
    /// not describe a feature collection.
    async fn fetch_features(&self) -> Result<Vec<RawFeature>, SourceError>;
}

/// A source of an opaque `GeoJSON` overlay payload.
#[async_trait]
pub trait GeoJsonSource: Send + Sync {
    /// Label for log messages.
    fn label(&self) -> &str;

    /// Loads and parses the payload.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the payload cannot be read or is not JSON.
    async fn load_geojson(&self) -> Result<serde_json::Value, SourceError>;
}

/// Builds the HTTP client shared by remote sources.
///
/// Every request made through it is bounded by `timeout`.
///
/// # Errors
///
/// Returns [`SourceError::Network`] if the TLS backend fails to initialise.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, SourceError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("frog_map/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

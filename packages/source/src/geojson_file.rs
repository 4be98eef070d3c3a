//! Local `GeoJSON` overlay files.
//!
//! Payloads are passed through to the map untouched once they parse as a
//! `GeoJSON` object. Anything else fails the load so the overlay is marked
//! failed instead of reaching the browser.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::{GeoJsonSource, SourceError};

/// [`GeoJsonSource`] reading a file from disk.
#[derive(Debug, Clone)]
pub struct GeoJsonFile {
    label: String,
    path: PathBuf,
}

impl GeoJsonFile {
    /// Creates a source for the file at `path`.
    #[must_use]
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

#[async_trait]
impl GeoJsonSource for GeoJsonFile {
    fn label(&self) -> &str {
        &self.label
    }

    async fn load_geojson(&self) -> Result<serde_json::Value, SourceError> {
        log::info!("{}: reading {}", self.label, self.path.display());
        let text = tokio::fs::read_to_string(&self.path).await?;
        let value: serde_json::Value = serde_json::from_str(&text)?;
        geojson::GeoJson::from_json_value(value.clone()).map_err(|e| {
            SourceError::MalformedData {
                message: format!("{} is not valid GeoJSON: {e}", self.path.display()),
            }
        })?;

        match feature_count(&value) {
            Some(count) => log::info!("{}: {count} features", self.label),
            None => log::debug!("{}: payload is not a FeatureCollection", self.label),
        }

        Ok(value)
    }
}

/// Number of features when `value` is a `FeatureCollection`.
#[must_use]
pub fn feature_count(value: &serde_json::Value) -> Option<usize> {
    if value.get("type")?.as_str()? != "FeatureCollection" {
        return None;
    }
    value
        .get("features")
        .and_then(serde_json::Value::as_array)
        .map(Vec::len)
}

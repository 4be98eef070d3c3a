#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Frog map configuration.
//!
//! Defaults describe the Melbourne frog census map. An optional TOML file
//! overrides any subset of them, and a few environment variables
//! (`MAPBOX_ACCESS_TOKEN`, `BIND_ADDR`, `PORT`) are applied last.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default `ArcGIS` query for the Melbourne Water frog census layer.
pub const DEFAULT_QUERY_URL: &str = "https://services5.arcgis.com/ZSYwjtv8RKVhkXIL/arcgis/rest/services/Frog_Location_OpenData/FeatureServer/0/query?where=1%3D1&outFields=*&outSR=4326&f=json";

/// Environment variable holding the tile access token.
pub const ACCESS_TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";

const MAPBOX_ATTRIBUTION: &str = "© <a href='https://www.mapbox.com/about/maps/'>Mapbox</a> © <a href='http://www.openstreetmap.org/copyright'>OpenStreetMap</a> <strong><a href='https://www.mapbox.com/map-feedback/' target='_blank'>Improve this map</a></strong>";

const OSM_ATTRIBUTION: &str = "Map data &copy; <a href=\"https://www.openstreetmap.org/\">OpenStreetMap</a> contributors, <a href=\"https://creativecommons.org/licenses/by-sa/2.0/\">CC-BY-SA</a>, Imagery © <a href=\"https://www.mapbox.com/\">Mapbox</a>";

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// No tile access token was supplied.
    #[error("No map tile access token configured (set MAPBOX_ACCESS_TOKEN)")]
    MissingCredential,

    /// A value is present but unusable.
    #[error("Invalid config value for {key}: {message}")]
    InvalidValue {
        /// Setting name.
        key: &'static str,
        /// Why it was rejected.
        message: String,
    },
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrogMapConfig {
    /// Where layer data comes from.
    pub source: SourceSettings,
    /// Map view settings.
    pub map: MapSettings,
    /// Base tile layer settings.
    pub tiles: TileSettings,
    /// HTTP server settings.
    pub server: ServerSettings,
}

/// Data source settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// `ArcGIS` feature query URL.
    pub query_url: String,
    /// Page size for paged fetching. Unset means one request.
    pub page_size: Option<u64>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Suburb boundary `GeoJSON` file.
    pub suburbs_path: PathBuf,
    /// Wetland and lake asset `GeoJSON` file.
    pub wetlands_path: PathBuf,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            query_url: DEFAULT_QUERY_URL.to_string(),
            page_size: None,
            request_timeout_secs: 30,
            suburbs_path: PathBuf::from("data/suburbs.json"),
            wetlands_path: PathBuf::from("data/Wetland_and_Lake_Assets.geojson"),
        }
    }
}

/// Map view settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Host-page container element id.
    pub container: String,
    /// Initial center latitude.
    pub center_lat: f64,
    /// Initial center longitude.
    pub center_lng: f64,
    /// Initial zoom.
    pub zoom: u8,
    /// Maximum marker cluster radius in pixels.
    pub max_cluster_radius: u32,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            container: "map".to_string(),
            center_lat: -37.8136,
            center_lng: 144.9631,
            zoom: 5,
            max_cluster_radius: 80,
        }
    }
}

/// One background tile style.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TileStyleSettings {
    /// URL template.
    pub url_template: String,
    /// Style id substituted for `{id}`.
    pub style_id: String,
    /// Tile size in pixels.
    pub tile_size: u32,
    /// Zoom offset.
    #[serde(default)]
    pub zoom_offset: i8,
    /// Maximum zoom.
    pub max_zoom: u8,
    /// Attribution HTML.
    pub attribution: String,
}

/// Base tile layer settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TileSettings {
    /// Tile service credential. Usually supplied via [`ACCESS_TOKEN_ENV`].
    pub access_token: Option<String>,
    /// Street style.
    pub street: TileStyleSettings,
    /// Dark style.
    pub dark: TileStyleSettings,
}

impl Default for TileSettings {
    fn default() -> Self {
        Self {
            access_token: None,
            street: TileStyleSettings {
                url_template: "https://api.mapbox.com/styles/v1/{id}/tiles/{z}/{x}/{y}?access_token={accessToken}".to_string(),
                style_id: "mapbox/streets-v11".to_string(),
                tile_size: 512,
                zoom_offset: -1,
                max_zoom: 18,
                attribution: MAPBOX_ATTRIBUTION.to_string(),
            },
            dark: TileStyleSettings {
                url_template: "https://api.mapbox.com/styles/v1/mapbox/{id}/tiles/{z}/{x}/{y}?access_token={accessToken}".to_string(),
                style_id: "dark-v10".to_string(),
                tile_size: 256,
                zoom_offset: 0,
                max_zoom: 18,
                attribution: OSM_ATTRIBUTION.to_string(),
            },
        }
    }
}

impl TileSettings {
    /// Returns the access token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] if no non-blank token is
    /// configured.
    pub fn access_token(&self) -> Result<&str, ConfigError> {
        self.access_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingCredential)
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind address.
    pub bind_addr: String,
    /// Port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl FrogMapConfig {
    /// Loads configuration from `path` (if given) and the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or a
    /// value fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the document does not match the
    /// schema.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Applies environment overrides looked up through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ACCESS_TOKEN_ENV) {
            self.tiles.access_token = Some(token);
        }
        if let Some(bind_addr) = lookup("BIND_ADDR") {
            self.server.bind_addr = bind_addr;
        }
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(e) => log::warn!(
                    "Ignoring PORT={port:?} ({e}); using port {}",
                    self.server.port
                ),
            }
        }
    }

    /// Checks values that would otherwise fail later in surprising ways.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero timeout or page
    /// size, or a non-finite center.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "source.request_timeout_secs",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.source.page_size == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "source.page_size",
                message: "must be greater than zero".to_string(),
            });
        }
        if !self.map.center_lat.is_finite() || !self.map.center_lng.is_finite() {
            return Err(ConfigError::InvalidValue {
                key: "map.center",
                message: "center must be a finite coordinate".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_melbourne_map() {
        let config = FrogMapConfig::default();
        assert_eq!(config.map.container, "map");
        assert!((config.map.center_lat - -37.8136).abs() < f64::EPSILON);
        assert!((config.map.center_lng - 144.9631).abs() < f64::EPSILON);
        assert_eq!(config.map.zoom, 5);
        assert_eq!(config.source.query_url, DEFAULT_QUERY_URL);
        assert_eq!(config.source.page_size, None);
        assert_eq!(config.tiles.street.tile_size, 512);
        assert_eq!(config.tiles.street.zoom_offset, -1);
        assert_eq!(config.tiles.dark.style_id, "dark-v10");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn toml_overrides_subset() {
        let config = FrogMapConfig::from_toml(
            r#"
            [source]
            page_size = 1000
            suburbs_path = "/srv/data/suburbs.json"

            [map]
            zoom = 9
            "#,
        )
        .unwrap();
        assert_eq!(config.source.page_size, Some(1000));
        assert_eq!(config.source.suburbs_path, PathBuf::from("/srv/data/suburbs.json"));
        assert_eq!(config.map.zoom, 9);
        assert_eq!(config.map.container, "map");
        assert_eq!(config.source.request_timeout_secs, 30);
    }

    #[test]
    fn example_config_matches_defaults() {
        let example =
            FrogMapConfig::from_toml(include_str!("../../../frog_map.example.toml")).unwrap();
        assert_eq!(example, FrogMapConfig::default());
    }

    #[test]
    fn unknown_types_are_rejected() {
        let err = FrogMapConfig::from_toml("[map]\nzoom = \"close\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = FrogMapConfig::default();
        config.apply_env(|key| match key {
            ACCESS_TOKEN_ENV => Some("pk.abc".to_string()),
            "PORT" => Some("9090".to_string()),
            "BIND_ADDR" => Some("0.0.0.0".to_string()),
            _ => None,
        });
        assert_eq!(config.tiles.access_token().unwrap(), "pk.abc");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.bind_addr, "0.0.0.0");
    }

    #[test]
    fn unparseable_port_keeps_default() {
        let mut config = FrogMapConfig::default();
        config.apply_env(|key| (key == "PORT").then(|| "eighty".to_string()));
        assert_eq!(config.server.port, 8080);

        config.server.port = 9000;
        config.apply_env(|key| (key == "PORT").then(|| "70000".to_string()));
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn missing_or_blank_token_is_missing_credential() {
        let mut tiles = TileSettings::default();
        assert!(matches!(tiles.access_token(), Err(ConfigError::MissingCredential)));
        tiles.access_token = Some("   ".to_string());
        assert!(matches!(tiles.access_token(), Err(ConfigError::MissingCredential)));
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let mut config = FrogMapConfig::default();
        config.source.request_timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key: "source.request_timeout_secs", .. })
        ));
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the frog sighting map.
//!
//! Serves the host page that mounts the Leaflet map, plus the JSON API the
//! page reads the composed map from. The map is initialized before the
//! server binds; the census fetch and both `GeoJSON` reads run on a
//! background task and attach their overlays as they complete.

mod handlers;
pub mod page;

use std::time::Duration;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use frog_map_config::FrogMapConfig;
use frog_map_map::MapHandle;
use frog_map_map::loader::MapLoader;
use frog_map_map::presenter::Presenter;
use frog_map_source::arcgis::{ArcGisConfig, ArcGisSource};
use frog_map_source::geojson_file::GeoJsonFile;
use frog_map_source::{SourceError, http_client};

/// Shared application state.
pub struct AppState {
    /// The map overlays attach to.
    pub map: MapHandle,
}

/// Builds the loader for the census service and both overlay files.
///
/// # Errors
///
/// Returns [`SourceError`] if the HTTP client cannot be constructed.
pub fn build_loader(
    config: &FrogMapConfig,
    presenter: Presenter,
) -> Result<MapLoader, SourceError> {
    let client = http_client(Duration::from_secs(config.source.request_timeout_secs))?;

    let census = ArcGisSource::new(
        client,
        ArcGisConfig {
            query_url: config.source.query_url.clone(),
            page_size: config.source.page_size,
            label: "Frog census".to_string(),
        },
    );
    let suburbs = GeoJsonFile::new("Suburbs", &config.source.suburbs_path);
    let wetlands = GeoJsonFile::new("Wetlands", &config.source.wetlands_path);

    Ok(MapLoader::new(
        presenter,
        Box::new(census),
        Box::new(suburbs),
        Box::new(wetlands),
    ))
}

/// Starts the frog map server.
///
/// Initializes the map, spawns the layer loads, and runs the HTTP server
/// until shutdown. The caller provides the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP client cannot be built,
/// or the server fails to bind or hits a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: FrogMapConfig) -> std::io::Result<()> {
    let presenter = Presenter::new(config.map.clone(), config.tiles.clone());
    let map = MapHandle::new(presenter.initialize());

    let loader = build_loader(&config, presenter).map_err(std::io::Error::other)?;
    let loader_map = map.clone();
    tokio::spawn(async move {
        loader.run(&loader_map).await;
    });

    let state = web::Data::new(AppState { map });
    let bind_addr = config.server.bind_addr.clone();
    let port = config.server.port;

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .route("/", web::get().to(handlers::index))
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/map", web::get().to(handlers::map))
                    .route("/sightings.geojson", web::get().to(handlers::sightings_geojson)),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}

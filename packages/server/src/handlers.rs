//! HTTP handler functions for the frog map.

use actix_web::{HttpResponse, http::header::ContentType, web};
use frog_map_map::export::markers_to_feature_collection;
use frog_map_map_models::{LayerStatus, OverlayKind};
use frog_map_server_models::{ApiError, ApiHealth};

use crate::AppState;
use crate::page::render_index;

/// `GET /`
///
/// Host page with the map container.
pub async fn index(state: web::Data<AppState>) -> HttpResponse {
    let snapshot = state.map.snapshot().await;
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_index(&snapshot.map.container))
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/map`
///
/// Current map view and the load status of every overlay.
pub async fn map(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.map.snapshot().await)
}

/// `GET /api/sightings.geojson`
///
/// The frog sighting markers as a `GeoJSON` `FeatureCollection`.
pub async fn sightings_geojson(state: web::Data<AppState>) -> HttpResponse {
    let snapshot = state.map.snapshot().await;

    if let Some(layer) = snapshot.map.marker_layer() {
        return HttpResponse::Ok()
            .content_type("application/geo+json")
            .json(markers_to_feature_collection(layer));
    }

    match snapshot.layers.get(&OverlayKind::FrogSightings) {
        Some(LayerStatus::Failed { reason }) => HttpResponse::BadGateway().json(ApiError::new(
            format!("Frog sightings failed to load: {reason}"),
        )),
        _ => HttpResponse::ServiceUnavailable()
            .json(ApiError::new("Frog sightings are still loading")),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test};
    use frog_map_config::{MapSettings, TileSettings};
    use frog_map_map::MapHandle;
    use frog_map_map::presenter::Presenter;
    use frog_map_sighting_models::{SightingDate, SightingRecord};

    use super::*;

    fn presenter() -> Presenter {
        Presenter::new(MapSettings::default(), TileSettings::default())
    }

    async fn get_sightings(map: MapHandle) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState { map }))
                .route("/api/sightings.geojson", web::get().to(sightings_geojson)),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/api/sightings.geojson")
            .to_request();
        test::call_service(&app, req).await
    }

    #[actix_web::test]
    async fn attached_markers_are_served_as_geojson() {
        let presenter = presenter();
        let map = MapHandle::new(presenter.initialize());
        let records = [SightingRecord {
            common_name: "Litoria ewingii".to_string(),
            date: SightingDate::Unknown,
            latitude: Some(-37.81),
            longitude: Some(144.96),
        }];
        map.attach(presenter.marker_overlay(&records)).await.unwrap();

        let resp = get_sightings(map).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "application/geo+json"
        );

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["type"], "FeatureCollection");
        assert_eq!(body["features"].as_array().unwrap().len(), 1);
        assert_eq!(
            body["features"][0]["geometry"]["coordinates"],
            serde_json::json!([144.96, -37.81])
        );
    }

    #[actix_web::test]
    async fn failed_marker_load_is_bad_gateway() {
        let map = MapHandle::new(presenter().initialize());
        map.mark_failed(OverlayKind::FrogSightings, "connection refused")
            .await;

        let resp = get_sightings(map).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("connection refused"));
    }

    #[actix_web::test]
    async fn pending_marker_load_is_service_unavailable() {
        let map = MapHandle::new(presenter().initialize());

        let resp = get_sightings(map).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}

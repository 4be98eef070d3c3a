//! `GeoJSON` export of the marker layer.

use frog_map_map_models::MarkerClusterLayer;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

/// Converts markers to a `FeatureCollection` of points, one per marker, in
/// marker order. Properties carry the popup label and detail.
#[must_use]
pub fn markers_to_feature_collection(layer: &MarkerClusterLayer) -> FeatureCollection {
    let features = layer
        .markers
        .iter()
        .map(|marker| {
            let mut properties = JsonObject::new();
            properties.insert("commonName".to_string(), marker.label.clone().into());
            if let Some(detail) = &marker.detail {
                properties.insert("detail".to_string(), detail.clone().into());
            }

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![
                    marker.position.lng,
                    marker.position.lat,
                ]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use frog_map_map_models::{LatLng, Marker, MarkerClusterOptions};

    use super::*;

    #[test]
    fn exports_points_in_lng_lat_order() {
        let layer = MarkerClusterLayer {
            options: MarkerClusterOptions::default(),
            markers: vec![Marker {
                position: LatLng::new(-37.81, 144.96),
                label: "Litoria ewingii".to_string(),
                detail: None,
            }],
        };

        let collection = markers_to_feature_collection(&layer);
        assert_eq!(collection.features.len(), 1);

        let value = serde_json::to_value(&collection).unwrap();
        let feature = &value["features"][0];
        assert_eq!(feature["geometry"]["type"], "Point");
        assert_eq!(feature["geometry"]["coordinates"][0], 144.96);
        assert_eq!(feature["geometry"]["coordinates"][1], -37.81);
        assert_eq!(feature["properties"]["commonName"], "Litoria ewingii");
        assert!(feature["properties"].get("detail").is_none());
    }

    #[test]
    fn empty_layer_exports_empty_collection() {
        let collection = markers_to_feature_collection(&MarkerClusterLayer::default());
        assert!(collection.features.is_empty());
    }
}

//! Host page that mounts the Leaflet map.
//!
//! The page reads `/api/map` and builds Leaflet layers from the
//! [`MapView`](frog_map_map_models::MapView) it returns. Clustering is done
//! by Leaflet.markercluster in the browser. While any overlay is still
//! loading the page polls again and adds newly attached overlays, each at
//! most once.

const CONTAINER_PLACEHOLDER: &str = "{{CONTAINER_ID}}";

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Frog Sightings</title>

  <!-- Leaflet 1.9.4 -->
  <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"
    integrity="sha256-p4NxAoJBhIIN+hmNHrzRCf9tD/miZyoHS5obTRR9BMY=" crossorigin="" />
  <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"
    integrity="sha256-20nQCchB9co0qIjJZRGuk2/Z9VM+kNiyxNV1lvTlZBo=" crossorigin=""></script>

  <!-- Leaflet.markercluster 1.4.1 -->
  <link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.4.1/dist/MarkerCluster.css" />
  <link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.4.1/dist/MarkerCluster.Default.css" />
  <script src="https://unpkg.com/leaflet.markercluster@1.4.1/dist/leaflet.markercluster.js"></script>

  <style>
    html, body { height: 100%; margin: 0; padding: 0; }
    [id="{{CONTAINER_ID}}"] { height: 100%; width: 100%; }
  </style>
</head>
<body>
  <div id="{{CONTAINER_ID}}"></div>

  <script>
    const POLL_MS = 1000;
    const added = new Set();
    let map = null;
    let control = null;

    function escapeHtml(text) {
      const div = document.createElement('div');
      div.textContent = text;
      return div.innerHTML;
    }

    function buildOverlay(overlay) {
      const content = overlay.content;
      if (content.type === 'markerCluster') {
        const group = L.markerClusterGroup(content.options);
        for (const m of content.markers) {
          const marker = L.marker([m.position.lat, m.position.lng]);
          let popup = '<strong>' + escapeHtml(m.label) + '</strong>';
          if (m.detail) {
            popup += '<br>' + escapeHtml(m.detail);
          }
          marker.bindPopup(popup);
          group.addLayer(marker);
        }
        return group;
      }
      return L.geoJSON(content.data, { style: () => content.style });
    }

    function createMap(view) {
      const baseMaps = {};
      let active = null;
      for (const layer of view.baseLayers) {
        const tiles = L.tileLayer(layer.urlTemplate, layer.options);
        baseMaps[layer.name] = tiles;
        if (layer.kind === view.activeBase) {
          active = tiles;
        }
      }

      map = L.map('{{CONTAINER_ID}}', {
        center: [view.viewport.center.lat, view.viewport.center.lng],
        zoom: view.viewport.zoom,
        layers: active ? [active] : [],
      });

      control = L.control.layers(baseMaps, {}, view.layerControl).addTo(map);
    }

    function attachOverlays(view) {
      for (const overlay of view.overlays) {
        if (added.has(overlay.kind)) {
          continue;
        }
        added.add(overlay.kind);
        let layer;
        try {
          layer = buildOverlay(overlay);
        } catch (err) {
          console.error(overlay.name + ' could not be drawn:', err);
          continue;
        }
        if (overlay.visible) {
          layer.addTo(map);
        }
        control.addOverlay(layer, overlay.name);
      }
    }

    async function poll() {
      const response = await fetch('/api/map');
      if (!response.ok) {
        throw new Error('GET /api/map returned ' + response.status);
      }
      const snapshot = await response.json();

      if (map === null) {
        createMap(snapshot.map);
      }
      attachOverlays(snapshot.map);

      let pending = false;
      for (const [kind, status] of Object.entries(snapshot.layers)) {
        if (status.state === 'pending') {
          pending = true;
        } else if (status.state === 'failed') {
          console.error(kind + ' failed to load: ' + status.reason);
        }
      }
      return pending;
    }

    // Keep polling after a failed request; the map may not exist yet.
    function schedule() {
      poll()
        .then((pending) => {
          if (pending) {
            setTimeout(schedule, POLL_MS);
          }
        })
        .catch((err) => {
          console.error(err);
          setTimeout(schedule, POLL_MS);
        });
    }

    schedule();
  </script>
</body>
</html>
"#;

/// Renders the host page with the map mounted in element `container`.
#[must_use]
pub fn render_index(container: &str) -> String {
    INDEX_HTML.replace(CONTAINER_PLACEHOLDER, &sanitize_id(container))
}

/// Restricts an element id to characters that are safe in an HTML
/// attribute, a quoted CSS attribute selector and a JS string literal.
/// Ids must start with a letter.
fn sanitize_id(id: &str) -> String {
    let cleaned: String = id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if cleaned.is_empty() {
        "map".to_string()
    } else if cleaned.starts_with(|c: char| c.is_ascii_alphabetic()) {
        cleaned
    } else {
        format!("map-{cleaned}")
    }
}

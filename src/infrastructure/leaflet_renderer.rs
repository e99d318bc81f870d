// Leaflet renderer - Self-contained HTML map artifact
use crate::application::map_renderer::{MapRenderer, MapView};
use crate::domain::placement::PlacementMode;
use crate::error::PipelineError;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// OpenStreetMap raster tiles stop at 19; larger zoom hints are clamped.
const MAX_TILE_ZOOM: u8 = 19;

/// Renders a [`MapView`] as one HTML file built on Leaflet, with
/// Leaflet.markercluster supplying spiderfy-on-zoom grouping in cluster
/// mode. Marker and track data is embedded as JSON rather than spliced
/// into markup.
#[derive(Debug, Clone, Default)]
pub struct LeafletRenderer;

#[derive(Serialize)]
struct MarkerData<'a> {
    lat: f64,
    lon: f64,
    color: &'static str,
    tooltip: &'a str,
    popup: &'a str,
}

impl MapRenderer for LeafletRenderer {
    fn render(&self, view: &MapView, output: &Path) -> Result<(), PipelineError> {
        let markers: Vec<MarkerData<'_>> = view
            .markers
            .iter()
            .map(|point| MarkerData {
                lat: point.display_latitude,
                lon: point.display_longitude,
                color: point.color.as_str(),
                tooltip: &point.tooltip,
                popup: &point.popup,
            })
            .collect();

        let html = PAGE_TEMPLATE
            .replace("__CENTER__", &script_json(&view.center)?)
            .replace("__ZOOM__", &view.zoom_hint.min(MAX_TILE_ZOOM).to_string())
            .replace(
                "__CLUSTER__",
                if view.mode == PlacementMode::Cluster {
                    "true"
                } else {
                    "false"
                },
            )
            .replace("__MARKERS__", &script_json(&markers)?)
            .replace("__TRACK__", &script_json(&view.track)?);

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PipelineError::Render(e.to_string()))?;
        }
        fs::write(output, html).map_err(|e| PipelineError::Render(e.to_string()))
    }
}

/// JSON safe for embedding in an inline <script> block: a literal "</"
/// inside a string would end the script element early.
fn script_json<T: Serialize>(value: &T) -> Result<String, PipelineError> {
    let json = serde_json::to_string(value).map_err(|e| PipelineError::Render(e.to_string()))?;
    Ok(json.replace("</", "<\\/"))
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>GPS Track</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css">
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script src="https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js"></script>
<style>html, body, #map { height: 100%; margin: 0; }</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map('map').setView(__CENTER__, __ZOOM__);
L.tileLayer('https://tile.openstreetmap.org/{z}/{x}/{y}.png', {
  maxZoom: 19,
  attribution: '&copy; OpenStreetMap contributors'
}).addTo(map);

var useCluster = __CLUSTER__;
var layer = useCluster
  ? L.markerClusterGroup({
      spiderfyOnMaxZoom: true,
      showCoverageOnHover: false,
      removeOutsideVisibleBounds: false
    })
  : L.layerGroup();

__MARKERS__.forEach(function (m) {
  L.circleMarker([m.lat, m.lon], {
    radius: 7,
    color: m.color,
    fillColor: m.color,
    fillOpacity: 0.9
  })
    .bindTooltip(m.tooltip)
    .bindPopup(m.popup, { maxWidth: 300 })
    .addTo(layer);
});
layer.addTo(map);

L.polyline(__TRACK__, { color: 'blue', weight: 2, opacity: 0.7 })
  .bindPopup('GPS Track')
  .addTo(map);
</script>
</body>
</html>
"#;

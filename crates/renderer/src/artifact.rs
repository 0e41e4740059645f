//! Self-contained HTML map artifact.
//!
//! The document loads Leaflet and Leaflet.heat from a CDN and embeds all
//! map data as one JSON block, so it can be served from any static host.
//! Output is a pure function of its inputs.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::info;

use atlas_common::{BoundingBox, EmissionError, FacilityDetail, FacilityId, Layer, LayerId};

use crate::composer::ComposedMap;

/// Overlay ids the document knows how to present, in display order.
/// `candidate_sites` is the only optional one.
pub const KNOWN_OVERLAYS: [&str; 4] = [
    LayerId::TOP_N,
    LayerId::BOTTOM_N,
    LayerId::CANDIDATE_SITES,
    LayerId::WIND_HEATMAP,
];

const MAX_ZOOM: u8 = 19;

/// The single base layer and initial view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseMapConfig {
    pub title: String,
    /// Initial view center as (lat, lon).
    pub center: (f64, f64),
    pub zoom: u8,
    /// XYZ tile template with `{z}`, `{x}` and `{y}` placeholders.
    pub tile_url: String,
    pub attribution: String,
    /// Every marker and heat point must fall inside this box.
    pub valid_bounds: BoundingBox,
}

impl Default for BaseMapConfig {
    fn default() -> Self {
        Self {
            title: "Wind Atlas".to_string(),
            center: (0.0, 0.0),
            zoom: 2,
            tile_url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; OpenStreetMap contributors".to_string(),
            valid_bounds: BoundingBox::WORLD,
        }
    }
}

impl BaseMapConfig {
    pub fn validate(&self) -> Result<(), EmissionError> {
        self.valid_bounds
            .validate()
            .map_err(|e| EmissionError::InvalidBaseMap(format!("valid_bounds: {}", e)))?;

        let (lat, lon) = self.center;
        if !self.valid_bounds.contains_point(lon, lat) {
            return Err(EmissionError::InvalidBaseMap(format!(
                "center ({}, {}) lies outside {}",
                lat, lon, self.valid_bounds
            )));
        }
        if self.zoom > MAX_ZOOM {
            return Err(EmissionError::InvalidBaseMap(format!(
                "zoom {} exceeds {}",
                self.zoom, MAX_ZOOM
            )));
        }
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.tile_url.contains(placeholder) {
                return Err(EmissionError::InvalidBaseMap(format!(
                    "tile_url is missing {}",
                    placeholder
                )));
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct BasePayload<'a> {
    center: [f64; 2],
    zoom: u8,
    max_zoom: u8,
    /// Leaflet `maxBounds`: [[south, west], [north, east]].
    max_bounds: [[f64; 2]; 2],
    tile_url: &'a str,
    attribution: &'a str,
}

#[derive(Serialize)]
struct OverlayPayload<'a> {
    /// "Group: Name" as listed in the layer control.
    control_label: String,
    #[serde(flatten)]
    layer: &'a Layer,
}

#[derive(Serialize)]
struct DocumentPayload<'a> {
    base: BasePayload<'a>,
    overlays: Vec<OverlayPayload<'a>>,
    details: &'a BTreeMap<FacilityId, FacilityDetail>,
    intensity_units: &'a str,
}

/// Render the composed map into one HTML document.
pub fn emit_document(base: &BaseMapConfig, map: &ComposedMap) -> Result<String, EmissionError> {
    if map.layers.is_empty() {
        return Err(EmissionError::EmptyLayers);
    }
    check_layer_set(&map.layers)?;
    base.validate()?;
    check_bounds(&map.layers, &base.valid_bounds)?;

    let payload = DocumentPayload {
        base: BasePayload {
            center: [base.center.0, base.center.1],
            zoom: base.zoom,
            max_zoom: MAX_ZOOM,
            max_bounds: base.valid_bounds.to_lat_lon_corners(),
            tile_url: &base.tile_url,
            attribution: &base.attribution,
        },
        overlays: map
            .layers
            .iter()
            .map(|layer| OverlayPayload {
                control_label: format!("{}: {}", layer.group.title(), layer.name),
                layer,
            })
            .collect(),
        details: &map.details,
        intensity_units: &map.intensity_units,
    };

    // `<` only occurs inside JSON strings, where the \u003c escape is
    // equivalent and cannot close the surrounding script element.
    let data = serde_json::to_string(&payload)?.replace('<', "\\u003c");

    let mut html = String::with_capacity(DOCUMENT_HEAD.len() + DOCUMENT_TAIL.len() + data.len());
    html.push_str(DOCUMENT_HEAD);
    html.push_str(&escape_html(&base.title));
    html.push_str(DOCUMENT_BODY);
    html.push_str(&data);
    html.push_str(DOCUMENT_TAIL);

    info!(
        overlays = map.layers.len(),
        details = map.details.len(),
        bytes = html.len(),
        "Emitted map document"
    );

    Ok(html)
}

/// Write `document` to `path` atomically.
///
/// The content goes to a temporary file in the destination directory which
/// is renamed over `path` only after a complete write, so a failed run never
/// leaves a partial artifact behind.
pub fn write_artifact(path: &Path, document: &str) -> Result<(), EmissionError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let write_err = |e: std::io::Error| EmissionError::Write(format!("{}: {}", path.display(), e));

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(document.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(0o644))
            .map_err(write_err)?;
    }

    tmp.persist(path).map_err(|e| write_err(e.error))?;

    info!(path = %path.display(), bytes = document.len(), "Wrote map artifact");
    Ok(())
}

fn check_layer_set(layers: &[Layer]) -> Result<(), EmissionError> {
    let actual: Vec<String> = layers.iter().map(|l| l.id.to_string()).collect();
    let has_candidates = actual.iter().any(|id| id == LayerId::CANDIDATE_SITES);
    let expected: Vec<String> = KNOWN_OVERLAYS
        .iter()
        .filter(|id| has_candidates || **id != LayerId::CANDIDATE_SITES)
        .map(|id| id.to_string())
        .collect();

    if actual != expected {
        return Err(EmissionError::UnexpectedLayers { expected, actual });
    }
    Ok(())
}

fn check_bounds(layers: &[Layer], bounds: &BoundingBox) -> Result<(), EmissionError> {
    for layer in layers {
        for (element, lat, lon) in layer.elements.positions() {
            if !(lat.is_finite() && lon.is_finite() && bounds.contains_point(lon, lat)) {
                return Err(EmissionError::OutOfBounds {
                    layer: layer.id.to_string(),
                    element,
                    lat,
                    lon,
                });
            }
        }
    }
    Ok(())
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const DOCUMENT_HEAD: &str = r#"<!doctype html>
<html lang="en">

<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>"#;

const DOCUMENT_BODY: &str = r#"</title>

  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.css" crossorigin="anonymous"
    referrerpolicy="no-referrer" />
  <script src="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.js" crossorigin="anonymous"
    referrerpolicy="no-referrer"></script>
  <script src="https://unpkg.com/leaflet.heat@0.2.0/dist/leaflet-heat.js"></script>

  <style>
    html, body { height: 100%; margin: 0; font-family: system-ui, sans-serif; }
    #map { position: absolute; inset: 0; }
    .detail-table { border-collapse: collapse; margin-top: 4px; }
    .detail-table td { padding: 1px 6px; vertical-align: top; }
    .detail-table td:first-child { color: #555; }
  </style>
</head>

<body>
  <div id="map"></div>
  <script id="atlas-data" type="application/json">"#;

const DOCUMENT_TAIL: &str = r#"</script>
  <script>
    (function () {
      const data = JSON.parse(document.getElementById('atlas-data').textContent);

      const map = L.map('map', { maxBounds: data.base.max_bounds })
        .setView(data.base.center, data.base.zoom);
      L.tileLayer(data.base.tile_url, {
        attribution: data.base.attribution,
        maxZoom: data.base.max_zoom,
      }).addTo(map);

      const ESCAPES = { '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;' };
      const esc = (s) => String(s).replace(/[&<>"']/g, (c) => ESCAPES[c]);
      const num = (v, digits) => (v === null || v === undefined) ? 'no data' : Number(v).toFixed(digits);

      function detailHtml(key) {
        const d = data.details[key];
        if (!d) {
          return esc(key);
        }
        const rows = [
          ['Status', esc(d.status)],
          ['Capacity', num(d.capacity_mw, 1) + ' MW'],
          ['Annual generation', num(d.annual_generation_mwh, 0) + ' MWh'],
          ['Capacity factor', (d.capacity_factor * 100).toFixed(1) + ' %'],
          ['Wind intensity', d.intensity === null ? 'no data' : num(d.intensity, 2) + ' ' + esc(data.intensity_units)],
          ['Nearby samples', d.nearby_samples],
        ];
        d.ranks.forEach(([tier, rank]) => rows.push([tier === 'top' ? 'Top rank' : 'Bottom rank', '#' + rank]));
        if (d.weibull) {
          rows.push(['Weibull k / c', d.weibull.shape.toFixed(2) + ' / ' + d.weibull.scale.toFixed(2) + ' m/s']);
        }
        if (d.operator !== null) rows.push(['Operator', esc(d.operator)]);
        if (d.hub_height_m !== null) rows.push(['Hub height', num(d.hub_height_m, 0) + ' m']);
        if (d.turbine_count !== null) rows.push(['Turbines', d.turbine_count]);
        if (d.commissioned_year !== null) rows.push(['Commissioned', d.commissioned_year]);

        return '<strong>' + esc(d.name) + '</strong> <small>(' + esc(d.id) + ')</small>'
          + '<table class="detail-table">'
          + rows.map(([k, v]) => '<tr><td>' + k + '</td><td>' + v + '</td></tr>').join('')
          + '</table>';
      }

      const overlays = {};
      data.overlays.forEach((overlay) => {
        const e = overlay.elements;
        let group;
        if (e.kind === 'markers') {
          group = L.layerGroup(e.markers.map((m) =>
            L.circleMarker([m.lat, m.lon], {
              radius: m.style.radius,
              color: m.style.color,
              fillColor: m.style.color,
              fillOpacity: m.style.fill_opacity,
              weight: 1,
            })
              .bindTooltip(esc(m.label))
              .bindPopup(() => detailHtml(m.detail_key))
          ));
        } else {
          group = L.heatLayer(e.points.map((p) => [p.lat, p.lon, p.weight]), {
            radius: e.radius,
            blur: e.blur,
            minOpacity: e.min_opacity,
            max: 1.0,
            gradient: Object.fromEntries(e.gradient),
          });
        }
        overlays[esc(overlay.control_label)] = group;
        if (overlay.visible) {
          group.addTo(map);
        }
      });

      L.control.layers(null, overlays, { collapsed: false }).addTo(map);
    })();
  </script>
</body>

</html>
"#;

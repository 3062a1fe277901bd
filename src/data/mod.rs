//! Road network model and ingestion from Overpass JSON or GeoJSON files.

mod demo;

pub use demo::generate_demo_city;

use crate::geo::{Bounds, GeoPoint};
use crate::{Error, Result};
use geojson::{GeoJson, Geometry, Value};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// OSM way id or a sequential id for sources without one
pub type RoadId = i64;

/// A single road polyline
#[derive(Clone, Debug)]
pub struct Road {
    pub id: RoadId,
    /// Highway class tag, e.g. "motorway", "residential"
    pub class: String,
    pub name: String,
    pub points: Vec<GeoPoint>,
    /// First and last coordinate coincide
    pub closed: bool,
}

impl Road {
    pub fn new(
        id: RoadId,
        class: impl Into<String>,
        name: impl Into<String>,
        points: Vec<GeoPoint>,
    ) -> Self {
        let closed = points.len() >= 2 && points.first() == points.last();
        Self {
            id,
            class: class.into(),
            name: name.into(),
            points,
            closed,
        }
    }
}

/// A loaded dataset. Replaced wholesale on every load.
#[derive(Clone, Debug, Default)]
pub struct RoadNetwork {
    roads: Vec<Road>,
    bounds: Option<Bounds>,
    label: Option<String>,
    /// Opaque administrative area id from the fetch layer, passed through untouched
    area_id: Option<u64>,
}

impl RoadNetwork {
    pub fn new(roads: Vec<Road>, label: Option<String>) -> Self {
        let bounds = roads
            .iter()
            .filter_map(|r| Bounds::from_points(&r.points))
            .reduce(Bounds::union);
        Self {
            roads,
            bounds,
            label,
            area_id: None,
        }
    }

    pub fn with_area_id(mut self, area_id: u64) -> Self {
        self.area_id = Some(area_id);
        self
    }

    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    /// `None` when the network has no coordinates at all
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn area_id(&self) -> Option<u64> {
        self.area_id
    }

    pub fn total_points(&self) -> usize {
        self.roads.iter().map(|r| r.points.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }
}

/// Load a road network from an Overpass JSON or GeoJSON file
pub fn load_file(path: &Path) -> Result<RoadNetwork> {
    let content = fs::read_to_string(path)?;
    let roads = parse_road_data(&content)?;
    if roads.is_empty() {
        return Err(Error::EmptyNetwork);
    }

    let label = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned());
    let network = RoadNetwork::new(roads, label);
    tracing::info!(
        path = %path.display(),
        roads = network.roads().len(),
        points = network.total_points(),
        "loaded road network"
    );
    Ok(network)
}

/// Top-level shape shared by both formats; only Overpass has `elements`
#[derive(Deserialize)]
struct RoadDocument {
    #[serde(default)]
    elements: Option<Vec<OverpassElement>>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

#[derive(Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    kind: String,
    id: i64,
    #[serde(default)]
    tags: HashMap<String, String>,
    #[serde(default)]
    geometry: Option<Vec<Option<OverpassPoint>>>,
}

#[derive(Deserialize)]
struct OverpassPoint {
    lat: f64,
    lon: f64,
}

/// Parse road data, detecting the format from the document shape
pub fn parse_road_data(content: &str) -> Result<Vec<Road>> {
    let mut buf = content.as_bytes().to_vec();
    let doc: RoadDocument = simd_json::serde::from_slice(&mut buf)?;

    match (doc.elements, doc.kind.as_deref()) {
        (Some(elements), _) => Ok(roads_from_overpass(elements)),
        (None, Some("FeatureCollection" | "Feature" | "LineString" | "MultiLineString")) => {
            parse_geojson(content)
        }
        (None, kind) => Err(Error::UnrecognizedFormat(
            kind.unwrap_or("missing type").to_string(),
        )),
    }
}

fn roads_from_overpass(elements: Vec<OverpassElement>) -> Vec<Road> {
    let mut skipped = 0usize;
    let roads: Vec<Road> = elements
        .into_iter()
        .filter(|el| el.kind == "way")
        .filter_map(|mut el| {
            if el.tags.get("area").map(String::as_str) == Some("yes") {
                skipped += 1;
                return None;
            }
            let geometry = el.geometry.take()?;
            let points: Vec<GeoPoint> = geometry
                .into_iter()
                .flatten()
                .map(|p| GeoPoint::new(p.lat, p.lon))
                .collect();
            let class = el
                .tags
                .remove("highway")
                .unwrap_or_else(|| "unclassified".to_string());
            let name = el
                .tags
                .remove("name")
                .unwrap_or_else(|| "Unnamed Road".to_string());
            Some(Road::new(el.id, class, name, points))
        })
        .collect();

    if skipped > 0 {
        tracing::debug!(skipped, "skipped area ways");
    }
    roads
}

/// Parse GeoJSON line features into roads. Coordinates are `[lon, lat]`.
pub fn parse_geojson(content: &str) -> Result<Vec<Road>> {
    let geojson: GeoJson = content.parse()?;
    let mut roads = Vec::new();

    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                push_feature_roads(feature, &mut roads);
            }
        }
        GeoJson::Feature(f) => push_feature_roads(&f, &mut roads),
        GeoJson::Geometry(geometry) => {
            let next_id = roads.len() as RoadId;
            push_geometry_roads(&geometry, next_id, "unclassified", "Unnamed Road", &mut roads);
        }
    }

    Ok(roads)
}

fn push_feature_roads(feature: &geojson::Feature, roads: &mut Vec<Road>) {
    let Some(ref geometry) = feature.geometry else {
        return;
    };
    let props = feature.properties.as_ref();

    let class = props
        .and_then(|p| p.get("highway"))
        .and_then(|v| v.as_str())
        .unwrap_or("unclassified");
    let name = props
        .and_then(|p| p.get("name"))
        .and_then(|v| v.as_str())
        .unwrap_or("Unnamed Road");

    // Prefer the feature id, then an "id"/"osm_id" property, then position
    let id = match &feature.id {
        Some(geojson::feature::Id::Number(n)) => n.as_i64(),
        Some(geojson::feature::Id::String(s)) => s.trim_start_matches("way/").parse().ok(),
        None => None,
    }
    .or_else(|| {
        props
            .and_then(|p| p.get("id").or_else(|| p.get("osm_id")))
            .and_then(|v| v.as_i64())
    })
    .unwrap_or(roads.len() as RoadId);

    push_geometry_roads(geometry, id, class, name, roads);
}

fn push_geometry_roads(
    geometry: &Geometry,
    id: RoadId,
    class: &str,
    name: &str,
    roads: &mut Vec<Road>,
) {
    let to_points = |coords: &Vec<Vec<f64>>| -> Vec<GeoPoint> {
        coords
            .iter()
            .filter(|c| c.len() >= 2)
            .map(|c| GeoPoint::new(c[1], c[0]))
            .collect()
    };

    match &geometry.value {
        Value::LineString(coords) => {
            roads.push(Road::new(id, class, name, to_points(coords)));
        }
        Value::MultiLineString(lines) => {
            for coords in lines {
                roads.push(Road::new(id, class, name, to_points(coords)));
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                push_geometry_roads(g, id, class, name, roads);
            }
        }
        _ => {}
    }
}

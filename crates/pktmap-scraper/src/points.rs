//! Point extraction from decoded geodata payloads.

use serde_json::{Map, Value};

/// The payload shapes the node-map endpoint has been observed to return.
/// Classified once, up front, instead of scattering shape checks through the
/// extraction logic.
#[derive(Debug)]
pub enum PointSource<'a> {
    /// GeoJSON-style feature collection.
    FeatureCollection(&'a [Value]),
    /// Flat list of records under a generic `data` key.
    FlatList(&'a [Value]),
    Unrecognized,
}

/// A point record pulled out of the payload, not yet vetted as a station.
#[derive(Debug, Clone)]
pub struct RawPoint {
    /// `(lat, lng)`. GeoJSON stores `[lng, lat]`; the pair is reordered on
    /// extraction. `None` for flat-list rows, which carry no geometry.
    pub coords: Option<(f64, f64)>,
    pub properties: Map<String, Value>,
    /// The full source feature, kept for fields that live outside
    /// `properties` (e.g. `displayText`).
    pub feature: Value,
}

#[must_use]
pub fn classify(payload: &Value) -> PointSource<'_> {
    if let Some(obj) = payload.as_object() {
        if obj.get("type").and_then(Value::as_str) == Some("FeatureCollection") {
            if let Some(features) = obj.get("features").and_then(Value::as_array) {
                return PointSource::FeatureCollection(features);
            }
        }
        if let Some(rows) = obj.get("data").and_then(Value::as_array) {
            return PointSource::FlatList(rows);
        }
    }
    PointSource::Unrecognized
}

/// Extract point records from a decoded payload.
///
/// Non-point or malformed features are skipped, and unrecognized payload
/// shapes yield an empty vector — this never fails.
#[must_use]
pub fn extract_points(payload: &Value) -> Vec<RawPoint> {
    match classify(payload) {
        PointSource::FeatureCollection(features) => {
            features.iter().filter_map(feature_to_point).collect()
        }
        PointSource::FlatList(rows) => rows
            .iter()
            .filter_map(|row| {
                row.as_object().map(|props| RawPoint {
                    coords: None,
                    properties: props.clone(),
                    feature: row.clone(),
                })
            })
            .collect(),
        PointSource::Unrecognized => Vec::new(),
    }
}

fn feature_to_point(feature: &Value) -> Option<RawPoint> {
    let geometry = feature.get("geometry")?;
    let geom_type = geometry.get("type").and_then(Value::as_str)?;
    if !geom_type.eq_ignore_ascii_case("point") {
        return None;
    }
    let coords = geometry.get("coordinates").and_then(Value::as_array)?;
    let lng = coords.first().and_then(Value::as_f64)?;
    let lat = coords.get(1).and_then(Value::as_f64)?;
    let properties = feature
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    Some(RawPoint {
        coords: Some((lat, lng)),
        properties,
        feature: feature.clone(),
    })
}

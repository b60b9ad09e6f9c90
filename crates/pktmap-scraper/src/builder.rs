//! Catalog item construction from raw map points.

use std::collections::HashSet;

use regex::Regex;
use serde_json::{Map, Value};

use pktmap_core::{make_item_key, CatalogItem, ItemKey, StationKind, StationStatus};

use crate::channels::{extract_channels, primary_channel, strip_html};
use crate::points::RawPoint;

/// Minimum surviving catalog items for a run to overwrite the snapshot.
/// Guards against silently replacing a good catalog with a near-empty one
/// after an upstream format change.
pub const MIN_CATALOG_ITEMS: usize = 10;

/// Protocol label applied to every catalog entry.
const MODE_LABEL: &str = "AX.25";

/// Callsigns used by placeholder entries in earlier hand-maintained datasets.
/// A live entry matching one is suspicious but not impossible, so it only
/// warns.
pub const PLACEHOLDER_CALLSIGNS: [&str; 3] = ["VE3BBS", "W1NODE", "VE3YLO-7"];

/// Build catalog items from extracted points.
///
/// Points without a usable numeric coordinate pair or without a plausible
/// callsign (a run of at least three alphanumerics) are silently dropped.
/// Ids are assigned sequentially in processing order; the result is then
/// de-duplicated catalog-wide on upper-cased callsign, coordinates rounded
/// to five decimal places, and kind — first occurrence wins.
#[must_use]
pub fn build_items(points: &[RawPoint]) -> Vec<CatalogItem> {
    let callsign_re = Regex::new(r"[A-Z0-9]{3,}").expect("valid regex");

    let mut candidates: Vec<CatalogItem> = Vec::new();
    let mut next_id: u32 = 1;

    for point in points {
        let Some((lat, lng)) = resolve_coords(point) else {
            continue;
        };

        let callsign = callsign_candidate(point);
        if !callsign_re.is_match(&callsign.to_uppercase()) {
            continue;
        }

        let display_text = point
            .feature
            .get("displayText")
            .or_else(|| point.feature.get("display"))
            .and_then(Value::as_str)
            .unwrap_or("");
        let lowered = display_text.to_lowercase();

        let kind = if lowered.contains("bbs") || lowered.contains("mailbox") {
            StationKind::Bbs
        } else {
            StationKind::Node
        };
        // "Age:" is the upstream map's freshness marker. Weak heuristic tied
        // to that one text format; anything without it stays unknown.
        let status = if lowered.contains("age:") {
            StationStatus::Online
        } else {
            StationStatus::Unknown
        };

        let channels = extract_channels(display_text);
        let (freq, baud) = primary_channel(&channels);

        candidates.push(CatalogItem {
            id: next_id,
            kind,
            callsign: callsign.clone(),
            display_name: callsign,
            location: String::new(),
            country: String::new(),
            lat,
            lng,
            freq,
            baud,
            channels,
            mode: MODE_LABEL.to_string(),
            status,
            notes: strip_html(display_text),
        });
        next_id += 1;
    }

    let mut seen: HashSet<ItemKey> = HashSet::new();
    let items: Vec<CatalogItem> = candidates
        .into_iter()
        .filter(|it| seen.insert(make_item_key(&it.callsign, it.lat, it.lng, it.kind)))
        .collect();

    for item in &items {
        if PLACEHOLDER_CALLSIGNS.contains(&item.callsign.to_uppercase().as_str()) {
            tracing::warn!(
                callsign = %item.callsign,
                "catalog entry matches a historical placeholder callsign"
            );
        }
    }

    items
}

/// Latitude/longitude from the point's own geometry, falling back to named
/// property fields.
fn resolve_coords(point: &RawPoint) -> Option<(f64, f64)> {
    let lat = point
        .coords
        .map(|(lat, _)| lat)
        .or_else(|| pick_number(&point.properties, &["lat", "latitude"]))?;
    let lng = point
        .coords
        .map(|(_, lng)| lng)
        .or_else(|| pick_number(&point.properties, &["lng", "lon", "longitude"]))?;
    Some((lat, lng))
}

/// Callsign candidate: the `title` property, else the raw feature's `node` or
/// `callsign` field.
fn callsign_candidate(point: &RawPoint) -> String {
    let from_props = pick_string(&point.properties, &["title"]);
    if !from_props.is_empty() {
        return from_props;
    }
    point
        .feature
        .as_object()
        .map(|obj| pick_string(obj, &["node", "callsign"]))
        .unwrap_or_default()
}

fn pick_string(props: &Map<String, Value>, keys: &[&str]) -> String {
    for key in keys {
        match props.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return s.trim().to_string(),
            Some(Value::Number(n)) => return n.to_string(),
            _ => {}
        }
    }
    String::new()
}

fn pick_number(props: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| props.get(*k).and_then(as_float))
}

/// Numeric coercion: JSON numbers and numeric strings, NaN rejected.
fn as_float(v: &Value) -> Option<f64> {
    let parsed = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (!parsed.is_nan()).then_some(parsed)
}

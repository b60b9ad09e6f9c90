//! Domain types for the packet-radio node catalog.

use serde::{Deserialize, Serialize};

/// One frequency+baud pairing mined from a node's free-text description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRecord {
    /// Frequency in MHz: decimal string, at most six fractional digits,
    /// trailing zeros trimmed. Always within the plausible band when emitted.
    pub freq: String,
    /// Baud rate digits; empty when the description names no rate.
    pub baud: String,
    /// The source text span that produced this record.
    pub raw: String,
}

/// Station classification derived from the description text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationKind {
    Node,
    Bbs,
}

impl StationKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StationKind::Node => "node",
            StationKind::Bbs => "bbs",
        }
    }
}

impl std::fmt::Display for StationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Freshness of a station entry as reported by the upstream map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationStatus {
    Online,
    Unknown,
}

impl StationStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StationStatus::Online => "online",
            StationStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for StationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node or BBS entry in the generated catalog.
///
/// Rebuilt from scratch on every run; `id` is sequential and stable only
/// within one generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: u32,
    pub kind: StationKind,
    pub callsign: String,
    pub display_name: String,
    /// No location string exists in the upstream GeoJSON; kept blank so the
    /// map UI's record shape stays stable.
    pub location: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    /// Best-effort primary frequency/baud, picked from `channels`.
    pub freq: String,
    pub baud: String,
    pub channels: Vec<ChannelRecord>,
    pub mode: String,
    pub status: StationStatus,
    /// HTML-stripped description text.
    pub notes: String,
}

/// Catalog-wide dedup key: upper-cased callsign, coordinates rounded to five
/// decimal places, and kind. First occurrence wins.
pub type ItemKey = (String, i64, i64, StationKind);

#[must_use]
pub fn make_item_key(callsign: &str, lat: f64, lng: f64, kind: StationKind) -> ItemKey {
    (callsign.to_uppercase(), round5(lat), round5(lng), kind)
}

/// Round to 5 decimal places, returned as an integer so the key is `Eq`/`Hash`.
#[allow(clippy::cast_possible_truncation)]
fn round5(v: f64) -> i64 {
    (v * 100_000.0).round() as i64
}

//! Catalog module generation.
//!
//! Renders the catalog into the `packet-data.js` module consumed by the map
//! UI, and preserves the hand-curated reference-frequency section that
//! follows the generated items in a prior output, so regenerating the
//! machine-derived portion never destroys curated content.

use regex::Regex;

use pktmap_core::{CatalogItem, ChannelRecord, StationKind};

/// Opening line of the generated item list.
const ITEMS_HEADER: &str = "const packetNodeData = [";

/// Start of the hand-curated section in a previously generated module.
const CURATED_START_MARKER: &str = "const packetCommonFrequencies = [";
/// Known marker the curated section must run through to be trusted.
const CURATED_END_MARKER: &str = "function normalizePacketItem(";

/// Render the catalog into the module source text.
///
/// `previous` is the prior module content, if any; its curated tail section
/// is carried over verbatim when its markers are found, otherwise a minimal
/// default tail is emitted.
#[must_use]
pub fn render_packet_data(
    items: &[CatalogItem],
    previous: Option<&str>,
    source_url: &str,
    snapshot_date: &str,
) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("// Packet Radio dataset (nodes + BBS) and helpers".to_string());
    lines.push(format!("// Source: {source_url}"));
    lines.push(format!("// Snapshot date: {snapshot_date}"));
    lines.push("// NOTE: This file is generated by pktmap-cli fetch".to_string());
    lines.push(String::new());
    lines.push("// Type values: 'node' | 'bbs'".to_string());
    lines.push(ITEMS_HEADER.to_string());
    for item in items {
        lines.push("  {".to_string());
        lines.push(format!("    id: {},", item.id));
        lines.push(format!("    type: '{}',", js_escape(item.kind.as_str())));
        lines.push(format!("    callsign: '{}',", js_escape(&item.callsign)));
        lines.push(format!("    name: '{}',", js_escape(&item.display_name)));
        lines.push(format!("    location: '{}',", js_escape(&item.location)));
        lines.push(format!("    country: '{}',", js_escape(&item.country)));
        lines.push(format!("    lat: {},", item.lat));
        lines.push(format!("    lng: {},", item.lng));
        lines.push(format!("    freq: '{}',", js_escape(&item.freq)));
        lines.push(format!("    baud: '{}',", js_escape(&item.baud)));
        if item.channels.is_empty() {
            lines.push("    channels: [],".to_string());
        } else {
            lines.push("    channels: [".to_string());
            for ch in &item.channels {
                lines.push(format!(
                    "      {{ freq: '{}', baud: '{}', raw: '{}' }},",
                    js_escape(&ch.freq),
                    js_escape(&ch.baud),
                    js_escape(&ch.raw)
                ));
            }
            lines.push("    ],".to_string());
        }
        lines.push(format!("    mode: '{}',", js_escape(&item.mode)));
        lines.push(format!("    status: '{}',", js_escape(item.status.as_str())));
        lines.push(format!("    notes: '{}'", js_escape(&item.notes)));
        lines.push("  },".to_string());
    }
    lines.push("];\n".to_string());

    match previous.and_then(curated_tail_from) {
        Some(tail) => lines.push(tail.to_string()),
        None => lines.push(default_curated_tail()),
    }

    lines.join("\n")
}

/// A record re-read from a generated module's item section.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedItem {
    pub callsign: String,
    pub kind: StationKind,
    pub lat: f64,
    pub lng: f64,
    pub channels: Vec<ChannelRecord>,
}

/// Re-parse the machine-generated item section of a module produced by
/// [`render_packet_data`]. Used to sanity-check a previous snapshot; emission
/// followed by re-parsing is lossless for the identity fields.
#[must_use]
pub fn parse_generated_items(output: &str) -> Vec<ParsedItem> {
    let Some(start) = output.find(ITEMS_HEADER) else {
        return Vec::new();
    };
    let channel_re = Regex::new(
        r"\{ freq: '((?:\\.|[^'\\])*)', baud: '((?:\\.|[^'\\])*)', raw: '((?:\\.|[^'\\])*)' \}",
    )
    .expect("valid regex");

    let mut items: Vec<ParsedItem> = Vec::new();
    let mut current: Option<PartialItem> = None;

    for line in output[start..].lines() {
        let trimmed = line.trim();
        if trimmed == "];" {
            break;
        }
        if trimmed == "{" {
            current = Some(PartialItem::default());
            continue;
        }
        if trimmed == "}," {
            if let Some(parsed) = current.take().and_then(PartialItem::finish) {
                items.push(parsed);
            }
            continue;
        }
        let Some(partial) = current.as_mut() else {
            continue;
        };
        if let Some(value) = quoted_value(trimmed, "callsign") {
            partial.callsign = Some(value);
        } else if let Some(value) = quoted_value(trimmed, "type") {
            partial.kind = match value.as_str() {
                "node" => Some(StationKind::Node),
                "bbs" => Some(StationKind::Bbs),
                _ => None,
            };
        } else if let Some(value) = numeric_value(trimmed, "lat") {
            partial.lat = Some(value);
        } else if let Some(value) = numeric_value(trimmed, "lng") {
            partial.lng = Some(value);
        } else if let Some(caps) = channel_re.captures(trimmed) {
            partial.channels.push(ChannelRecord {
                freq: js_unescape(&caps[1]),
                baud: js_unescape(&caps[2]),
                raw: js_unescape(&caps[3]),
            });
        }
    }

    items
}

#[derive(Debug, Default)]
struct PartialItem {
    callsign: Option<String>,
    kind: Option<StationKind>,
    lat: Option<f64>,
    lng: Option<f64>,
    channels: Vec<ChannelRecord>,
}

impl PartialItem {
    fn finish(self) -> Option<ParsedItem> {
        Some(ParsedItem {
            callsign: self.callsign?,
            kind: self.kind?,
            lat: self.lat?,
            lng: self.lng?,
            channels: self.channels,
        })
    }
}

/// Escape a string for embedding in a single-quoted JS literal: backslashes,
/// the quote delimiter, backticks, and the template-interpolation marker.
fn js_escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

fn js_unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn quoted_value(line: &str, key: &str) -> Option<String> {
    let rest = line.strip_prefix(key)?.strip_prefix(": '")?;
    let rest = rest
        .strip_suffix("',")
        .or_else(|| rest.strip_suffix('\''))?;
    Some(js_unescape(rest))
}

fn numeric_value(line: &str, key: &str) -> Option<f64> {
    let rest = line.strip_prefix(key)?.strip_prefix(": ")?;
    rest.trim_end_matches(',').parse().ok()
}

/// Locate the curated section in a previous output. The start marker alone is
/// not trusted: the section must run through the known end marker, otherwise
/// a truncated file would be carried forward.
fn curated_tail_from(previous: &str) -> Option<&str> {
    let start = previous.find(CURATED_START_MARKER)?;
    let tail = &previous[start..];
    tail.contains(CURATED_END_MARKER).then_some(tail)
}

/// Starter curated section used when no prior output is available.
fn default_curated_tail() -> String {
    [
        "// Common packet-related frequencies (starter set; always verify local bandplan)",
        "const packetCommonFrequencies = [",
        "  { band: '2m', usage: 'Packet (general / node)', freq: '145.010', notes: 'Very common in many regions; confirm your local plan.' },",
        "  { band: '2m', usage: 'Packet (alternate)', freq: '145.030', notes: 'Alternate packet frequency in some areas.' },",
        "  { band: '2m', usage: 'BBS / mailbox (example)', freq: '145.050', notes: 'Often region-specific; confirm locally.' },",
        "  { band: '2m', usage: 'APRS', freq: '144.390', notes: 'North America APRS. (144.800 in much of the rest of the world.)' },",
        "  { band: '70cm', usage: 'Packet (general / node)', freq: '445.925', notes: 'Common 70cm packet channel in some plans.' },",
        "  { band: 'HF', usage: 'Winlink (example)', freq: 'varies', notes: 'Winlink uses multiple HF/VHF channels; see local channel lists.' }",
        "];\n",
        "function normalizePacketItem(raw) { return raw; }",
        "function validatePacketItem(item) { return { ok: true }; }",
        "function getPacketNodesInRadius(centerLat, centerLng, radiusKm, nodes = packetNodeData) { return nodes; }",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pktmap_core::StationStatus;

    fn item(id: u32, callsign: &str, kind: StationKind, lat: f64, lng: f64) -> CatalogItem {
        CatalogItem {
            id,
            kind,
            callsign: callsign.to_string(),
            display_name: callsign.to_string(),
            location: String::new(),
            country: String::new(),
            lat,
            lng,
            freq: "144.95".to_string(),
            baud: "1200".to_string(),
            channels: vec![ChannelRecord {
                freq: "144.95".to_string(),
                baud: "1200".to_string(),
                raw: "144.950mhz".to_string(),
            }],
            mode: "AX.25".to_string(),
            status: StationStatus::Unknown,
            notes: "Port 1: 144.950MHz".to_string(),
        }
    }

    #[test]
    fn escapes_js_special_characters() {
        assert_eq!(js_escape(r"back\slash"), r"back\\slash");
        assert_eq!(js_escape("it's"), r"it\'s");
        assert_eq!(js_escape("`tick` ${x}"), r"\`tick\` \${x}");
        assert_eq!(js_unescape(&js_escape(r"it's a `mix` \ ${y}")), r"it's a `mix` \ ${y}");
    }

    #[test]
    fn renders_items_with_channels() {
        let output = render_packet_data(
            &[item(1, "GB7ABC", StationKind::Node, 51.5, -0.125)],
            None,
            "https://example.org/map.html",
            "2026-08-05",
        );
        assert!(output.contains("// Source: https://example.org/map.html"));
        assert!(output.contains("// Snapshot date: 2026-08-05"));
        assert!(output.contains("    callsign: 'GB7ABC',"));
        assert!(output.contains("      { freq: '144.95', baud: '1200', raw: '144.950mhz' },"));
        assert!(output.contains("const packetCommonFrequencies"), "default tail present");
    }

    #[test]
    fn empty_channel_list_renders_as_empty_array() {
        let mut it = item(1, "GB7ABC", StationKind::Node, 51.5, -0.125);
        it.channels.clear();
        let output = render_packet_data(&[it], None, "https://example.org", "2026-08-05");
        assert!(output.contains("    channels: [],"));
    }

    #[test]
    fn preserves_curated_tail_from_previous_output() {
        let previous = "\
// old header\n\
const packetNodeData = [\n\
];\n\
\n\
// Hand-tuned local table\n\
const packetCommonFrequencies = [\n\
  { band: '2m', usage: 'Regional packet', freq: '144.850', notes: 'curated' }\n\
];\n\
\n\
function normalizePacketItem(raw) { return raw; }\n";
        let output = render_packet_data(&[], Some(previous), "https://example.org", "2026-08-05");
        assert!(output.contains("freq: '144.850'"), "curated row carried over");
        assert!(!output.contains("starter set"), "default tail must not be used");
    }

    #[test]
    fn falls_back_to_default_tail_when_marker_chain_is_broken() {
        // Start marker present but the section never reaches the end marker.
        let truncated = "const packetCommonFrequencies = [\n  { band: '2m' }\n];";
        let output = render_packet_data(&[], Some(truncated), "https://example.org", "2026-08-05");
        assert!(output.contains("starter set"));
        assert!(output.contains("function normalizePacketItem"));
    }

    #[test]
    fn round_trip_preserves_identity_fields() {
        let mut second = item(2, "GB7DEF", StationKind::Bbs, 53.25, -2.5);
        second.channels.push(ChannelRecord {
            freq: "432.5".to_string(),
            baud: String::new(),
            raw: "432.500mhz".to_string(),
        });
        second.notes = "it's a 'quoted' note with ${markers}".to_string();
        let items = vec![item(1, "GB7ABC", StationKind::Node, 51.5, -0.125), second];

        let output = render_packet_data(&items, None, "https://example.org", "2026-08-05");
        let parsed = parse_generated_items(&output);

        assert_eq!(parsed.len(), items.len());
        for (parsed, original) in parsed.iter().zip(&items) {
            assert_eq!(parsed.callsign, original.callsign);
            assert_eq!(parsed.kind, original.kind);
            assert!((parsed.lat - original.lat).abs() < 1e-9);
            assert!((parsed.lng - original.lng).abs() < 1e-9);
            assert_eq!(parsed.channels, original.channels);
        }
    }

    #[test]
    fn round_trip_survives_escaped_callsigns() {
        let mut odd = item(1, "GB7'QUOTE", StationKind::Node, 51.5, -0.125);
        odd.display_name = odd.callsign.clone();
        let output = render_packet_data(&[odd], None, "https://example.org", "2026-08-05");
        let parsed = parse_generated_items(&output);
        assert_eq!(parsed[0].callsign, "GB7'QUOTE");
    }

    #[test]
    fn parse_returns_nothing_for_foreign_text() {
        assert!(parse_generated_items("not a module").is_empty());
        assert!(parse_generated_items("").is_empty());
    }
}

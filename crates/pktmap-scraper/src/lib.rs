//! Snapshot pipeline for the packet-radio node map.
//!
//! Stages: resolve candidate data endpoints from the map page markup, probe
//! them for point features, mine each node's free text for channels, build
//! the de-duplicated catalog, and render the catalog module.

pub mod builder;
pub mod channels;
pub mod client;
pub mod discover;
pub mod emit;
pub mod error;
pub mod points;
pub mod probe;

pub use builder::{build_items, MIN_CATALOG_ITEMS};
pub use channels::{extract_channels, primary_channel};
pub use client::MapClient;
pub use emit::{parse_generated_items, render_packet_data};
pub use error::ScrapeError;
pub use points::{extract_points, PointSource, RawPoint};
pub use probe::{probe_endpoints, MIN_USABLE_POINTS};

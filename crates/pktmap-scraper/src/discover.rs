//! Endpoint discovery over already-fetched map markup and script assets.
//!
//! Pure pattern matching — nothing here touches the network. Every function
//! returns an empty collection when nothing matches.

use regex::Regex;

/// Call-style patterns preceding a quoted string, used to bias toward
/// endpoint-looking URLs specifically.
const ENDPOINT_CALL_RE: &str = r#"(?i)(?:fetch\(|XMLHttpRequest\(|open\(|axios\.|\$\.get\(|\$\.getJSON\(|\$\.ajax\(|getJSON\()\s*[\(\{\s]*["']([^"']+)"#;

/// Miscellaneous URLs listed in a report are capped at this count.
const MAX_REPORT_URLS: usize = 300;

/// Resolve a possibly relative URL against the configured base.
///
/// Absolute URLs pass through untouched, protocol-relative ones get `https:`,
/// everything else is joined to the base.
#[must_use]
pub fn absolutize(base: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    if let Some(rest) = url.strip_prefix("//") {
        return format!("https://{rest}");
    }
    format!("{}/{}", base.trim_end_matches('/'), url.trim_start_matches('/'))
}

/// The host component of a base URL, used to filter discovered URLs.
#[must_use]
pub fn host_of(base: &str) -> &str {
    let without_scheme = base.split_once("://").map_or(base, |(_, rest)| rest);
    without_scheme
        .split(['/', '?'])
        .next()
        .unwrap_or(without_scheme)
}

/// `<script … src="…">` values, absolutized, sorted, deduplicated.
#[must_use]
pub fn extract_script_srcs(html: &str, base: &str) -> Vec<String> {
    let re = Regex::new(r#"(?i)<script[^>]+src="([^"]+)""#).expect("valid regex");
    let mut srcs: Vec<String> = re
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| absolutize(base, m.as_str()))
        .collect();
    srcs.sort();
    srcs.dedup();
    srcs
}

/// Quoted first arguments of fetch/XHR-style calls found in HTML or JS text.
/// Matches are returned raw; callers absolutize.
#[must_use]
pub fn find_endpoint_calls(text: &str) -> Vec<String> {
    let re = Regex::new(ENDPOINT_CALL_RE).expect("valid regex");
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Literal `(https?:)?//…` substrings found in HTML or JS text.
#[must_use]
pub fn find_literal_urls(text: &str) -> Vec<String> {
    let re = Regex::new(r#"(?i)(?:https?:)?//[^"'\s>]+"#).expect("valid regex");
    re.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Data-endpoint references in the map HTML, absolutized, with the known-good
/// endpoint always appended so the pipeline works even when the page stops
/// referencing the API inline. Sorted and deduplicated.
#[must_use]
pub fn find_data_urls(html: &str, base: &str, known_good: &str) -> Vec<String> {
    let re = Regex::new(r#"(?i)api/nodedata/geojson\?[^"'\s>]+"#).expect("valid regex");
    let mut urls: Vec<String> = re
        .find_iter(html)
        .map(|m| absolutize(base, m.as_str()))
        .collect();
    if !known_good.is_empty() {
        urls.push(known_good.to_string());
    }
    urls.sort();
    urls.dedup();
    urls
}

/// What endpoint discovery found for one map page. `render` produces the
/// human-readable report written next to the generated catalog.
#[derive(Debug, Clone)]
pub struct DiscoveryReport {
    pub map_url: String,
    /// Sorted script asset URLs referenced by the page.
    pub scripts: Vec<String>,
    /// Sorted candidate endpoints, from call-style patterns.
    pub endpoints: Vec<String>,
    /// Sorted miscellaneous URLs seen anywhere in the scanned text.
    pub urls: Vec<String>,
}

impl DiscoveryReport {
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        lines.push(format!("Map: {}", self.map_url));
        lines.push(String::new());
        lines.push("Scripts:".to_string());
        lines.extend(self.scripts.iter().map(|s| format!("  {s}")));
        lines.push(String::new());
        lines.push("Candidate endpoints (from fetch/xhr patterns):".to_string());
        lines.extend(self.endpoints.iter().map(|u| format!("  {u}")));
        lines.push(String::new());
        lines.push(format!("All URLs found in HTML/JS (first {MAX_REPORT_URLS}):"));
        lines.extend(
            self.urls
                .iter()
                .take(MAX_REPORT_URLS)
                .map(|u| format!("  {u}")),
        );
        lines.join("\n")
    }
}

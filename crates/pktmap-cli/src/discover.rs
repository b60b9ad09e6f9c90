//! `discover` subcommand: scan the map page and its script assets for data
//! endpoints and write a human-readable report.

use std::collections::BTreeSet;

use anyhow::Context;

use pktmap_core::AppConfig;
use pktmap_scraper::discover::{
    absolutize, extract_script_srcs, find_endpoint_calls, find_literal_urls, host_of,
    DiscoveryReport,
};
use pktmap_scraper::MapClient;

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let client = MapClient::new(config.request_timeout_secs, &config.user_agent)?;

    tracing::info!(url = %config.map_url, "fetching map page");
    let html = client
        .get_text(&config.map_url)
        .await
        .with_context(|| format!("failed to fetch map page {}", config.map_url))?;

    let scripts = extract_script_srcs(&html, &config.base_url);

    // BTreeSet keeps the report sorted and deduplicated as it fills.
    let mut endpoints: BTreeSet<String> = BTreeSet::new();
    let mut urls: BTreeSet<String> = BTreeSet::new();

    for script_url in &scripts {
        // One blocking fetch per asset; a failed asset is skipped, the scan
        // continues with the rest.
        match client.get_text(script_url).await {
            Ok(js) => scan_text(config, &js, &mut endpoints, &mut urls),
            Err(err) => {
                tracing::warn!(url = %script_url, error = %err, "script asset fetch failed; skipping");
            }
        }
    }
    scan_text(config, &html, &mut endpoints, &mut urls);

    let host = host_of(&config.base_url);
    let report = DiscoveryReport {
        map_url: config.map_url.clone(),
        scripts,
        endpoints: endpoints.into_iter().filter(|u| u.contains(host)).collect(),
        urls: urls.into_iter().filter(|u| u.contains(host)).collect(),
    };

    if let Some(parent) = config.report_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&config.report_path, report.render())
        .with_context(|| format!("failed to write {}", config.report_path.display()))?;

    tracing::info!(
        path = %config.report_path.display(),
        scripts = report.scripts.len(),
        endpoints = report.endpoints.len(),
        urls = report.urls.len(),
        "wrote endpoint report"
    );
    Ok(())
}

fn scan_text(
    config: &AppConfig,
    text: &str,
    endpoints: &mut BTreeSet<String>,
    urls: &mut BTreeSet<String>,
) {
    for found in find_endpoint_calls(text) {
        endpoints.insert(absolutize(&config.base_url, &found));
    }
    for found in find_literal_urls(text) {
        urls.insert(absolutize(&config.base_url, &found));
    }
}

//! `fetch` subcommand: regenerate the packet node catalog module.

use anyhow::Context;

use pktmap_core::AppConfig;
use pktmap_scraper::discover::find_data_urls;
use pktmap_scraper::{
    build_items, probe_endpoints, render_packet_data, MapClient, ScrapeError, MIN_CATALOG_ITEMS,
};

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let client = MapClient::new(config.request_timeout_secs, &config.user_agent)?;

    tracing::info!(url = %config.map_url, "fetching map page");
    let html = client
        .get_text(&config.map_url)
        .await
        .with_context(|| format!("failed to fetch map page {}", config.map_url))?;

    let candidates = find_data_urls(&html, &config.base_url, &config.data_url);
    if candidates.is_empty() {
        return Err(ScrapeError::NoEndpointCandidates.into());
    }
    tracing::debug!(count = candidates.len(), "probing candidate endpoints");

    let (endpoint, points) = probe_endpoints(&client, &candidates).await?;
    tracing::info!(endpoint = %endpoint, points = points.len(), "extracted point features");

    let items = build_items(&points);
    if items.len() < MIN_CATALOG_ITEMS {
        return Err(ScrapeError::TooFewItems {
            count: items.len(),
            minimum: MIN_CATALOG_ITEMS,
        }
        .into());
    }

    let previous = std::fs::read_to_string(&config.out_path).ok();
    let snapshot_date = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let output = render_packet_data(&items, previous.as_deref(), &config.map_url, &snapshot_date);

    if let Some(parent) = config.out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&config.out_path, output)
        .with_context(|| format!("failed to write {}", config.out_path.display()))?;

    tracing::info!(
        path = %config.out_path.display(),
        items = items.len(),
        "wrote catalog module"
    );
    Ok(())
}

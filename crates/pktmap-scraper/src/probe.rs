//! Candidate endpoint probing.

use crate::client::MapClient;
use crate::error::ScrapeError;
use crate::points::{extract_points, RawPoint};

/// Minimum point features an endpoint must yield to be accepted as the node
/// dataset. Map pages reference several smaller JSON assets; anything below
/// this is assumed to be the wrong dataset.
pub const MIN_USABLE_POINTS: usize = 10;

/// Try each candidate endpoint in order and return the first that yields at
/// least [`MIN_USABLE_POINTS`] point features, together with its URL.
/// Remaining candidates are abandoned once one succeeds.
///
/// Per-candidate fetch or decode failures are skipped, not surfaced — the
/// next candidate is simply tried.
///
/// # Errors
///
/// Returns [`ScrapeError::NoUsableEndpoint`] when every candidate has been
/// exhausted without producing enough points.
pub async fn probe_endpoints(
    client: &MapClient,
    candidates: &[String],
) -> Result<(String, Vec<RawPoint>), ScrapeError> {
    for url in candidates {
        let payload = match client.get_json(url).await {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(url = %url, error = %err, "candidate endpoint failed; skipping");
                continue;
            }
        };
        let points = extract_points(&payload);
        if points.len() < MIN_USABLE_POINTS {
            tracing::debug!(
                url = %url,
                count = points.len(),
                "candidate endpoint yielded too few points; skipping"
            );
            continue;
        }
        tracing::info!(url = %url, points = points.len(), "using dataset");
        return Ok((url.clone(), points));
    }
    Err(ScrapeError::NoUsableEndpoint {
        tried: candidates.len(),
    })
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("JSON decode error for {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no data-endpoint candidates found in the map HTML")]
    NoEndpointCandidates,

    #[error(
        "none of {tried} candidate endpoints yielded enough point features; \
         the site may have changed its data format"
    )]
    NoUsableEndpoint { tried: usize },

    #[error("parsed too few items ({count} < {minimum}); refusing to overwrite the dataset")]
    TooFewItems { count: usize, minimum: usize },
}

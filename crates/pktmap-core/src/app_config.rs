use std::path::PathBuf;

/// Application configuration, read from `PKTMAP_*` environment variables.
///
/// Every field has a working default so a bare `pktmap-cli fetch` regenerates
/// the standard snapshot without any environment setup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// The map page whose markup is scanned for data endpoints.
    pub map_url: String,
    /// Known-good geodata endpoint, always kept in the candidate list even
    /// when HTML discovery finds nothing.
    pub data_url: String,
    /// Base URL used to resolve root-relative and protocol-relative matches;
    /// also the host filter for discovered URLs.
    pub base_url: String,
    /// Where the generated catalog module is written.
    pub out_path: PathBuf,
    /// Where the endpoint discovery report is written.
    pub report_path: PathBuf,
    pub log_level: String,
    /// Uniform per-request timeout ceiling for every network call.
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

use std::path::PathBuf;

use thiserror::Error;

use crate::app_config::AppConfig;

const DEFAULT_MAP_URL: &str =
    "https://nodes.ukpacketradio.network/packet-network-map.html?rfonly=0";
const DEFAULT_DATA_URL: &str = "https://nodes.ukpacketradio.network/api/nodedata/geojson?linkType=RF&linkType=Internet&linkType=Other&linkType=PrivateNet";
const DEFAULT_BASE_URL: &str = "https://nodes.ukpacketradio.network/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a `PKTMAP_*` value fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a `PKTMAP_*` value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing logic is decoupled from the real environment so tests can use
/// a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let map_url = or_default("PKTMAP_MAP_URL", DEFAULT_MAP_URL);
    let data_url = or_default("PKTMAP_DATA_URL", DEFAULT_DATA_URL);
    let base_url = or_default("PKTMAP_BASE_URL", DEFAULT_BASE_URL);
    let out_path = PathBuf::from(or_default(
        "PKTMAP_OUT_PATH",
        "modules/packet-radio/packet-data.js",
    ));
    let report_path = PathBuf::from(or_default(
        "PKTMAP_REPORT_PATH",
        "reports/endpoint-report.txt",
    ));
    let log_level = or_default("PKTMAP_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("PKTMAP_REQUEST_TIMEOUT_SECS", "45")?;
    let user_agent = or_default("PKTMAP_USER_AGENT", "pktmap/0.1 (packet-node-snapshot)");

    Ok(AppConfig {
        map_url,
        data_url,
        base_url,
        out_path,
        report_path,
        log_level,
        request_timeout_secs,
        user_agent,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn build_app_config_succeeds_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.map_url, DEFAULT_MAP_URL);
        assert_eq!(cfg.data_url, DEFAULT_DATA_URL);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(
            cfg.out_path.to_str().unwrap(),
            "modules/packet-radio/packet-data.js"
        );
        assert_eq!(cfg.report_path.to_str().unwrap(), "reports/endpoint-report.txt");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.request_timeout_secs, 45);
        assert_eq!(cfg.user_agent, "pktmap/0.1 (packet-node-snapshot)");
    }

    #[test]
    fn build_app_config_honours_overrides() {
        let mut map = HashMap::new();
        map.insert("PKTMAP_MAP_URL", "https://example.org/map.html");
        map.insert("PKTMAP_REQUEST_TIMEOUT_SECS", "10");
        map.insert("PKTMAP_USER_AGENT", "custom-agent/2.0");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.map_url, "https://example.org/map.html");
        assert_eq!(cfg.request_timeout_secs, 10);
        assert_eq!(cfg.user_agent, "custom-agent/2.0");
    }

    #[test]
    fn build_app_config_rejects_invalid_timeout() {
        let mut map = HashMap::new();
        map.insert("PKTMAP_REQUEST_TIMEOUT_SECS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PKTMAP_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar(PKTMAP_REQUEST_TIMEOUT_SECS), got: {result:?}"
        );
    }
}

pub mod app_config;
pub mod catalog;
pub mod config;

pub use app_config::AppConfig;
pub use catalog::{make_item_key, CatalogItem, ChannelRecord, ItemKey, StationKind, StationStatus};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};

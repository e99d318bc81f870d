use crate::domain::placement::{PlacementMode, DEFAULT_BASE_OFFSET};
use serde::Deserialize;
use std::path::PathBuf;

/// Server configuration with documented defaults; every value can be
/// overridden in `config/server.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_received_dir")]
    pub received_dir: PathBuf,
    #[serde(default = "default_created_dir")]
    pub created_dir: PathBuf,
    #[serde(default = "default_placement_mode")]
    pub placement_mode: String,
    #[serde(default = "default_base_offset")]
    pub base_offset: f64,
}

impl ServerConfig {
    pub fn placement_mode(&self) -> anyhow::Result<PlacementMode> {
        self.placement_mode
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:8444".to_string()
}

fn default_received_dir() -> PathBuf {
    PathBuf::from("received_data")
}

fn default_created_dir() -> PathBuf {
    PathBuf::from("created_maps")
}

fn default_placement_mode() -> String {
    "spread".to_string()
}

fn default_base_offset() -> f64 {
    DEFAULT_BASE_OFFSET
}

pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/server").required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_no_file_present() {
        let settings = config::Config::builder().build().unwrap();
        let config: ServerConfig = settings.try_deserialize().unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:8444");
        assert_eq!(config.received_dir, PathBuf::from("received_data"));
        assert_eq!(config.created_dir, PathBuf::from("created_maps"));
        assert_eq!(config.placement_mode().unwrap(), PlacementMode::Spread);
        assert_eq!(config.base_offset, DEFAULT_BASE_OFFSET);
    }

    #[test]
    fn test_unknown_placement_mode_rejected() {
        let config = ServerConfig {
            listen_addr: default_listen_addr(),
            received_dir: default_received_dir(),
            created_dir: default_created_dir(),
            placement_mode: "scatter".to_string(),
            base_offset: DEFAULT_BASE_OFFSET,
        };
        assert!(config.placement_mode().is_err());
    }
}

use crate::error::{MapError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "dining_map.toml";
pub const CONFIG_PATH_ENV: &str = "DINING_MAP_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub map: MapConfig,
    pub data: DataConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub title: String,
    /// [lat, lon]
    pub center: [f64; 2],
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            title: "Salzburg Dining Guide".to_string(),
            center: [47.8000, 13.0400],
            zoom: 14,
            tile_url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\" target=\"_blank\">OpenStreetMap</a> contributors".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// JSON restaurant file; the built-in dataset is used when absent
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub metrics_port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            metrics_port: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub file_prefix: String,
    pub default_directive: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            file_prefix: "dining_map.log".to_string(),
            default_directive: "dining_map=info".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            MapError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from an explicit path, `DINING_MAP_CONFIG`, or `dining_map.toml`.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => std::env::var(CONFIG_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH)),
        };
        Self::load_from(&path)
    }

    fn validate(&self) -> Result<()> {
        let [lat, lon] = self.map.center;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(MapError::Config(format!(
                "map.center out of range: [{}, {}]",
                lat, lon
            )));
        }
        if self.map.zoom > 22 {
            return Err(MapError::Config(format!(
                "map.zoom must be at most 22, got {}",
                self.map.zoom
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_center_on_salzburg() {
        let config = Config::default();
        assert_eq!(config.map.center, [47.8, 13.04]);
        assert_eq!(config.map.zoom, 14);
        assert_eq!(config.server.port, 3000);
        assert!(config.data.path.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [server]
            port = 8081

            [data]
            path = "restaurants.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.data.path, Some(PathBuf::from("restaurants.json")));
        assert_eq!(config.map.zoom, 14);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.map.title, "Salzburg Dining Guide");
    }

    #[test]
    fn test_malformed_file_is_toml_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[map\nzoom = ").unwrap();
        assert!(matches!(Config::load_from(file.path()), Err(MapError::Toml(_))));
    }

    #[test]
    fn test_out_of_range_center_rejected() {
        let err = Config::from_toml_str("[map]\ncenter = [95.0, 13.0]").unwrap_err();
        assert!(matches!(err, MapError::Config(_)));
    }
}

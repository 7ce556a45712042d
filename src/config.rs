use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

pub const MAX_FPS: u32 = 1000;

const DEFAULT_MAP_URL: &str = "https://www.google.com/maps/embed?pb=!1m14!1m12!1m3!1d24465.79273382098!2d37.6173!3d55.7558!2m3!1f0!2f0!3f0!3m2!1i1024!2i768!4f13.1!5e0!3m2!1sru!2sru!4v1715765241731";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("overlay fps must be greater than zero")]
    ZeroFps,
    #[error("overlay fps {0} exceeds the limit of {MAX_FPS}")]
    FpsTooHigh(u32),
}

fn default_http_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_port")]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: default_http_port(),
        }
    }
}

fn default_catalog_source() -> String {
    "cameras.json".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Local file path or an http(s) URL.
    #[serde(default = "default_catalog_source")]
    pub source: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: default_catalog_source(),
        }
    }
}

fn default_probe_enabled() -> bool {
    true
}

fn default_probe_timeout_ms() -> u64 {
    5000
}

fn default_trusted_hosts() -> Vec<String> {
    vec!["ivideon.com".to_string()]
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_probe_enabled")]
    pub enabled: bool,
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,
    /// Streams whose URL contains one of these substrings skip the network check.
    #[serde(default = "default_trusted_hosts")]
    pub trusted_hosts: Vec<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            enabled: default_probe_enabled(),
            timeout_ms: default_probe_timeout_ms(),
            trusted_hosts: default_trusted_hosts(),
        }
    }
}

fn default_fps() -> u32 {
    60
}

fn default_laser_trail() -> usize {
    256
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverlayConfig {
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_laser_trail")]
    pub laser_trail: usize,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            seed: None,
            laser_trail: default_laser_trail(),
        }
    }
}

fn default_map_url() -> String {
    DEFAULT_MAP_URL.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_map_url")]
    pub embed_url: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            embed_url: default_map_url(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
    #[serde(default)]
    pub map: MapConfig,
}

impl Config {
    /// Reads `config.toml` from the working directory, falling back to defaults
    /// when the file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        if !Path::new(DEFAULT_CONFIG_PATH).exists() {
            tracing::warn!(path = DEFAULT_CONFIG_PATH, "config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;

        if config.overlay.fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        if config.overlay.fps > MAX_FPS {
            return Err(ConfigError::FpsTooHigh(config.overlay.fps));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.catalog.source, "cameras.json");
        assert!(config.probe.enabled);
        assert_eq!(config.probe.timeout_ms, 5000);
        assert_eq!(config.probe.trusted_hosts, vec!["ivideon.com".to_string()]);
        assert_eq!(config.overlay.fps, 60);
        assert_eq!(config.overlay.seed, None);
        assert!(config.map.embed_url.starts_with("https://www.google.com/maps/embed"));
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::parse(
            r#"
            [http]
            port = 9000

            [probe]
            enabled = false
            trusted_hosts = ["ivideon.com", "camstreamer.com"]

            [overlay]
            seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.http.port, 9000);
        assert!(!config.probe.enabled);
        assert_eq!(config.probe.timeout_ms, 5000);
        assert_eq!(config.probe.trusted_hosts.len(), 2);
        assert_eq!(config.overlay.seed, Some(7));
        assert_eq!(config.overlay.laser_trail, 256);
    }

    #[test]
    fn test_zero_fps_rejected() {
        let err = Config::parse("[overlay]\nfps = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroFps));
    }

    #[test]
    fn test_fps_upper_bound() {
        assert_eq!(Config::parse("[overlay]\nfps = 1000\n").unwrap().overlay.fps, 1000);

        let err = Config::parse("[overlay]\nfps = 2000000000\n").unwrap_err();
        assert!(matches!(err, ConfigError::FpsTooHigh(2_000_000_000)));
        assert_eq!(err.to_string(), "overlay fps 2000000000 exceeds the limit of 1000");
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::parse("[http\nport = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}

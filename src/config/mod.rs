//! Configuration management for fanline.
//!
//! Configuration is read from `~/.config/fanline/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.
//! Output always goes to the current directory and is not configurable.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetch: FetchConfig,
    pub render: RenderConfig,
    pub server: ServerConfig,
}

/// HTTP behaviour for collection pages and feeds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds (default: 15)
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,

    /// Visit accounts in random order (default: true)
    pub shuffle: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: format!("fanline/{}", env!("CARGO_PKG_VERSION")),
            shuffle: true,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Posts per HTML page (default: 100)
    pub page_size: usize,

    /// Stylesheet href linked from every page
    pub stylesheet: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            stylesheet: "style.css".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8000,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// URL printed for the user; unspecified binds are shown as loopback.
    pub fn browse_url(&self, filename: &str) -> String {
        let host = if self.host.is_unspecified() {
            "127.0.0.1".to_string()
        } else {
            match self.host {
                IpAddr::V4(v4) => v4.to_string(),
                IpAddr::V6(v6) => format!("[{}]", v6),
            }
        };
        format!("http://{}:{}/{}", host, self.port, filename)
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path: `~/.config/fanline/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("fanline").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.page_size == 0 {
            return Err(ConfigError::Invalid("render.page_size must be at least 1".into()));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Invalid("fetch.timeout_secs must be at least 1".into()));
        }
        Ok(())
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# fanline configuration
#
# Pages and statuses.json are always written to the directory fanline
# is started from.

[fetch]
# Timeout for each request, in seconds
timeout_secs = 15

# Visit follower feeds in random order
shuffle = true

# User agent sent with every request
# user_agent = "fanline/0.1.0"

[render]
# Posts per page
page_size = 100

# Stylesheet linked from every page
stylesheet = "style.css"

[server]
# Address the local viewer listens on
host = "127.0.0.1"
port = 8000
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

//! Configuration management for zonequery using the prefer crate.
//!
//! Settings are layered, lowest priority first:
//! built-in defaults, config file, environment, command line.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::repository::util::{redact_url_password, validate_database_url};
use crate::repository::DEFAULT_MAX_CONNECTIONS;

/// Default database URL, matching a local development PostGIS.
pub const DEFAULT_DATABASE_URL: &str = "postgres://postgres@localhost/canicannabis";

/// Default bind address for the HTTP server.
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Default port used when a bind address names only a host.
pub const DEFAULT_PORT: u16 = 8000;

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Maximum pooled connections.
    pub max_connections: usize,
    /// Disable TLS for PostgreSQL connections.
    pub no_tls: bool,
    /// Address the server listens on.
    pub bind: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            no_tls: false,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl Settings {
    /// Database URL with the password masked, for logs and terminal output.
    pub fn redacted_database_url(&self) -> String {
        redact_url_password(&self.database_url)
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// PostgreSQL connection URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<usize>,
    /// Disable TLS for PostgreSQL connections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_tls: Option<bool>,
    /// Server bind address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Automatically discovers zonequery config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("zonequery").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("Ignoring config file: {}", e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            // No config file found
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;

        let mut config = Self::parse(&contents, path)?;
        config.source_path = Some(path.to_path_buf());
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, String> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        match ext {
            "toml" => toml::from_str(contents)
                .map_err(|e| format!("Failed to parse TOML config: {}", e)),
            "yaml" | "yml" => serde_yaml::from_str(contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e)),
            _ => serde_json::from_str(contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e)),
        }
    }

    /// Apply environment variable overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    ///
    /// Empty values are ignored, as are values that fail to parse.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Some(raw) = get("ZONEQUERY_MAX_CONNECTIONS") {
            match raw.trim().parse() {
                Ok(n) => self.max_connections = Some(n),
                Err(_) => tracing::warn!("Ignoring invalid ZONEQUERY_MAX_CONNECTIONS={}", raw),
            }
        }
        if let Some(raw) = get("ZONEQUERY_NO_TLS") {
            self.no_tls = Some(parse_flag(&raw));
        }
        if let Some(bind) = get("ZONEQUERY_BIND") {
            self.bind = Some(bind);
        }
        self
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref url) = self.database_url {
            settings.database_url = url.clone();
        }
        if let Some(max) = self.max_connections {
            settings.max_connections = max;
        }
        if let Some(no_tls) = self.no_tls {
            settings.no_tls = no_tls;
        }
        if let Some(ref bind) = self.bind {
            settings.bind = bind.clone();
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Options for loading settings, usually taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Database URL from the command line.
    pub database_url: Option<String>,
    /// Force TLS off.
    pub no_tls: bool,
    /// Bind address from the command line.
    pub bind: Option<String>,
}

/// Load settings from defaults, config file, environment and options.
pub async fn load_settings(options: LoadOptions) -> Result<Settings, String> {
    let config = match options.config_path {
        Some(ref path) => Config::load_from_path(path).await?,
        None => Config::load().await,
    };

    resolve_settings(config.with_env_overrides(), &options)
}

/// Merge a loaded config with command line options and validate the result.
pub fn resolve_settings(config: Config, options: &LoadOptions) -> Result<Settings, String> {
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);

    if let Some(ref url) = options.database_url {
        settings.database_url = url.clone();
    }
    if options.no_tls {
        settings.no_tls = true;
    }
    if let Some(ref bind) = options.bind {
        settings.bind = bind.clone();
    }

    validate_database_url(&settings.database_url)?;
    if settings.max_connections == 0 {
        return Err("max_connections must be at least 1".to_string());
    }

    Ok(settings)
}

/// Parse a bind address that can be:
/// - Just a port: "8000" -> 127.0.0.1:8000
/// - Just a host: "0.0.0.0" -> 0.0.0.0:8000
/// - Host and port: "0.0.0.0:8080" -> 0.0.0.0:8080
pub fn parse_bind_address(bind: &str) -> (String, u16) {
    if let Ok(port) = bind.parse::<u16>() {
        return ("127.0.0.1".to_string(), port);
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return (host.to_string(), port);
        }
    }

    (bind.to_string(), DEFAULT_PORT)
}

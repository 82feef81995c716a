//! Application configuration module
//!
//! Configuration is layered, lowest precedence first:
//!
//! 1. Built-in defaults (suitable for local development)
//! 2. An optional TOML file, whose path is read from `HUDDLE_CONFIG`
//! 3. Environment variables (`SERVER_PORT`, `DATABASE_URL`, `JWT_SECRET`, ...)
//!
//! ```toml
//! port = 8080
//! jwt_secret = "change-me"
//! media_root = "/var/lib/huddle/media"
//! media_public_url = "https://chat.example.com/media"
//! ```

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming the optional TOML config file
pub const CONFIG_PATH_ENV: &str = "HUDDLE_CONFIG";

const DEV_JWT_SECRET: &str = "huddle-dev-secret-change-in-production";

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the HTTP server listens on
    pub port: u16,
    /// PostgreSQL URL; `None` runs every store in memory
    pub database_url: Option<String>,
    /// HS256 secret for session tokens
    pub jwt_secret: String,
    /// Directory the local media store writes into
    pub media_root: PathBuf,
    /// Public base URL under which `media_root` is served
    pub media_public_url: String,
    /// Push gateway endpoint; `None` disables push notifications
    pub push_gateway_url: Option<String>,
    /// Web client origin, used for CORS and push notification links
    pub client_url: String,
    /// Title of push notifications
    pub app_name: String,
    /// Upper bound of a multipart request body
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: None,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            media_root: default_media_root(),
            media_public_url: "http://localhost:3000/media".to_string(),
            push_gateway_url: None,
            client_url: "http://localhost:5173".to_string(),
            app_name: "Huddle".to_string(),
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

fn default_media_root() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("huddle").join("media"))
        .unwrap_or_else(|| PathBuf::from("media"))
}

/// Shape of the TOML config file; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    port: Option<u16>,
    database_url: Option<String>,
    jwt_secret: Option<String>,
    media_root: Option<PathBuf>,
    media_public_url: Option<String>,
    push_gateway_url: Option<String>,
    client_url: Option<String>,
    app_name: Option<String>,
    max_upload_bytes: Option<usize>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load defaults, then the TOML file named by `HUDDLE_CONFIG`, then the environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => {
                let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                Self::from_toml_str(&contents)?
            }
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(contents)?;
        let mut config = Self::default();
        if let Some(port) = file.port {
            config.port = port;
        }
        if file.database_url.is_some() {
            config.database_url = file.database_url;
        }
        if let Some(secret) = file.jwt_secret {
            config.jwt_secret = secret;
        }
        if let Some(root) = file.media_root {
            config.media_root = root;
        }
        if let Some(url) = file.media_public_url {
            config.media_public_url = url;
        }
        if file.push_gateway_url.is_some() {
            config.push_gateway_url = file.push_gateway_url;
        }
        if let Some(url) = file.client_url {
            config.client_url = url;
        }
        if let Some(name) = file.app_name {
            config.app_name = name;
        }
        if let Some(max) = file.max_upload_bytes {
            config.max_upload_bytes = max;
        }
        Ok(config)
    }

    /// Overlay environment variables read through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(port) = lookup("SERVER_PORT") {
            self.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "SERVER_PORT",
                value: port.clone(),
            })?;
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.database_url = Some(url);
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.jwt_secret = secret;
        }
        if let Some(root) = lookup("MEDIA_ROOT") {
            self.media_root = PathBuf::from(root);
        }
        if let Some(url) = lookup("MEDIA_PUBLIC_URL") {
            self.media_public_url = url;
        }
        if let Some(url) = lookup("PUSH_GATEWAY_URL").filter(|v| !v.is_empty()) {
            self.push_gateway_url = Some(url);
        }
        if let Some(url) = lookup("CLIENT_URL") {
            self.client_url = url;
        }
        if let Some(name) = lookup("APP_NAME") {
            self.app_name = name;
        }
        if let Some(max) = lookup("MAX_UPLOAD_BYTES") {
            self.max_upload_bytes = max.parse().map_err(|_| ConfigError::InvalidValue {
                key: "MAX_UPLOAD_BYTES",
                value: max.clone(),
            })?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingValue("jwt_secret"));
        }
        for url in [&self.media_public_url, &self.client_url]
            .into_iter()
            .chain(self.push_gateway_url.as_ref())
        {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_upload_bytes",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// Whether the built-in development secret is still in use
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = Some(url.into());
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.jwt_secret = secret.into();
        self
    }

    pub fn media_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.media_root = root.into();
        self
    }

    pub fn media_public_url(mut self, url: impl Into<String>) -> Self {
        self.config.media_public_url = url.into();
        self
    }

    pub fn push_gateway_url(mut self, url: impl Into<String>) -> Self {
        self.config.push_gateway_url = Some(url.into());
        self
    }

    pub fn client_url(mut self, url: impl Into<String>) -> Self {
        self.config.client_url = url.into();
        self
    }

    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.config.app_name = name.into();
        self
    }

    pub fn max_upload_bytes(mut self, max: usize) -> Self {
        self.config.max_upload_bytes = max;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

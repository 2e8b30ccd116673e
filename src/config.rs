use std::path::{Path, PathBuf};
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr};
use serde::Deserialize;
use tracing::debug;

use crate::booking::source::HOSTEX_API_URL;
use crate::booking::{FetchError, FetchResult, ReservationSource, SourceMode};
use crate::theme::ThemeConfig;

pub const APP_NAME: &str = "hostex-calendar";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Proxy,
    Direct,
}

/// Contents of `config.toml`. Every field is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceKind,
    /// Proxy endpoint that relays the reservation list.
    pub endpoint: String,
    pub hostex_url: String,
    pub api_key: Option<String>,
    /// Environment variable consulted before `api_key`.
    pub api_key_env: String,
    pub window_past_days: u64,
    pub window_future_days: u64,
    pub page_limit: u32,
    pub timeout_secs: u64,
    pub max_attempts: usize,
    pub theme: ThemeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceKind::Proxy,
            endpoint: "http://localhost:3000/api/bookings".to_string(),
            hostex_url: HOSTEX_API_URL.to_string(),
            api_key: None,
            api_key_env: "HOSTEX_API_KEY".to_string(),
            window_past_days: 30,
            window_future_days: 150,
            page_limit: 100,
            timeout_secs: 30,
            max_attempts: 3,
            theme: ThemeConfig::default(),
        }
    }
}

impl Config {
    /// Load `path`, or the default location when `None`. A missing default
    /// file yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match config_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !required && !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .wrap_err_with(|| format!("reading config {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .wrap_err_with(|| format!("parsing config {}", path.display()))?;
        debug!(path = %path.display(), source = ?config.source, "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .or_else(|| self.api_key.clone())
            .filter(|k| !k.trim().is_empty())
    }

    /// `file` overrides the configured network source.
    pub fn source_mode(&self, file: Option<PathBuf>) -> FetchResult<SourceMode> {
        if let Some(path) = file {
            return Ok(SourceMode::File(path));
        }
        Ok(match self.source {
            SourceKind::Proxy => SourceMode::Proxy {
                endpoint: self.endpoint.clone(),
            },
            SourceKind::Direct => SourceMode::Direct {
                url: self.hostex_url.clone(),
                api_key: self
                    .api_key()
                    .ok_or_else(|| FetchError::MissingApiKey(self.api_key_env.clone()))?,
            },
        })
    }

    pub fn build_source(&self, file: Option<PathBuf>) -> FetchResult<ReservationSource> {
        ReservationSource::builder(self.source_mode(file)?)
            .timeout(Duration::from_secs(self.timeout_secs.max(1)))
            .page_limit(self.page_limit)
            .max_attempts(self.max_attempts)
            .build()
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME).join("config.toml"))
}

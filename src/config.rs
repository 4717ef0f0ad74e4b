//! Service configuration, read from a TOML file with environment overrides.

use std::env::var;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::Deserialize;
use tracing::Level;

const DEFAULT_CONFIG_PATH: &str = "classroom.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub grouping: GroupingConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// TLS is enabled when both the certificate and key are set
    pub tls_cert: Option<PathBuf>,
    pub tls_key: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:9090".into(),
            tls_cert: None,
            tls_key: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    pub window_seconds: i64,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            window_seconds: crate::grouping::DEFAULT_WINDOW.num_seconds(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl Config {
    /// Loads the file named by `CLASSROOM_CONFIG` (or `classroom.toml`), falling back
    /// to defaults if it does not exist, then applies `DATABASE_URL` and `BIND_ADDR`.
    pub fn load() -> anyhow::Result<Self> {
        let path = var("CLASSROOM_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        let mut config = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        if let Ok(url) = var("DATABASE_URL") {
            config.database.url = Some(url);
        }
        if let Ok(bind) = var("BIND_ADDR") {
            config.server.bind = bind;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.url.is_none() {
            bail!("no database url configured; set DATABASE_URL or [database].url");
        }
        if self.grouping.window_seconds < 0 {
            bail!("grouping window must not be negative");
        }
        if self.server.tls_cert.is_some() != self.server.tls_key.is_some() {
            bail!("tls_cert and tls_key must be set together");
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> anyhow::Result<Level> {
        self.log
            .level
            .parse::<Level>()
            .map_err(|_| anyhow::anyhow!("unknown log level \"{}\"", self.log.level))
    }

    pub fn grouping_window(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.grouping.window_seconds)
    }
}

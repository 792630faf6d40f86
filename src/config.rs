use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;

pub const DEFAULT_PORT: u16 = 9999;
pub const DEFAULT_MAX_CLIENTS: usize = 10_000_000;
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Which log lines the server emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    None,
    Error,
    #[default]
    Info,
    Debug,
}

impl Verbosity {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Some(Verbosity::None),
            "error" => Some(Verbosity::Error),
            "info" => Some(Verbosity::Info),
            "debug" => Some(Verbosity::Debug),
            _ => None,
        }
    }

    pub fn level_filter(self) -> LevelFilter {
        match self {
            Verbosity::None => LevelFilter::OFF,
            Verbosity::Error => LevelFilter::ERROR,
            Verbosity::Info => LevelFilter::INFO,
            Verbosity::Debug => LevelFilter::DEBUG,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Directory served when no route matches. `None` disables static files.
    pub static_root: Option<PathBuf>,
    pub max_clients: usize,
    /// Largest accumulated request the server will buffer before dropping the client.
    pub max_body_size: usize,
    pub verbosity: Verbosity,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            static_root: None,
            max_clients: DEFAULT_MAX_CLIENTS,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            verbosity: Verbosity::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from `BEACON_CONFIG` (YAML, optional) and then
    /// applies the `BEACON_*` environment overrides on top.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("BEACON_CONFIG") {
            Ok(path) if !path.is_empty() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Applies `BEACON_*` overrides resolved through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("BEACON_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("BEACON_PORT") {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("invalid BEACON_PORT: {port:?}"))?;
        }
        if let Some(root) = lookup("BEACON_STATIC_ROOT") {
            self.static_root = if root.is_empty() {
                None
            } else {
                Some(PathBuf::from(root))
            };
        }
        if let Some(max) = lookup("BEACON_MAX_CLIENTS") {
            self.max_clients = max
                .trim()
                .parse()
                .with_context(|| format!("invalid BEACON_MAX_CLIENTS: {max:?}"))?;
        }
        if let Some(max) = lookup("BEACON_MAX_BODY_SIZE") {
            self.max_body_size = max
                .trim()
                .parse()
                .with_context(|| format!("invalid BEACON_MAX_BODY_SIZE: {max:?}"))?;
        }
        if let Some(level) = lookup("BEACON_VERBOSITY") {
            self.verbosity = Verbosity::from_str(&level)
                .with_context(|| format!("invalid BEACON_VERBOSITY: {level:?}"))?;
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

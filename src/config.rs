use std::io;
use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "mdserve.yaml";

/// Process-wide immutable configuration: where to listen and which
/// directory to expose. Set once at startup, never mutated.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Address to bind, e.g. "127.0.0.1:8080"
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// The served root: all request paths resolve relative to it
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            root: default_root(),
        }
    }
}

impl Config {
    /// Loads configuration.
    ///
    /// Reads the YAML file named by `MDSERVE_CONFIG` (falling back to
    /// `mdserve.yaml` in the working directory, which may be absent),
    /// then applies the `LISTEN` and `SERVE_ROOT` environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("MDSERVE_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut cfg = match std::fs::read_to_string(&path) {
            Ok(text) => Self::from_yaml(&text)
                .with_context(|| format!("invalid config file {path}"))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Config::default(),
            Err(e) => {
                return Err(e).context(format!("reading config file {path}"));
            }
        };

        if let Ok(listen_addr) = std::env::var("LISTEN") {
            cfg.listen_addr = listen_addr;
        }
        if let Ok(root) = std::env::var("SERVE_ROOT") {
            cfg.root = PathBuf::from(root);
        }

        Ok(cfg)
    }

    /// Parses configuration from YAML text.
    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(text).context("parsing YAML config")
    }
}

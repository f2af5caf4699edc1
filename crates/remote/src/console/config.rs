use directories::BaseDirs;
use serde::Deserialize;
use std::{env, fs, path::PathBuf, time::Duration};
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_SESSION: &str = "default";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ConsoleFileConfig {
    pub base_url: Option<String>,
    pub session: Option<String>,
    pub highlight: Option<bool>,
    pub timeout_ms: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct ConsoleConfig {
    pub base_url: String,
    pub session: String,
    pub highlight: bool,
    pub timeout: Duration,
    pub proxy: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session: DEFAULT_SESSION.to_string(),
            highlight: true,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            proxy: None,
        }
    }
}

impl ConsoleConfig {
    pub fn from_env_and_file() -> anyhow::Result<Self> {
        let mut cfg = Self::default();

        if let Some(path) = Self::config_path() {
            if path.exists() {
                let text = fs::read_to_string(&path)?;
                match toml::from_str::<ConsoleFileConfig>(&text) {
                    Ok(file_cfg) => cfg.merge_file(file_cfg),
                    Err(e) => {
                        warn!(target: "remote", "ignoring {}: {}", path.display(), e);
                    }
                }
            }
        }

        cfg.merge_env(|k| env::var(k).ok());
        url::Url::parse(&cfg.base_url)
            .map_err(|e| anyhow::anyhow!("invalid base_url '{}': {}", cfg.base_url, e))?;
        Ok(cfg)
    }

    pub fn merge_file(&mut self, file_cfg: ConsoleFileConfig) {
        if let Some(u) = file_cfg.base_url {
            self.base_url = u;
        }
        if let Some(s) = file_cfg.session {
            self.session = s;
        }
        if let Some(h) = file_cfg.highlight {
            self.highlight = h;
        }
        if let Some(t) = file_cfg.timeout_ms {
            self.timeout = Duration::from_millis(t);
        }
    }

    pub fn merge_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(u) = var("AEC_BASE_URL") {
            self.base_url = u;
        }
        if let Some(s) = var("AEC_SESSION") {
            self.session = s;
        }
        self.proxy = var("HTTPS_PROXY").or_else(|| var("HTTP_PROXY"));
    }

    fn config_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        let p = if cfg!(target_os = "windows") {
            base.home_dir().join(".aec").join("config.toml")
        } else {
            base.config_dir().join("aec").join("config.toml")
        };
        Some(p)
    }
}

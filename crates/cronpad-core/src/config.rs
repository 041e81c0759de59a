use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PROGRAM: &str = "crontab";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Upper bound on any single backing-store invocation.
pub const MAX_TIMEOUT_SECS: u64 = 300;
/// Substring of `crontab -l` stderr meaning "this user has no table yet".
pub const DEFAULT_EMPTY_MARKER: &str = "no crontab for";

/// Top-level config (cronpad.toml + CRONPAD_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CronpadConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// How to reach the backing store's command-line collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Binary invoked for both list (`-l`) and replace (`<file>`).
    #[serde(default = "default_program")]
    pub program: String,
    /// Leading arguments placed before the table flags, e.g. `program = "sudo"`
    /// with `args = ["-n", "crontab"]`.
    #[serde(default)]
    pub args: Vec<String>,
    /// When set, every invocation gets `-u <user>`.
    #[serde(default)]
    pub user: Option<String>,
    /// Per-invocation timeout in seconds. Clamped to [`MAX_TIMEOUT_SECS`].
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_empty_marker")]
    pub empty_marker: String,
    /// Directory for the transient replacement file. System temp dir when unset.
    #[serde(default)]
    pub temp_dir: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: Vec::new(),
            user: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            empty_marker: default_empty_marker(),
            temp_dir: None,
        }
    }
}

impl StoreConfig {
    pub fn effective_timeout_secs(&self) -> u64 {
        self.timeout_secs.clamp(1, MAX_TIMEOUT_SECS)
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_empty_marker() -> String {
    DEFAULT_EMPTY_MARKER.to_string()
}

impl CronpadConfig {
    /// Load config from a TOML file with CRONPAD_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. `CRONPAD_CONFIG`
    ///   3. ~/.cronpad/cronpad.toml
    ///
    /// A missing file is not an error; every key has a default. Nested keys
    /// are addressed with a double underscore, e.g. `CRONPAD_STORE__USER`.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .or_else(|| std::env::var("CRONPAD_CONFIG").ok())
            .unwrap_or_else(default_config_path);

        Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("CRONPAD_").ignore(&["CONFIG"]).split("__"))
            .extract()
            .map_err(|e| crate::error::CronpadError::Config(e.to_string()))
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.cronpad/cronpad.toml", home)
}

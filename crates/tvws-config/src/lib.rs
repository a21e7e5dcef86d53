//! Configuration for the TVWS CLI.
//!
//! TOML profiles, config path resolution, and durable token storage
//! (keyring with an env-var override). The CLI adds flag-aware wrappers
//! on top.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use tvws_api::{TlsMode, TransportConfig};
use tvws_core::TokenStore;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{profile}' in the config")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named service profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named Spectrum Service profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Service base URL (e.g., "https://tvws.example.org/api").
    pub service: String,

    /// Login email, pre-filled for `tvws login`.
    pub email: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout in seconds.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "tvws-tools", "tvws").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("tvws");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from defaults + file + environment (`TVWS_`
/// prefix, e.g. `TVWS_DEFAULT_PROFILE`).
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("TVWS_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Transport from a profile ────────────────────────────────────────

/// Build a [`TransportConfig`] from a profile. TLS verification stays on
/// system roots unless the profile opts out.
pub fn profile_transport(profile: &Profile) -> TransportConfig {
    let tls = if profile.insecure.unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    TransportConfig {
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(default_timeout())),
    }
}

/// Parse and validate a profile's service base URL.
pub fn profile_service_url(profile: &Profile) -> Result<url::Url, ConfigError> {
    profile.service.parse().map_err(|_| ConfigError::Validation {
        field: "service".into(),
        reason: format!("invalid URL: {}", profile.service),
    })
}

// ── Token storage ───────────────────────────────────────────────────

/// Env var that short-circuits the keyring, for headless use.
pub const TOKEN_ENV: &str = "TVWS_TOKEN";

const KEYRING_SERVICE: &str = "tvws";
const KEYRING_ENTRY: &str = "auth-token";

/// Durable token store backed by the system keyring under a single
/// fixed entry, one session per machine account.
///
/// `TVWS_TOKEN` in the environment overrides the keyring on load and is
/// never written back. Keyring failures degrade the session to
/// process-lifetime only; they are logged, not raised.
#[derive(Debug, Default)]
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self
    }

    fn entry() -> Option<keyring::Entry> {
        match keyring::Entry::new(KEYRING_SERVICE, KEYRING_ENTRY) {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!(%err, "keyring unavailable");
                None
            }
        }
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Option<String> {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.is_empty() {
                debug!("using token from {TOKEN_ENV}");
                return Some(token);
            }
        }
        Self::entry().and_then(|e| e.get_password().ok())
    }

    fn store(&self, token: &str) {
        if let Some(entry) = Self::entry() {
            if let Err(err) = entry.set_password(token) {
                debug!(%err, "failed to persist token to keyring");
            }
        }
    }

    fn clear(&self) {
        if let Some(entry) = Self::entry() {
            if let Err(err) = entry.delete_credential() {
                debug!(%err, "failed to clear token from keyring");
            }
        }
    }
}

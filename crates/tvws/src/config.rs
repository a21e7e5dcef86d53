//! Flag-aware bridge from the TOML config to a live session.
//!
//! `tvws-config` owns the profile types and token store; this module
//! layers the CLI flag precedence (flag > env > profile > default) on
//! top and produces the `SessionGate` every service command uses.

use tvws_api::{SpectrumClient, TlsMode, TransportConfig};
use tvws_config::{Config, KeyringTokenStore, Profile};
use tvws_core::SessionGate;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Everything a service-bound command handler needs.
pub struct Context {
    pub gate: SessionGate,
    /// Login email pre-filled from the active profile, if any.
    pub profile_email: Option<String>,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the session context from config file, profile, and CLI overrides.
pub fn build_context(global: &GlobalOpts) -> Result<Context, CliError> {
    let cfg = tvws_config::load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let profile = cfg.profiles.get(&profile_name);
    if profile.is_none() && global.profile.is_some() {
        // An explicitly requested profile must exist; the implicit
        // default may be absent when --service is given.
        return Err(CliError::ProfileNotFound { name: profile_name });
    }

    let url = service_url(global, profile)?;
    let transport = transport(global, profile);

    let client = SpectrumClient::new(url, &transport)?;
    let gate = SessionGate::new(client, Box::new(KeyringTokenStore::new()));

    Ok(Context {
        gate,
        profile_email: profile.and_then(|p| p.email.clone()),
    })
}

/// Service base URL: flag/env > profile.
fn service_url(global: &GlobalOpts, profile: Option<&Profile>) -> Result<url::Url, CliError> {
    let url_str = global
        .service
        .as_deref()
        .or_else(|| profile.map(|p| p.service.as_str()))
        .ok_or_else(|| CliError::NoService {
            path: tvws_config::config_path().display().to_string(),
        })?;

    url_str.parse().map_err(|_| CliError::Validation {
        field: "service".into(),
        reason: format!("invalid URL: {url_str}"),
    })
}

/// Transport settings: profile values with flag overrides.
fn transport(global: &GlobalOpts, profile: Option<&Profile>) -> TransportConfig {
    let mut transport = profile.map(tvws_config::profile_transport).unwrap_or_default();

    if global.insecure {
        transport.tls = TlsMode::DangerAcceptInvalid;
    }
    transport.timeout = std::time::Duration::from_secs(global.timeout);

    transport
}

//! Config subcommand handlers.

use dialoguer::Input;

use tvws_config::{KeyringTokenStore, Profile};
use tvws_core::TokenStore;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

use super::util;

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = tvws_config::config_path();
            eprintln!("tvws configuration wizard");
            eprintln!("Config path: {}\n", config_path.display());

            let mut cfg = tvws_config::load_config_or_default();

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            if cfg.profiles.contains_key(&profile_name)
                && !util::confirm(
                    &format!("Profile '{profile_name}' exists; overwrite?"),
                    global.yes,
                )?
            {
                return Ok(());
            }

            let service: String = Input::new()
                .with_prompt("Service URL")
                .default("https://tvws-geolocation-api.onrender.com".into())
                .interact_text()
                .map_err(prompt_err)?;
            service.parse::<url::Url>().map_err(|_| CliError::Validation {
                field: "service".into(),
                reason: format!("invalid URL: {service}"),
            })?;

            let email: String = Input::new()
                .with_prompt("Login email (blank to skip)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    service,
                    email: (!email.is_empty()).then_some(email),
                    ca_cert: None,
                    insecure: None,
                    timeout: None,
                },
            );
            if cfg.default_profile.is_none() {
                cfg.default_profile = Some(profile_name.clone());
            }

            tvws_config::save_config(&cfg)?;
            eprintln!("\nProfile '{profile_name}' saved. Next: tvws login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let path = tvws_config::config_path();
            println!("# {}", path.display());
            match std::fs::read_to_string(&path) {
                Ok(contents) => println!("{contents}"),
                Err(_) => println!("# (no config file; built-in defaults in effect)"),
            }
            Ok(())
        }

        // ── Set-token: store a session token without logging in ─────
        ConfigCommand::SetToken => {
            let token = rpassword::prompt_password("Session token: ")?;
            if token.is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: "must not be empty".into(),
                });
            }
            KeyringTokenStore::new().store(&token);
            if !global.quiet {
                eprintln!("Token stored in the system keyring");
            }
            Ok(())
        }
    }
}

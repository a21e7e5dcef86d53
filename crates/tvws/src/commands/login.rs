//! Session command handlers: login, logout, whoami.

use secrecy::SecretString;

use tvws_api::Identity;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

pub async fn login(ctx: &Context, args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let email = if let Some(email) = args.email.or_else(|| ctx.profile_email.clone()) {
        email
    } else {
        dialoguer::Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(|e| CliError::Io(std::io::Error::other(e)))?
    };

    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "must not be empty".into(),
        });
    }

    let identity = ctx
        .gate
        .authenticate(&email, &SecretString::from(password))
        .await?;

    if !global.quiet {
        eprintln!("Logged in as {}", describe(&identity));
    }
    Ok(())
}

pub fn logout(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.gate.deauthenticate();
    if !global.quiet {
        eprintln!("Logged out");
    }
    Ok(())
}

pub async fn whoami(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let Some(identity) = ctx.gate.current_identity().await? else {
        return Err(CliError::NotLoggedIn);
    };

    let rendered = output::render_single(
        &global.output,
        &identity,
        |i| format!("{}\nEmail: {}\nRole:  {}", i.name, i.email, i.role),
        |i| i.email.clone(),
    );
    output::print_output(&rendered, global.quiet);
    Ok(())
}

fn describe(identity: &Identity) -> String {
    format!(
        "{} <{}> ({})",
        identity.name, identity.email, identity.role
    )
}

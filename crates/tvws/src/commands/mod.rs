//! Command dispatch: bridges CLI args → core workflow → output formatting.

pub mod config_cmd;
pub mod locations;
pub mod login;
pub mod query;
pub mod states;
pub mod upload;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::Context;
use crate::error::CliError;

/// Dispatch a service-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => login::login(ctx, args, global).await,
        Command::Logout => login::logout(ctx, global),
        Command::Whoami => login::whoami(ctx, global).await,
        Command::States(args) => states::handle(ctx, args, global).await,
        Command::Locations(args) => locations::handle(ctx, args, global).await,
        Command::Query(args) => query::handle(ctx, args, global).await,
        Command::Upload(args) => upload::handle(ctx, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

//! Clap derive structures for the `tvws` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use tvws_api::NewReading;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// TV White Space spectrum queries from the command line
#[derive(Debug, Parser)]
#[command(
    name = "tvws",
    version,
    about = "Query TV White Space spectrum availability and upload measurements",
    long_about = "A client for TV White Space geolocation services.\n\n\
        Queries free/occupied UHF channels for a state, location, and time,\n\
        and uploads spectrum measurements individually or in CSV batches.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Service profile to use
    #[arg(long, short = 'p', env = "TVWS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Service base URL (overrides profile)
    #[arg(long, short = 'c', env = "TVWS_SERVICE", global = true)]
    pub service: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TVWS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "TVWS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "TVWS_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in to the spectrum service
    Login(LoginArgs),

    /// Log out and discard the stored session
    Logout,

    /// Show the identity behind the current session
    Whoami,

    /// List or add states (administrative regions)
    #[command(alias = "regions")]
    States(StatesArgs),

    /// List or add measurement locations within a state
    #[command(alias = "loc")]
    Locations(LocationsArgs),

    /// Query spectrum availability for a state, location, and time
    #[command(alias = "q")]
    Query(QueryArgs),

    /// Upload spectrum measurements
    #[command(alias = "up")]
    Upload(UploadArgs),

    /// Manage configuration profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Login email (prompted when omitted and not in the profile)
    #[arg(long)]
    pub email: Option<String>,
}

// ── Catalog ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatesArgs {
    #[command(subcommand)]
    pub command: StatesCommand,
}

#[derive(Debug, Subcommand)]
pub enum StatesCommand {
    /// List all states known to the service
    #[command(alias = "ls")]
    List,

    /// Register a new state
    Add {
        /// State name (the key used in queries and uploads)
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct LocationsArgs {
    #[command(subcommand)]
    pub command: LocationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LocationsCommand {
    /// List the locations registered for a state
    #[command(alias = "ls")]
    List {
        /// State to list locations for
        #[arg(long)]
        state: String,
    },

    /// Register a new geocoded location within a state
    Add {
        /// State the location belongs to
        #[arg(long)]
        state: String,

        /// Location name
        #[arg(long)]
        name: String,

        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
}

// ── Query ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// State to query
    #[arg(long)]
    pub state: String,

    /// Location (site) within the state
    #[arg(long, alias = "location")]
    pub site: String,

    /// Local query time, e.g. "2025-01-20T14:30" (defaults to now)
    #[arg(long)]
    pub time: Option<String>,

    /// Write the result as CSV; uses the conventional filename when
    /// PATH is omitted
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub export: Option<Option<PathBuf>>,
}

// ── Upload ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UploadArgs {
    #[command(subcommand)]
    pub command: UploadCommand,
}

#[derive(Debug, Subcommand)]
pub enum UploadCommand {
    /// Upload one measurement record
    Single {
        /// State the measurement belongs to
        #[arg(long)]
        state: String,

        /// Location (site) within the state
        #[arg(long, alias = "location")]
        site: String,

        /// Measurement timestamp, e.g. "2025-01-20T14:30" or RFC 3339
        #[arg(long)]
        timestamp: String,

        /// Channel reading as "channel:frequency:dbm", repeatable
        #[arg(long = "reading", value_parser = parse_reading, required = true)]
        readings: Vec<NewReading>,
    },

    /// Upload a CSV batch, one record per row
    Batch {
        /// CSV file with a state,location,timestamp,channel,frequency,signal_strength header
        file: PathBuf,
    },
}

/// Parse a `channel:frequency:dbm` reading argument.
fn parse_reading(value: &str) -> Result<NewReading, String> {
    let parts: Vec<&str> = value.split(':').collect();
    let [channel, frequency, dbm] = parts.as_slice() else {
        return Err(format!("expected 'channel:frequency:dbm', got '{value}'"));
    };

    Ok(NewReading {
        channel: channel
            .trim()
            .parse()
            .map_err(|_| format!("invalid channel '{channel}'"))?,
        frequency_mhz: frequency
            .trim()
            .parse()
            .map_err(|_| format!("invalid frequency '{frequency}'"))?,
        signal_strength_dbm: dbm
            .trim()
            .parse()
            .map_err(|_| format!("invalid signal strength '{dbm}'"))?,
    })
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactively create or update a profile
    Init,

    /// Print the active configuration and its path
    Show,

    /// Store a session token directly (headless setups)
    SetToken,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn reading_argument_parses_all_three_fields() {
        let reading = parse_reading("21:470:-85.5").unwrap();
        assert_eq!(reading.channel, 21);
        assert!((reading.frequency_mhz - 470.0).abs() < f64::EPSILON);
        assert!((reading.signal_strength_dbm - (-85.5)).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_reading_argument_is_rejected() {
        assert!(parse_reading("21:470").is_err());
        assert!(parse_reading("x:470:-85").is_err());
        assert!(parse_reading("21:470:-85:extra").is_err());
    }

    #[test]
    fn command_tree_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

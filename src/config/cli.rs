use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};

use crate::domain::roles::Role;

/// Command-line arguments for the fanhub binary.
#[derive(Debug, Parser)]
#[command(name = "fanhub", version, about = "fanhub backend support utilities")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "FANHUB_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Obtain the shared cache client and ping the remote service.
    Ping,
    /// Evaluate role and tenant checks for a session.
    #[command(name = "check-role")]
    CheckRole(CheckRoleArgs),
}

#[derive(Debug, Args, Clone)]
pub struct CheckRoleArgs {
    /// Role held by the session.
    #[arg(long, value_name = "ROLE")]
    pub role: Role,

    /// Tenant identifier carried by the session.
    #[arg(long, value_name = "TENANT")]
    pub tenant: Option<String>,

    /// User identifier carried by the session.
    #[arg(long, value_name = "USER")]
    pub user: Option<String>,

    /// Minimum role for the rank check.
    #[arg(long, value_name = "ROLE")]
    pub minimum: Option<Role>,

    /// Roles accepted by the membership check; repeat or separate with commas.
    #[arg(long, value_name = "ROLE", value_delimiter = ',')]
    pub allowed: Vec<Role>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct Overrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        global = true,
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the remote cache base URL.
    #[arg(long = "cache-url", global = true, value_name = "URL")]
    pub cache_url: Option<String>,

    /// Override the remote cache access token.
    #[arg(long = "cache-token", global = true, value_name = "TOKEN")]
    pub cache_token: Option<String>,

    /// Override the per-request cache timeout.
    #[arg(long = "cache-request-timeout-ms", global = true, value_name = "MILLIS")]
    pub cache_request_timeout_ms: Option<u64>,
}

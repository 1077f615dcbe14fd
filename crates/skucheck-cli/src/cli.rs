//! Argument parsing and command dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use skucheck_telemetry::{
    DEFAULT_LOG_LEVEL, GlobalContextGuard, LogFormat, LoggingConfig, init_logging,
};
use uuid::Uuid;

use crate::client::{CliContext, CliError, CliResult};
use crate::commands::lookup::handle_lookup;
use crate::commands::secrets::{handle_secrets_clear, handle_secrets_set, handle_secrets_status};
use crate::commands::watch::handle_watch;

/// Parses CLI arguments, executes the requested command, and reports any
/// failure on stderr. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    if let Err(err) = install_logging(&cli) {
        eprintln!("error: {}", err.display_message());
        return err.exit_code();
    }
    let invocation_id = Uuid::new_v4().to_string();
    let _context = GlobalContextGuard::new(cli.command.label(), invocation_id);

    match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            tracing::debug!(exit_code = err.exit_code(), "command failed");
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    let ctx = CliContext::from_cli(&cli)?;
    match cli.command {
        Command::Lookup(args) => handle_lookup(&ctx, args).await,
        Command::Watch => handle_watch(&ctx).await,
        Command::Secrets(SecretsCommand::Set) => handle_secrets_set(&ctx),
        Command::Secrets(SecretsCommand::Clear) => handle_secrets_clear(&ctx),
        Command::Secrets(SecretsCommand::Status) => handle_secrets_status(&ctx),
    }
}

fn install_logging(cli: &Cli) -> CliResult<()> {
    let format = match cli.log_format.as_deref() {
        Some(name) => {
            LogFormat::parse(name).map_err(|err| CliError::validation(err.to_string()))?
        }
        None => LogFormat::infer(),
    };
    init_logging(&LoggingConfig {
        level: &cli.log_level,
        format,
        build_sha: option_env!("SKUCHECK_BUILD_SHA").unwrap_or("dev"),
    })
    .map_err(CliError::failure)
}

#[derive(Parser)]
#[command(name = "skucheck", about = "Verify product photos for a SKU")]
pub(crate) struct Cli {
    #[arg(long, global = true, env = "SKUCHECK_CONFIG")]
    pub(crate) config: Option<PathBuf>,
    #[arg(long, global = true, env = "SKUCHECK_SECRETS_FILE")]
    pub(crate) secrets_file: Option<PathBuf>,
    #[arg(long, global = true, env = "SKUCHECK_AIRTABLE_PAT", hide_env_values = true)]
    pub(crate) airtable_pat: Option<String>,
    #[arg(
        long,
        global = true,
        env = "SKUCHECK_GOOGLE_API_KEY",
        hide_env_values = true
    )]
    pub(crate) google_api_key: Option<String>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for rendered results"
    )]
    pub(crate) output: OutputFormat,
    #[arg(long, global = true, env = "SKUCHECK_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub(crate) log_level: String,
    #[arg(long, global = true, env = "SKUCHECK_LOG_FORMAT")]
    pub(crate) log_format: Option<String>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Look up one SKU and render the verification result.
    Lookup(LookupArgs),
    /// Read SKUs from stdin, one per line; each line supersedes the last.
    Watch,
    /// Manage stored credentials.
    #[command(subcommand)]
    Secrets(SecretsCommand),
}

impl Command {
    pub(crate) const fn label(&self) -> &'static str {
        match self {
            Self::Lookup(_) => "lookup",
            Self::Watch => "watch",
            Self::Secrets(SecretsCommand::Set) => "secrets.set",
            Self::Secrets(SecretsCommand::Clear) => "secrets.clear",
            Self::Secrets(SecretsCommand::Status) => "secrets.status",
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum SecretsCommand {
    /// Store the tokens given with `--airtable-pat` and `--google-api-key`.
    Set,
    /// Remove every stored credential.
    Clear,
    /// Show which credentials are available.
    Status,
}

#[derive(Args)]
pub(crate) struct LookupArgs {
    /// SKU to search, e.g. MF-2411.
    pub(crate) sku: String,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

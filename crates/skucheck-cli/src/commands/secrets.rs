use serde::Serialize;
use skucheck_config::{
    AIRTABLE_TOKEN_SECRET, DRIVE_API_KEY_SECRET, SecretProvider, apply_credentials,
    clear_credentials, read_credential,
};

use crate::cli::OutputFormat;
use crate::client::{CliContext, CliError, CliResult};

pub(crate) fn handle_secrets_set(ctx: &CliContext) -> CliResult<()> {
    let store = ctx.persistent_store()?;
    let token = ctx.flags.airtable_pat.as_deref().ok_or_else(|| {
        CliError::validation("an Airtable token is required (pass --airtable-pat)")
    })?;
    apply_credentials(store, token, ctx.flags.google_api_key.as_deref())
        .map_err(CliError::from_config)?;
    println!("Credentials saved to {}.", store.path().display());
    Ok(())
}

pub(crate) fn handle_secrets_clear(ctx: &CliContext) -> CliResult<()> {
    let store = ctx.persistent_store()?;
    clear_credentials(store).map_err(CliError::from_config)?;
    println!("Credentials cleared.");
    Ok(())
}

pub(crate) fn handle_secrets_status(ctx: &CliContext) -> CliResult<()> {
    let store = ctx.persistent_store()?;
    println!("{}", format_status(&status(store), ctx.output)?);
    Ok(())
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct CredentialStatus {
    airtable_pat: Option<String>,
    google_api_key: Option<String>,
}

fn status(store: &dyn SecretProvider) -> CredentialStatus {
    CredentialStatus {
        airtable_pat: read_credential(store, AIRTABLE_TOKEN_SECRET).map(|value| mask(&value)),
        google_api_key: read_credential(store, DRIVE_API_KEY_SECRET).map(|value| mask(&value)),
    }
}

fn format_status(status: &CredentialStatus, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(status)
            .map_err(|err| CliError::failure(anyhow::anyhow!("failed to format JSON: {err}"))),
        OutputFormat::Table => {
            let line = |label: &str, value: &Option<String>| {
                format!("{label}: {}", value.as_deref().unwrap_or("not configured"))
            };
            Ok([
                line("airtable token", &status.airtable_pat),
                line("google api key", &status.google_api_key),
            ]
            .join("\n"))
        }
    }
}

/// Keep the first four characters; the rest is starred out.
fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    let hidden = secret.chars().count().saturating_sub(4);
    format!("{visible}{}", "*".repeat(hidden))
}

//! Shared error type, credential wiring, and command context for the CLI.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::anyhow;
use skucheck_app::FatalNotice;
use skucheck_config::{
    AIRTABLE_TOKEN_SECRET, ConfigError, DRIVE_API_KEY_SECRET, JsonFileSecretStore,
    MemorySecretStore, SecretProvider, read_credential,
};
use skucheck_core::{ErrorKind, RecordStoreError};

use crate::cli::{Cli, OutputFormat};

const SECRETS_DIR: &str = "skucheck";
const SECRETS_FILE: &str = "secrets.json";

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    /// Map a fatal search failure to an exit status. Input the user can fix
    /// locally is a validation error.
    pub(crate) fn from_search(error: &RecordStoreError) -> Self {
        let notice = FatalNotice::from_error(error);
        let message = format!("{}: {}", notice.title, notice.message);
        match notice.kind {
            ErrorKind::InvalidFormat | ErrorKind::CredentialMissing => Self::Validation(message),
            _ => Self::Failure(anyhow!(message)),
        }
    }

    /// Credential validation failures are the user's to fix; storage
    /// failures are operational.
    pub(crate) fn from_config(error: ConfigError) -> Self {
        match error {
            ConfigError::InvalidCredential { reason, .. } => Self::Validation(reason.to_string()),
            ConfigError::InvalidField { field, reason, .. } => {
                Self::Validation(format!("{field}: {reason}"))
            }
            other => Self::Failure(other.into()),
        }
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

/// Settings every command handler receives.
pub(crate) struct CliContext {
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) output: OutputFormat,
    pub(crate) store: Option<JsonFileSecretStore>,
    pub(crate) flags: CredentialFlags,
}

/// Credentials passed on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub(crate) struct CredentialFlags {
    pub(crate) airtable_pat: Option<String>,
    pub(crate) google_api_key: Option<String>,
}

impl CliContext {
    pub(crate) fn from_cli(cli: &Cli) -> CliResult<Self> {
        let secrets_path = cli
            .secrets_file
            .clone()
            .or_else(|| default_secrets_path(|name| std::env::var_os(name).map(PathBuf::from)));
        Ok(Self {
            config_path: cli.config.clone(),
            output: cli.output,
            store: secrets_path.map(JsonFileSecretStore::new),
            flags: CredentialFlags {
                airtable_pat: cli.airtable_pat.clone(),
                google_api_key: cli.google_api_key.clone(),
            },
        })
    }

    pub(crate) fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Persistent store, required by the `secrets` commands.
    pub(crate) fn persistent_store(&self) -> CliResult<&JsonFileSecretStore> {
        self.store.as_ref().ok_or_else(|| {
            CliError::validation(
                "no secrets file location (pass --secrets-file or set SKUCHECK_SECRETS_FILE)",
            )
        })
    }

    /// Credentials for a search: flags first, then the stored values.
    pub(crate) fn credentials(&self) -> Arc<dyn SecretProvider> {
        let stored = |name: &str| {
            self.store
                .as_ref()
                .and_then(|store| read_credential(store, name))
        };
        let token = self
            .flags
            .airtable_pat
            .clone()
            .or_else(|| stored(AIRTABLE_TOKEN_SECRET));
        let api_key = self
            .flags
            .google_api_key
            .clone()
            .or_else(|| stored(DRIVE_API_KEY_SECRET));
        let entries = [
            token.map(|value| (AIRTABLE_TOKEN_SECRET, value)),
            api_key.map(|value| (DRIVE_API_KEY_SECRET, value)),
        ];
        Arc::new(MemorySecretStore::with_entries(entries.into_iter().flatten()))
    }
}

/// `$XDG_CONFIG_HOME/skucheck/secrets.json`, falling back to
/// `$HOME/.config/skucheck/secrets.json`.
pub(crate) fn default_secrets_path(lookup: impl Fn(&str) -> Option<PathBuf>) -> Option<PathBuf> {
    let base = lookup("XDG_CONFIG_HOME")
        .filter(|path| path.is_absolute())
        .or_else(|| lookup("HOME").map(|home| home.join(".config")))?;
    Some(base.join(SECRETS_DIR).join(SECRETS_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use skucheck_core::MissingTarget;

    fn context(store: Option<JsonFileSecretStore>, flags: CredentialFlags) -> CliContext {
        CliContext {
            config_path: None,
            output: OutputFormat::Table,
            store,
            flags,
        }
    }

    #[test]
    fn search_failures_map_to_exit_codes() {
        let invalid = CliError::from_search(&RecordStoreError::InvalidFormat {
            input: "M-1".to_string(),
        });
        assert_eq!(invalid.exit_code(), 2);
        assert!(invalid.display_message().starts_with("Invalid SKU"));

        assert_eq!(
            CliError::from_search(&RecordStoreError::CredentialMissing).exit_code(),
            2
        );
        let missing = CliError::from_search(&RecordStoreError::NotFound {
            target: MissingTarget::Sku("MF-9999".to_string()),
        });
        assert_eq!(missing.exit_code(), 3);
        assert!(missing.display_message().contains("MF-9999"));
    }

    #[test]
    fn default_path_prefers_xdg_config_home() {
        let path = default_secrets_path(|name| match name {
            "XDG_CONFIG_HOME" => Some(PathBuf::from("/xdg")),
            "HOME" => Some(PathBuf::from("/home/user")),
            _ => None,
        });
        assert_eq!(path, Some(PathBuf::from("/xdg/skucheck/secrets.json")));

        let fallback = default_secrets_path(|name| match name {
            "XDG_CONFIG_HOME" => Some(PathBuf::from("relative")),
            "HOME" => Some(PathBuf::from("/home/user")),
            _ => None,
        });
        assert_eq!(
            fallback,
            Some(PathBuf::from("/home/user/.config/skucheck/secrets.json"))
        );
        assert_eq!(default_secrets_path(|_| None), None);
    }

    #[test]
    fn flags_override_stored_credentials() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = JsonFileSecretStore::new(dir.path().join("secrets.json"));
        store.set(AIRTABLE_TOKEN_SECRET, "patStored.1")?;
        store.set(DRIVE_API_KEY_SECRET, "storedKey")?;
        let ctx = context(
            Some(store),
            CredentialFlags {
                airtable_pat: Some("patFlag.1".to_string()),
                google_api_key: None,
            },
        );

        let credentials = ctx.credentials();

        assert_eq!(
            credentials.get(AIRTABLE_TOKEN_SECRET).as_deref(),
            Some("patFlag.1")
        );
        assert_eq!(
            credentials.get(DRIVE_API_KEY_SECRET).as_deref(),
            Some("storedKey")
        );
        Ok(())
    }

    #[test]
    fn secrets_commands_need_a_store() {
        let ctx = context(None, CredentialFlags::default());
        assert!(ctx.persistent_store().is_err());
        assert_eq!(ctx.credentials().get(AIRTABLE_TOKEN_SECRET), None);
    }
}

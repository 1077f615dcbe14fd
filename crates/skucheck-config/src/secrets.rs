//! Opaque key-value secret storage.
//!
//! # Design
//! - The core only needs `get`/`set`/`remove` by name; storage mechanics stay
//!   behind [`SecretProvider`].
//! - Reads are infallible from the caller's point of view: a store that cannot
//!   be read behaves as if the secret were absent, and logs why.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use tracing::warn;

use crate::error::{ConfigError, ConfigResult};
use crate::validate::{normalize_optional_secret, validate_airtable_token};

/// Secret name of the record store personal access token.
pub const AIRTABLE_TOKEN_SECRET: &str = "airtable_pat";
/// Secret name of the file storage API key.
pub const DRIVE_API_KEY_SECRET: &str = "google_api_key";

/// Named secret storage supplied to the backend adapters.
pub trait SecretProvider: Send + Sync {
    /// Current value of `name`, if stored.
    fn get(&self, name: &str) -> Option<String>;

    /// Store `value` under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be written.
    fn set(&self, name: &str, value: &str) -> ConfigResult<()>;

    /// Remove `name`; removing an absent secret is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be written.
    fn remove(&self, name: &str) -> ConfigResult<()>;
}

/// Read a secret, treating blank values as absent.
#[must_use]
pub fn read_credential(provider: &dyn SecretProvider, name: &str) -> Option<String> {
    normalize_optional_secret(provider.get(name).as_deref())
}

/// Validate and store both credentials. A blank or absent storage key removes
/// the stored one.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidCredential`] for a malformed record store
/// token, or the provider's write error.
pub fn apply_credentials(
    provider: &dyn SecretProvider,
    airtable_token: &str,
    drive_api_key: Option<&str>,
) -> ConfigResult<()> {
    let token = validate_airtable_token(airtable_token)?;
    provider.set(AIRTABLE_TOKEN_SECRET, &token)?;
    match normalize_optional_secret(drive_api_key) {
        Some(key) => provider.set(DRIVE_API_KEY_SECRET, &key),
        None => provider.remove(DRIVE_API_KEY_SECRET),
    }
}

/// Remove every credential this workspace knows about.
///
/// # Errors
///
/// Returns the provider's write error.
pub fn clear_credentials(provider: &dyn SecretProvider) -> ConfigResult<()> {
    provider.remove(AIRTABLE_TOKEN_SECRET)?;
    provider.remove(DRIVE_API_KEY_SECRET)
}

/// Process-local secret store.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `entries`.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl SecretProvider for MemorySecretStore {
    fn get(&self, name: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn set(&self, name: &str, value: &str) -> ConfigResult<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, name: &str) -> ConfigResult<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
        Ok(())
    }
}

/// Secret store persisted as a flat JSON object on disk.
#[derive(Debug)]
pub struct JsonFileSecretStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileSecretStore {
    /// Store backed by `path`; the file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> ConfigResult<BTreeMap<String, String>> {
        let payload = match fs::read_to_string(&self.path) {
            Ok(payload) => payload,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(ConfigError::Io {
                    operation: "secrets.read",
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if payload.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&payload).map_err(|source| ConfigError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn store(&self, entries: &BTreeMap<String, String>) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                operation: "secrets.create_dir",
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let payload = serde_json::to_string_pretty(entries).map_err(|source| ConfigError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, payload).map_err(|source| ConfigError::Io {
            operation: "secrets.write",
            path: self.path.clone(),
            source,
        })?;
        restrict_permissions(&self.path)
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> ConfigResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load()?;
        apply(&mut entries);
        self.store(&entries)
    }
}

impl SecretProvider for JsonFileSecretStore {
    fn get(&self, name: &str) -> Option<String> {
        match self.load() {
            Ok(mut entries) => entries.remove(name),
            Err(err) => {
                warn!(error = %err, path = %self.path.display(), "secret store unreadable");
                None
            }
        }
    }

    fn set(&self, name: &str, value: &str) -> ConfigResult<()> {
        self.update(|entries| {
            entries.insert(name.to_string(), value.to_string());
        })
    }

    fn remove(&self, name: &str) -> ConfigResult<()> {
        self.update(|entries| {
            entries.remove(name);
        })
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> ConfigResult<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|source| {
        ConfigError::Io {
            operation: "secrets.chmod",
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> ConfigResult<()> {
    Ok(())
}

#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Configuration and credential access for the SKU verifier.
//!
//! Layout: `model.rs` (typed config and override documents), `loader.rs`
//! (environment/file loading), `validate.rs` (field and credential checks),
//! `secrets.rs` (`SecretProvider` and its stores), `defaults.rs` (constants).

mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod secrets;
pub mod validate;

pub use defaults::{
    DEFAULT_AIRTABLE_API_URL, DEFAULT_BASE_ID, DEFAULT_DRIVE_API_URL, DEFAULT_LINKED_TABLE,
    DEFAULT_PAGE_SIZE, DEFAULT_PRODUCT_TABLE, DEFAULT_TIMEOUT_SECS,
};
pub use error::{ConfigError, ConfigResult};
pub use loader::{ENV_PREFIX, load};
pub use model::{
    ConfigOverrides, HttpConfig, HttpOverrides, RecordStoreConfig, RecordStoreOverrides,
    SkuCheckConfig, StorageConfig, StorageOverrides,
};
pub use secrets::{
    AIRTABLE_TOKEN_SECRET, DRIVE_API_KEY_SECRET, JsonFileSecretStore, MemorySecretStore,
    SecretProvider, apply_credentials, clear_credentials, read_credential,
};

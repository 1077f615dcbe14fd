#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Domain types and pure reconciliation logic for SKU photo verification.
//!
//! Layout: `sku.rs` (normalisation), `model/` (records and files), `verify.rs`
//! (per-file verdicts), `status.rs` (badge tones), `result.rs` (search result
//! assembly), `links.rs` (storage URL helpers), `service/` (backend traits),
//! `error.rs` (failure taxonomy).

pub mod error;
pub mod links;
pub mod model;
pub mod result;
pub mod service;
pub mod sku;
pub mod status;
pub mod verify;

pub use error::{
    EnumerationError, EnumerationResult, ErrorKind, MissingTarget, RecordStoreError,
    RecordStoreResult,
};
pub use model::{
    FieldValue, FolderReference, LinkedFields, LinkedRecord, OneOrMany, ProductFields,
    ProductRecord, RemoteFile,
};
pub use result::{Degradation, Enumeration, SearchResult};
pub use service::{FileEnumerator, RecordStore};
pub use sku::{Sku, normalize};
pub use status::{BadgeTone, StatusField, classify_status};
pub use verify::{Verdict, classify, verify_pair};

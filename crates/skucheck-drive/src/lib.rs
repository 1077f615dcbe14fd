#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Google Drive-backed [`skucheck_core::FileEnumerator`].
//!
//! Layout: `client.rs` (HTTP adapter and listing rules), `wire.rs` (response
//! and error documents), `error.rs` (construction failures).

pub mod client;
pub mod error;
mod wire;

pub use client::DriveClient;
pub use error::{DriveError, DriveResult};

#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Airtable-backed [`skucheck_core::RecordStore`].
//!
//! Layout: `client.rs` (HTTP adapter), `wire.rs` (response documents and
//! field projections), `error.rs` (construction failures).

pub mod client;
pub mod error;
mod wire;

pub use client::AirtableClient;
pub use error::{AirtableError, AirtableResult};
pub use wire::{LINKED_FIELDS, PRODUCT_FIELDS};

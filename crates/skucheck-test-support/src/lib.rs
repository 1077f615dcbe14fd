#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Shared test helpers used across integration suites.
//! Layout: fixtures.rs (wire bodies, typed records, config), mocks.rs (scripted
//! service fakes and gates).

pub mod fixtures;
pub mod mocks;

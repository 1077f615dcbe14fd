//! One search, end to end.
//!
//! # Design
//! - Only normalisation and the record fetch can fail a search. Everything
//!   after the record is fetched narrows the result instead.
//! - Under a ticket, staleness is checked after every await; a superseded
//!   search stops at the next checkpoint and returns no result.

use std::sync::Arc;

use skucheck_core::{
    Enumeration, FileEnumerator, RecordStore, RecordStoreError, SearchResult, normalize,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::resolver::FolderResolver;
use crate::session::{SearchPhase, SearchTicket};

/// Why a search produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchFailure {
    /// The SKU was rejected or the record could not be fetched.
    #[error("search failed")]
    Fatal {
        /// Record store failure.
        source: RecordStoreError,
    },
    /// A newer search started before this one finished.
    #[error("search superseded")]
    Superseded {
        /// Generation of the abandoned search.
        generation: u64,
    },
}

impl From<RecordStoreError> for SearchFailure {
    fn from(source: RecordStoreError) -> Self {
        Self::Fatal { source }
    }
}

trait Checkpoint: Send + Sync {
    fn enter(&self, phase: SearchPhase) -> bool;
    fn is_current(&self) -> bool;
    fn generation(&self) -> u64;
}

struct Unsupervised;

impl Checkpoint for Unsupervised {
    fn enter(&self, _phase: SearchPhase) -> bool {
        true
    }

    fn is_current(&self) -> bool {
        true
    }

    fn generation(&self) -> u64 {
        0
    }
}

impl Checkpoint for SearchTicket {
    fn enter(&self, phase: SearchPhase) -> bool {
        self.advance(phase)
    }

    fn is_current(&self) -> bool {
        Self::is_current(self)
    }

    fn generation(&self) -> u64 {
        Self::generation(self)
    }
}

/// Record fetch, folder resolution, enumeration, and verification.
pub struct SearchPipeline {
    store: Arc<dyn RecordStore>,
    enumerator: Arc<dyn FileEnumerator>,
    resolver: FolderResolver,
}

impl SearchPipeline {
    /// Pipeline using the standard folder strategies.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, enumerator: Arc<dyn FileEnumerator>) -> Self {
        Self {
            store,
            enumerator,
            resolver: FolderResolver::standard(),
        }
    }

    /// Replace the folder resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: FolderResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Run one search outside any session. Never returns
    /// [`SearchFailure::Superseded`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchFailure::Fatal`] when the SKU is invalid or the record
    /// cannot be fetched.
    pub async fn run(&self, input: &str) -> Result<SearchResult, SearchFailure> {
        self.drive(input, &Unsupervised).await
    }

    /// Run one search on behalf of `ticket`, stopping early once a newer
    /// search has started.
    ///
    /// # Errors
    ///
    /// Returns [`SearchFailure::Fatal`] for record failures and
    /// [`SearchFailure::Superseded`] once the ticket is stale.
    pub async fn execute(
        &self,
        input: &str,
        ticket: &SearchTicket,
    ) -> Result<SearchResult, SearchFailure> {
        self.drive(input, ticket).await
    }

    async fn drive(
        &self,
        input: &str,
        checkpoint: &dyn Checkpoint,
    ) -> Result<SearchResult, SearchFailure> {
        let sku = normalize(input)?;
        proceed(checkpoint, SearchPhase::FetchingRecord)?;
        let record = self.store.fetch_by_sku(&sku).await.inspect_err(|err| {
            debug!(sku = %sku, kind = err.kind().as_str(), "record fetch failed");
        })?;
        proceed(checkpoint, SearchPhase::ResolvingFolder)?;

        let folder = self.resolver.resolve(&record, self.store.as_ref()).await;
        let enumeration = match folder.as_deref() {
            None => {
                info!(sku = %sku, "no folder resolved; skipping enumeration");
                ensure_current(checkpoint)?;
                Enumeration::Skipped
            }
            Some(folder_id) => {
                proceed(checkpoint, SearchPhase::EnumeratingFiles)?;
                let listed = self.enumerator.list_images(folder_id).await;
                ensure_current(checkpoint)?;
                match listed {
                    Ok(files) => Enumeration::Listed(files),
                    Err(error) => {
                        warn!(
                            sku = %sku,
                            folder_id,
                            kind = error.kind().as_str(),
                            "folder enumeration failed; continuing without listing"
                        );
                        Enumeration::Failed(error)
                    }
                }
            }
        };

        let result = SearchResult::assemble(sku, record, folder, enumeration);
        debug!(
            sku = %result.sku(),
            front = result.front().as_str(),
            back = result.back().as_str(),
            "search assembled"
        );
        Ok(result)
    }
}

fn proceed(checkpoint: &dyn Checkpoint, phase: SearchPhase) -> Result<(), SearchFailure> {
    if checkpoint.enter(phase) {
        Ok(())
    } else {
        Err(SearchFailure::Superseded {
            generation: checkpoint.generation(),
        })
    }
}

fn ensure_current(checkpoint: &dyn Checkpoint) -> Result<(), SearchFailure> {
    if checkpoint.is_current() {
        Ok(())
    } else {
        Err(SearchFailure::Superseded {
            generation: checkpoint.generation(),
        })
    }
}

//! Generational search session.
//!
//! # Design
//! - Every search takes a [`SearchTicket`] carrying a generation number.
//!   Starting a search bumps the generation, which makes every older ticket
//!   stale.
//! - Phase changes and commits check the generation under the same lock that
//!   `begin` takes, so a stale ticket can never overwrite a newer outcome.
//! - The presenter only ever hears from the current ticket.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use skucheck_core::{ErrorKind, SearchResult};
use tracing::debug;

use crate::notice::{Advisory, FatalNotice};
use crate::presenter::Presenter;

/// Progress of the current search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    /// No search has started.
    Idle,
    /// Waiting for the product record.
    FetchingRecord,
    /// Working out the photo folder.
    ResolvingFolder,
    /// Listing the folder.
    EnumeratingFiles,
    /// Result committed.
    Done,
    /// Fatal failure committed.
    Errored(ErrorKind),
}

impl SearchPhase {
    /// Stable identifier for logs and JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::FetchingRecord => "fetching_record",
            Self::ResolvingFolder => "resolving_folder",
            Self::EnumeratingFiles => "enumerating_files",
            Self::Done => "done",
            Self::Errored(_) => "errored",
        }
    }
}

/// What the last committed search produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// The record was found; the result may be degraded.
    Found {
        /// Assembled result.
        result: Box<SearchResult>,
    },
    /// The search failed before a record was available.
    Failed {
        /// Notice describing the failure.
        notice: FatalNotice,
    },
}

#[derive(Debug)]
struct SessionState {
    generation: u64,
    phase: SearchPhase,
    outcome: Option<SearchOutcome>,
}

/// Shared state for successive searches.
pub struct SearchSession {
    state: Mutex<SessionState>,
    presenter: Arc<dyn Presenter>,
}

impl SearchSession {
    /// Idle session reporting to `presenter`.
    #[must_use]
    pub fn new(presenter: Arc<dyn Presenter>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(SessionState {
                generation: 0,
                phase: SearchPhase::Idle,
                outcome: None,
            }),
            presenter,
        })
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new search, superseding any search still in flight.
    #[must_use]
    pub fn begin(self: &Arc<Self>) -> SearchTicket {
        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            state.generation
        };
        debug!(generation, "search started");
        SearchTicket {
            generation,
            session: Arc::clone(self),
        }
    }

    /// Generation of the most recent search.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Phase of the most recent search.
    #[must_use]
    pub fn phase(&self) -> SearchPhase {
        self.lock().phase
    }

    /// Last committed outcome.
    #[must_use]
    pub fn outcome(&self) -> Option<SearchOutcome> {
        self.lock().outcome.clone()
    }
}

/// Handle tying one search to the session generation it started in.
pub struct SearchTicket {
    generation: u64,
    session: Arc<SearchSession>,
}

impl SearchTicket {
    /// Generation this ticket belongs to.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether no newer search has started since this ticket was issued.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.session.generation() == self.generation
    }

    /// Move the session to `phase`. Returns `false`, changing nothing, when
    /// the ticket is stale.
    pub fn advance(&self, phase: SearchPhase) -> bool {
        let mut state = self.session.lock();
        if state.generation != self.generation {
            debug!(
                generation = self.generation,
                phase = phase.as_str(),
                "stale phase change ignored"
            );
            return false;
        }
        state.phase = phase;
        self.session.presenter.phase_changed(phase);
        true
    }

    /// Replace the current outcome and hand it to the presenter. Returns
    /// `false`, changing nothing, when the ticket is stale.
    pub fn commit(&self, outcome: SearchOutcome) -> bool {
        let mut state = self.session.lock();
        if state.generation != self.generation {
            debug!(generation = self.generation, "stale result discarded");
            return false;
        }
        let presenter = self.session.presenter.as_ref();
        let phase = match &outcome {
            SearchOutcome::Found { result } => {
                presenter.render(result);
                if let Some(degradation) = result.degradation() {
                    presenter.advise(&Advisory::from_degradation(degradation));
                }
                SearchPhase::Done
            }
            SearchOutcome::Failed { notice } => {
                presenter.render_error(notice);
                SearchPhase::Errored(notice.kind)
            }
        };
        state.outcome = Some(outcome);
        state.phase = phase;
        presenter.phase_changed(phase);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::{PresenterEvent, RecordingPresenter};
    use skucheck_core::RecordStoreError;

    fn failed(error: &RecordStoreError) -> SearchOutcome {
        SearchOutcome::Failed {
            notice: FatalNotice::from_error(error),
        }
    }

    #[test]
    fn newer_ticket_makes_older_stale() {
        let presenter = Arc::new(RecordingPresenter::new());
        let session = SearchSession::new(presenter.clone());

        let first = session.begin();
        assert!(first.is_current());
        let second = session.begin();
        assert!(!first.is_current());
        assert!(second.is_current());
        assert!(second.generation() > first.generation());
    }

    #[test]
    fn stale_ticket_cannot_advance_or_commit() {
        let presenter = Arc::new(RecordingPresenter::new());
        let session = SearchSession::new(presenter.clone());

        let stale = session.begin();
        let current = session.begin();
        assert!(current.advance(SearchPhase::FetchingRecord));

        assert!(!stale.advance(SearchPhase::EnumeratingFiles));
        assert!(!stale.commit(failed(&RecordStoreError::RateLimited)));
        assert_eq!(session.phase(), SearchPhase::FetchingRecord);
        assert_eq!(session.outcome(), None);
        assert_eq!(
            presenter.events(),
            vec![PresenterEvent::Phase(SearchPhase::FetchingRecord)]
        );
    }

    #[test]
    fn commit_replaces_outcome_and_notifies_presenter() {
        let presenter = Arc::new(RecordingPresenter::new());
        let session = SearchSession::new(presenter.clone());

        let ticket = session.begin();
        assert!(ticket.commit(failed(&RecordStoreError::Unauthorized)));

        assert_eq!(session.phase(), SearchPhase::Errored(ErrorKind::Unauthorized));
        let notice = match session.outcome() {
            Some(SearchOutcome::Failed { notice }) => Some(notice),
            _ => None,
        };
        assert_eq!(notice.map(|notice| notice.kind), Some(ErrorKind::Unauthorized));
        assert!(matches!(
            presenter.events().as_slice(),
            [
                PresenterEvent::Failed(_),
                PresenterEvent::Phase(SearchPhase::Errored(ErrorKind::Unauthorized))
            ]
        ));
    }

    #[test]
    fn errored_phase_serialises_with_its_kind() -> serde_json::Result<()> {
        let phase = SearchPhase::Errored(ErrorKind::RateLimited);
        assert_eq!(phase.as_str(), "errored");
        assert_eq!(
            serde_json::to_value(phase)?,
            serde_json::json!({ "errored": "rate_limited" })
        );
        assert_eq!(serde_json::to_value(SearchPhase::Done)?, serde_json::json!("done"));
        Ok(())
    }
}

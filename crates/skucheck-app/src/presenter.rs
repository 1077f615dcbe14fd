//! Presentation seam.
//!
//! Presenters are called while the session lock is held, so they must not
//! start or commit searches themselves.

use std::sync::{Mutex, PoisonError};

use skucheck_core::SearchResult;

use crate::notice::{Advisory, FatalNotice};
use crate::session::SearchPhase;

/// Receiver of everything a current search produces.
pub trait Presenter: Send + Sync {
    /// Show a completed result.
    fn render(&self, result: &SearchResult);

    /// Show a fatal failure in place of a result.
    fn render_error(&self, notice: &FatalNotice);

    /// Show a transient note about a degraded result.
    fn advise(&self, advisory: &Advisory);

    /// The current search moved to `phase`.
    fn phase_changed(&self, _phase: SearchPhase) {}
}

/// One call received by a [`RecordingPresenter`].
#[derive(Debug, Clone, PartialEq)]
pub enum PresenterEvent {
    /// `phase_changed` was called.
    Phase(SearchPhase),
    /// `render` was called.
    Rendered(Box<SearchResult>),
    /// `render_error` was called.
    Failed(FatalNotice),
    /// `advise` was called.
    Advised(Advisory),
}

/// Presenter that keeps every call in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    events: Mutex<Vec<PresenterEvent>>,
}

impl RecordingPresenter {
    /// Empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the calls so far.
    #[must_use]
    pub fn events(&self) -> Vec<PresenterEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Results rendered so far.
    #[must_use]
    pub fn rendered(&self) -> Vec<SearchResult> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                PresenterEvent::Rendered(result) => Some(*result),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: PresenterEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl Presenter for RecordingPresenter {
    fn render(&self, result: &SearchResult) {
        self.push(PresenterEvent::Rendered(Box::new(result.clone())));
    }

    fn render_error(&self, notice: &FatalNotice) {
        self.push(PresenterEvent::Failed(notice.clone()));
    }

    fn advise(&self, advisory: &Advisory) {
        self.push(PresenterEvent::Advised(advisory.clone()));
    }

    fn phase_changed(&self, phase: SearchPhase) {
        self.push(PresenterEvent::Phase(phase));
    }
}

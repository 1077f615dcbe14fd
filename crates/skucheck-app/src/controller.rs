//! Search controller: pipeline, session, and presenter wired together.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::notice::FatalNotice;
use crate::pipeline::{SearchFailure, SearchPipeline};
use crate::presenter::Presenter;
use crate::session::{SearchOutcome, SearchSession, SearchTicket};

/// What happened to a search once it finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDisposition {
    /// The outcome became current and was presented.
    Applied,
    /// A newer search started first; nothing was presented.
    Discarded,
}

/// Front door for interactive searches.
#[derive(Clone)]
pub struct SearchController {
    pipeline: Arc<SearchPipeline>,
    session: Arc<SearchSession>,
}

impl SearchController {
    /// Controller with a fresh session reporting to `presenter`.
    #[must_use]
    pub fn new(pipeline: Arc<SearchPipeline>, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            pipeline,
            session: SearchSession::new(presenter),
        }
    }

    /// Session holding the current outcome.
    #[must_use]
    pub const fn session(&self) -> &Arc<SearchSession> {
        &self.session
    }

    /// Run a search to completion on the current task.
    pub async fn search(&self, input: &str) -> SearchDisposition {
        let ticket = self.session.begin();
        self.complete(input, &ticket).await
    }

    /// Start a search on a tokio task. The generation is taken before this
    /// returns, so a later call always supersedes an earlier one.
    pub fn spawn(&self, input: impl Into<String>) -> JoinHandle<SearchDisposition> {
        let ticket = self.session.begin();
        let controller = self.clone();
        let input = input.into();
        tokio::spawn(async move { controller.complete(&input, &ticket).await })
    }

    async fn complete(&self, input: &str, ticket: &SearchTicket) -> SearchDisposition {
        let outcome = match self.pipeline.execute(input, ticket).await {
            Ok(result) => SearchOutcome::Found {
                result: Box::new(result),
            },
            Err(SearchFailure::Fatal { source }) => SearchOutcome::Failed {
                notice: FatalNotice::from_error(&source),
            },
            Err(SearchFailure::Superseded { generation }) => {
                debug!(generation, "search superseded before completion");
                return SearchDisposition::Discarded;
            }
        };
        if ticket.commit(outcome) {
            SearchDisposition::Applied
        } else {
            SearchDisposition::Discarded
        }
    }
}

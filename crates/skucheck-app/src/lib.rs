#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Search orchestration for the SKU verifier.
//!
//! Layout: `resolver.rs` (ordered folder strategies), `pipeline.rs` (one
//! search end to end), `session.rs` (generational tickets and the current
//! outcome), `controller.rs` (pipeline + session + presenter), `presenter.rs`
//! (presentation seam), `notice.rs` (user-facing messages), `bootstrap.rs`
//! (wiring the HTTP adapters from configuration).

pub mod bootstrap;
pub mod controller;
pub mod error;
pub mod notice;
pub mod pipeline;
pub mod presenter;
pub mod resolver;
pub mod session;

pub use bootstrap::{build_pipeline, load_config};
pub use controller::{SearchController, SearchDisposition};
pub use error::{AppError, AppResult};
pub use notice::{Advisory, FatalNotice};
pub use pipeline::{SearchFailure, SearchPipeline};
pub use presenter::{Presenter, PresenterEvent, RecordingPresenter};
pub use resolver::{DirectFolderField, FolderResolver, FolderStrategy, LinkedRecordFolder};
pub use session::{SearchOutcome, SearchPhase, SearchSession, SearchTicket};

//! Service layer
//!
//! Contains business logic separated from HTTP handlers.
//! Services orchestrate the database, the remote model and the
//! local heuristic scorer.

mod analysis;
pub mod cursor;
pub mod heuristic;
mod inbox;
mod records;

pub use analysis::{
    AnalysisOutcome, AnalysisPath, AnalysisService, RemoteClassifier, RemoteError, RemoteVerdict,
    select_outcome,
};
pub use cursor::{Page, PageRequest};
pub use inbox::{InboxService, PREVIEW_CHARS, preview};
pub use records::AnalysisRecordService;

//! Core data models.

mod key;
mod outcome;
mod report;

pub use key::{LookupKey, Provenance};
pub use outcome::ResolutionOutcome;
pub use report::{AnnotationReport, BlockReport, BlockStatus};

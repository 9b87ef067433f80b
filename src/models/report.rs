//! Per-block annotation reports.

use serde::Serialize;

use super::{LookupKey, ResolutionOutcome};

/// Terminal status of one result block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BlockStatus {
    /// Lookup completed and a fragment was appended to the block
    Rendered { outcome: ResolutionOutcome },
    /// Lookup failed; nothing was rendered for the block
    Failed { error: String },
}

/// What happened to a single result block.
#[derive(Debug, Clone, Serialize)]
pub struct BlockReport {
    /// Position of the block on the page (0-based)
    pub index: usize,

    /// Title text as read from the page
    pub title: String,

    /// Key the block was looked up with
    pub key: LookupKey,

    pub status: BlockStatus,
}

/// Outcome of annotating one results page, in page order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnnotationReport {
    pub blocks: Vec<BlockReport>,
}

impl AnnotationReport {
    /// Number of blocks resolved to a single PMID
    pub fn resolved(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| {
                matches!(&b.status, BlockStatus::Rendered { outcome } if outcome.is_resolved())
            })
            .count()
    }

    /// Number of blocks whose lookup failed
    pub fn failed(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b.status, BlockStatus::Failed { .. }))
            .count()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

//! Page annotation: per-block extraction, concurrent lookup, and rendering.
//!
//! Blocks are enumerated once and their keys extracted synchronously, in
//! page order. Every lookup is then put in flight at the same time on the
//! current task. Each lookup carries its [`LookupContext`] and hands it back
//! with the result, so completions arriving in any order are rendered into
//! the slot of the block that issued them.

use futures_util::stream::{FuturesUnordered, StreamExt};

use crate::extract::Extractor;
use crate::lookup::{LookupError, PmidLookup};
use crate::models::{AnnotationReport, BlockReport, BlockStatus, LookupKey, ResolutionOutcome};
use crate::page::{ScholarPage, SlotId};
use crate::render::Renderer;

/// Notification sent to the host once an annotation run starts.
pub trait HostSignal: Send + Sync {
    /// The page is being annotated
    fn page_action_active(&self);
}

/// Host signal that only records the activation in the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSignal;

impl HostSignal for LogSignal {
    fn page_action_active(&self) {
        tracing::info!("PubMed annotation active for this page");
    }
}

/// Everything a completed lookup needs to find its way back to its block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupContext {
    pub index: usize,
    pub title: String,
    pub slot: SlotId,
    pub key: LookupKey,
}

/// Annotates result pages with PubMed links.
pub struct Annotator<'a> {
    extractor: &'a Extractor,
    lookup: &'a dyn PmidLookup,
    renderer: &'a Renderer,
    signal: &'a dyn HostSignal,
}

impl<'a> Annotator<'a> {
    pub fn new(
        extractor: &'a Extractor,
        lookup: &'a dyn PmidLookup,
        renderer: &'a Renderer,
        signal: &'a dyn HostSignal,
    ) -> Self {
        Self {
            extractor,
            lookup,
            renderer,
            signal,
        }
    }

    /// Compute the lookup context of every block on the page, in page order
    pub fn plan(&self, page: &ScholarPage) -> Vec<LookupContext> {
        page.blocks()
            .into_iter()
            .map(|block| {
                let key = self.extractor.extract(block.url.as_deref(), &block.title);
                tracing::debug!(index = block.index, key = %key, "Extracted lookup key");
                LookupContext {
                    index: block.index,
                    title: block.title,
                    slot: block.slot,
                    key,
                }
            })
            .collect()
    }

    /// Resolve every block on the page and append its fragment.
    ///
    /// A failed lookup is logged and reported for its block only; every
    /// other block is still resolved and rendered.
    pub async fn annotate(&self, page: &mut ScholarPage) -> AnnotationReport {
        self.signal.page_action_active();

        let contexts = self.plan(page);
        tracing::info!(blocks = contexts.len(), "Dispatching PMID lookups");

        let mut pending: FuturesUnordered<_> = contexts
            .into_iter()
            .map(|context| self.dispatch(context))
            .collect();

        let mut blocks = Vec::new();
        while let Some((context, result)) = pending.next().await {
            let status = match result {
                Ok(candidates) => {
                    let outcome = ResolutionOutcome::from_candidates(candidates);
                    let fragment = self.renderer.render(&outcome, context.key.provenance());

                    match page.append(context.slot, &fragment) {
                        Ok(()) => {
                            tracing::debug!(
                                index = context.index,
                                pmid = outcome.pmid().unwrap_or("-"),
                                "Rendered block"
                            );
                            BlockStatus::Rendered { outcome }
                        }
                        Err(e) => BlockStatus::Failed {
                            error: e.to_string(),
                        },
                    }
                }
                Err(e) => {
                    if e.is_transport() {
                        tracing::warn!(
                            index = context.index,
                            key = %context.key,
                            error = %e,
                            "PMID lookup failed"
                        );
                    } else {
                        tracing::error!(
                            index = context.index,
                            key = %context.key,
                            error = %e,
                            "Unreadable PMID lookup response"
                        );
                    }
                    BlockStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };

            blocks.push(BlockReport {
                index: context.index,
                title: context.title,
                key: context.key,
                status,
            });
        }

        blocks.sort_by_key(|b| b.index);
        let report = AnnotationReport { blocks };
        tracing::info!(
            blocks = report.len(),
            resolved = report.resolved(),
            failed = report.failed(),
            "Annotation finished"
        );
        report
    }

    async fn dispatch(
        &self,
        context: LookupContext,
    ) -> (LookupContext, Result<Vec<String>, LookupError>) {
        let result = self.lookup.resolve(&context.key).await;
        (context, result)
    }
}

//! PMID lookup clients.
//!
//! This module defines the [`PmidLookup`] trait used by the orchestrator to
//! resolve lookup keys. [`EutilsClient`] queries NCBI E-utilities eSearch;
//! [`MockLookup`] returns canned candidate lists for tests.
//!
//! A lookup returns the raw candidate list reported by the service. Turning
//! that list into a [`ResolutionOutcome`](crate::models::ResolutionOutcome)
//! is left to the caller, so that "no match" and "several matches" stay
//! distinguishable from transport and parse failures.

mod eutils;
pub mod mock;

pub use eutils::{parse_esearch, EutilsClient};
pub use mock::{LookupCall, MockLookup};

use async_trait::async_trait;

use crate::models::LookupKey;

/// Resolves identifiers and titles to candidate PMIDs.
#[async_trait]
pub trait PmidLookup: Send + Sync + std::fmt::Debug {
    /// Look up a PMCID or DOI
    async fn resolve_by_identifier(&self, id: &str) -> Result<Vec<String>, LookupError>;

    /// Look up a normalized article title, restricted to the title field
    async fn resolve_by_title(&self, title: &str) -> Result<Vec<String>, LookupError>;

    /// Dispatch on the key variant
    async fn resolve(&self, key: &LookupKey) -> Result<Vec<String>, LookupError> {
        match key {
            LookupKey::PmcId(id) | LookupKey::Doi(id) => self.resolve_by_identifier(id).await,
            LookupKey::Title(title) => self.resolve_by_title(title).await,
        }
    }
}

/// Errors that can occur during a single lookup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The request could not be completed
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a non-success HTTP status
    #[error("Lookup service returned status: {0}")]
    Status(u16),

    /// The response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    ResponseShape(String),
}

impl LookupError {
    /// Whether the failure happened before a response body was read
    pub fn is_transport(&self) -> bool {
        matches!(self, LookupError::Network(_) | LookupError::Status(_))
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::ResponseShape(format!("JSON: {}", err))
    }
}

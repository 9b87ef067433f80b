//! # Scholar PMID
//!
//! Resolves the articles listed on a Google Scholar results page to their
//! PubMed identifiers (PMIDs) and injects a link to each PubMed record into
//! the page.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`extract`]: Lookup key extraction (PMCID, DOI, or title) and hostname normalization
//! - [`lookup`]: PMID lookup clients (NCBI E-utilities eSearch) behind the [`PmidLookup`] trait
//! - [`render`]: Display fragments for resolution outcomes
//! - [`page`]: Results page adapter (block enumeration and fragment placement)
//! - [`orchestrator`]: Concurrent per-block dispatch and result routing
//! - [`models`]: Core data structures (LookupKey, ResolutionOutcome, reports)
//! - [`config`]: Configuration management
//! - [`utils`]: HTTP client and other utilities
//! - [`ui`]: Report formatting for the CLI

pub mod config;
pub mod extract;
pub mod lookup;
pub mod models;
pub mod orchestrator;
pub mod page;
pub mod render;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use extract::{Extractor, HostnameNormalizer};
pub use lookup::{EutilsClient, LookupError, PmidLookup};
pub use models::{LookupKey, Provenance, ResolutionOutcome};
pub use orchestrator::Annotator;
pub use page::ScholarPage;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

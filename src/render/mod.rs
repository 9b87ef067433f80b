//! Display fragments for resolution outcomes.
//!
//! A fragment is a small `<ul>` list appended to a result block: the PMID
//! and a PubMed link when the lookup resolved, or a notice when it did
//! not. The list carries a `by-id` or `by-title` class recording which
//! kind of key produced it.

use crate::config::Config;
use crate::models::{Provenance, ResolutionOutcome};
use crate::utils::escape_html;

/// Notice rendered when the lookup found zero or several records
pub const UNRESOLVED_NOTICE: &str = "No or multiple matched records";

/// Markup ready to be appended to a block's output slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFragment {
    pub provenance: Provenance,
    pub body: FragmentBody,
}

/// What a fragment shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentBody {
    /// PMID plus a link to its PubMed record
    Record { pmid: String, url: String },
    /// [`UNRESOLVED_NOTICE`]
    Unresolved,
}

impl DisplayFragment {
    /// Serialize the fragment as HTML
    pub fn to_html(&self) -> String {
        let items = match &self.body {
            FragmentBody::Record { pmid, url } => format!(
                "<li>PMID: {}</li><li><a href=\"{}\" target=\"_blank\" rel=\"noopener\">PubMed</a></li>",
                escape_html(pmid),
                escape_html(url)
            ),
            FragmentBody::Unresolved => format!("<li>{}</li>", UNRESOLVED_NOTICE),
        };

        format!(
            "<ul class=\"{}\">{}</ul>",
            self.provenance.css_class(),
            items
        )
    }

    /// One-line plain text rendition
    pub fn to_text(&self) -> String {
        match &self.body {
            FragmentBody::Record { pmid, url } => format!("PMID: {} ({})", pmid, url),
            FragmentBody::Unresolved => UNRESOLVED_NOTICE.to_string(),
        }
    }
}

/// Builds fragments linking to PubMed records.
#[derive(Debug, Clone)]
pub struct Renderer {
    pubmed_url: String,
}

impl Renderer {
    pub fn new(pubmed_url: impl Into<String>) -> Self {
        Self {
            pubmed_url: pubmed_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.eutils.pubmed_url.clone())
    }

    /// Canonical PubMed record URL for a PMID
    pub fn record_url(&self, pmid: &str) -> String {
        format!("{}/{}/", self.pubmed_url.trim_end_matches('/'), pmid)
    }

    pub fn render(&self, outcome: &ResolutionOutcome, provenance: Provenance) -> DisplayFragment {
        let body = match outcome {
            ResolutionOutcome::Resolved { pmid } => FragmentBody::Record {
                pmid: pmid.clone(),
                url: self.record_url(pmid),
            },
            ResolutionOutcome::Unresolved => FragmentBody::Unresolved,
        };

        DisplayFragment { provenance, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> Renderer {
        Renderer::new("https://pubmed.ncbi.nlm.nih.gov/")
    }

    #[test]
    fn test_resolved_fragment() {
        let outcome = ResolutionOutcome::Resolved {
            pmid: "12345678".to_string(),
        };
        let html = renderer()
            .render(&outcome, Provenance::ByIdentifier)
            .to_html();

        assert_eq!(
            html,
            "<ul class=\"by-id\"><li>PMID: 12345678</li>\
             <li><a href=\"https://pubmed.ncbi.nlm.nih.gov/12345678/\" target=\"_blank\" rel=\"noopener\">PubMed</a></li></ul>"
        );
    }

    #[test]
    fn test_unresolved_fragment() {
        let fragment = renderer().render(&ResolutionOutcome::Unresolved, Provenance::ByTitle);

        assert_eq!(
            fragment.to_html(),
            "<ul class=\"by-title\"><li>No or multiple matched records</li></ul>"
        );
        assert_eq!(fragment.to_text(), UNRESOLVED_NOTICE);
    }

    #[test]
    fn test_record_url_joins_cleanly() {
        assert_eq!(
            Renderer::new("https://pubmed.ncbi.nlm.nih.gov").record_url("1"),
            "https://pubmed.ncbi.nlm.nih.gov/1/"
        );
        assert_eq!(renderer().record_url("1"), "https://pubmed.ncbi.nlm.nih.gov/1/");
    }

    #[test]
    fn test_unexpected_pmid_text_is_escaped() {
        let outcome = ResolutionOutcome::Resolved {
            pmid: "<script>".to_string(),
        };
        let html = renderer().render(&outcome, Provenance::ByTitle).to_html();
        assert!(html.contains("PMID: &lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}

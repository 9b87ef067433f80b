//! Lookup key extraction from result block content.
//!
//! A block yields exactly one [`LookupKey`]. The article URL is searched
//! for a PMCID first and a DOI second; when neither is present (or the
//! block has no link) the title text is normalized into a title query.

mod hostname;

pub use hostname::HostnameNormalizer;

use regex::Regex;
use std::sync::LazyLock;

use crate::config::Config;
use crate::models::LookupKey;

static PMCID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)pmc[0-9]+").expect("PMCID pattern is valid"));

// Runs to end of string: URL paths are taken as the DOI suffix verbatim.
static DOI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"10\.[0-9]+/.*").expect("DOI pattern is valid"));

// The leading tag such as "[HTML]" or "[CITATION]" and the blank after it.
// Scholar may render the tag twice back to back ("[PDF][PDF]").
static LEADING_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\[[^\]]*\])+\s*").expect("tag pattern is valid"));

static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W").expect("non-word pattern is valid"));

/// Chooses the lookup key for a result block.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    normalizer: HostnameNormalizer,
}

impl Extractor {
    pub fn new(normalizer: HostnameNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(HostnameNormalizer::new(config.hostname_rules.clone()))
    }

    /// Pick the key for a block: PMCID, then DOI, then title.
    pub fn extract(&self, url: Option<&str>, title: &str) -> LookupKey {
        if let Some(url) = url {
            let url = self.normalizer.normalize(url);

            if let Some(m) = PMCID_RE.find(&url) {
                return LookupKey::PmcId(m.as_str().to_string());
            }
            if let Some(m) = DOI_RE.find(&url) {
                return LookupKey::Doi(m.as_str().to_string());
            }
        }

        LookupKey::Title(normalize_title(title))
    }
}

/// Strip a leading bracketed tag and blank out non-word characters.
pub fn normalize_title(title: &str) -> String {
    let untagged = LEADING_TAG_RE.replace(title, "");
    NON_WORD_RE.replace_all(&untagged, " ").into_owned()
}

//! Lookup keys extracted from a result block.

use serde::Serialize;

/// The key used to look up a single result block in PubMed.
///
/// Exactly one key is chosen per block, with precedence
/// `PmcId > Doi > Title`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum LookupKey {
    /// PubMed Central identifier, e.g. `PMC1234567`
    PmcId(String),

    /// Digital Object Identifier, e.g. `10.1038/s41586-020-1234-5`
    Doi(String),

    /// Normalized article title (brackets stripped, non-word characters blanked)
    Title(String),
}

impl LookupKey {
    /// Which lookup strategy this key resolves through
    pub fn provenance(&self) -> Provenance {
        match self {
            LookupKey::PmcId(_) | LookupKey::Doi(_) => Provenance::ByIdentifier,
            LookupKey::Title(_) => Provenance::ByTitle,
        }
    }

    /// The raw search term sent to the lookup service
    pub fn value(&self) -> &str {
        match self {
            LookupKey::PmcId(v) | LookupKey::Doi(v) | LookupKey::Title(v) => v,
        }
    }

    /// Short kind label for display
    pub fn kind(&self) -> &'static str {
        match self {
            LookupKey::PmcId(_) => "pmcid",
            LookupKey::Doi(_) => "doi",
            LookupKey::Title(_) => "title",
        }
    }
}

impl std::fmt::Display for LookupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind(), self.value())
    }
}

/// Records which kind of key produced a resolution outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Resolved through a PMCID or DOI
    ByIdentifier,
    /// Resolved through the article title
    ByTitle,
}

impl Provenance {
    /// CSS class attached to rendered fragments
    pub fn css_class(&self) -> &'static str {
        match self {
            Provenance::ByIdentifier => "by-id",
            Provenance::ByTitle => "by-title",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_keys_share_provenance() {
        assert_eq!(
            LookupKey::PmcId("PMC1".to_string()).provenance(),
            Provenance::ByIdentifier
        );
        assert_eq!(
            LookupKey::Doi("10.1/x".to_string()).provenance(),
            Provenance::ByIdentifier
        );
        assert_eq!(
            LookupKey::Title("x".to_string()).provenance(),
            Provenance::ByTitle
        );
    }

    #[test]
    fn test_key_serializes_tagged() {
        let key = LookupKey::Doi("10.1038/abc".to_string());
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, r#"{"type":"doi","value":"10.1038/abc"}"#);
    }
}

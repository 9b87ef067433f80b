//! Rewrites platform-specific URL prefixes into DOI prefixes.

use crate::config::HostnameRule;

/// Applies the configured hostname rules to article URLs.
///
/// Some publishers put the DOI suffix in the URL path but not the DOI
/// prefix (`https://www.nature.com/articles/s41586-...`). Swapping the
/// host part for the registrant prefix makes such URLs DOI-shaped.
#[derive(Debug, Clone, Default)]
pub struct HostnameNormalizer {
    rules: Vec<HostnameRule>,
}

impl HostnameNormalizer {
    pub fn new(rules: Vec<HostnameRule>) -> Self {
        let rules = rules
            .into_iter()
            .filter(|rule| !rule.prefix.is_empty())
            .collect();
        Self { rules }
    }

    /// Rewrite the first occurrence of every matching prefix, in rule order.
    pub fn normalize(&self, url: &str) -> String {
        let mut normalized = url.to_string();
        for rule in &self.rules {
            if normalized.contains(&rule.prefix) {
                normalized = normalized.replacen(&rule.prefix, &rule.doi_prefix, 1);
            }
        }
        normalized
    }
}

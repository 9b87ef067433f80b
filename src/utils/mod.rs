//! Utility modules.
//!
//! - [`HttpClient`]: Shared HTTP client used for lookups and page fetching
//! - [`escape_html`]: Escaping for text and attribute values in rendered markup

mod http;

pub use http::HttpClient;

/// Escape text for inclusion in HTML content or double-quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

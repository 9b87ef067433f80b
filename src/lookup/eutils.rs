//! PMID lookup through the NCBI E-utilities eSearch API.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::config::{Config, EutilsConfig};
use crate::lookup::{LookupError, PmidLookup};
use crate::utils::HttpClient;

/// eSearch client returning candidate PMIDs as JSON.
///
/// Each call issues exactly one request. Failures are returned to the
/// caller unchanged; there is no retry.
#[derive(Debug, Clone)]
pub struct EutilsClient {
    client: Arc<HttpClient>,
    esearch_url: String,
    api_key: Option<String>,
}

impl EutilsClient {
    /// Create a client over an existing HTTP client
    pub fn new(config: &EutilsConfig, client: Arc<HttpClient>) -> Self {
        Self {
            client,
            esearch_url: config.esearch_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Create a client with its own HTTP client built from configuration
    pub fn from_config(config: &Config) -> Result<Self, LookupError> {
        let client = HttpClient::with_config(&config.http)?;
        Ok(Self::new(&config.eutils, Arc::new(client)))
    }

    /// Build eSearch URL for a search term, optionally restricted to a field
    fn build_search_url(&self, term: &str, field: Option<&str>) -> String {
        let mut params = vec![("db", "pubmed"), ("retmode", "json")];

        if let Some(key) = &self.api_key {
            params.push(("api_key", key.as_str()));
        }

        params.push(("term", term));

        if let Some(field) = field {
            params.push(("field", field));
        }

        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.esearch_url, query)
    }

    async fn esearch(&self, url: &str) -> Result<Vec<String>, LookupError> {
        tracing::debug!(url = %redact_api_key(url), "eSearch request");

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| LookupError::Network(format!("Failed to query eSearch: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Network(format!("Failed to read response: {}", e)))?;

        parse_esearch(&body)
    }
}

#[async_trait]
impl PmidLookup for EutilsClient {
    async fn resolve_by_identifier(&self, id: &str) -> Result<Vec<String>, LookupError> {
        let url = self.build_search_url(id, None);
        self.esearch(&url).await
    }

    async fn resolve_by_title(&self, title: &str) -> Result<Vec<String>, LookupError> {
        let url = self.build_search_url(title, Some("title"));
        self.esearch(&url).await
    }
}

/// Parse an eSearch JSON body into its candidate PMID list.
///
/// The `esearchresult.idlist` field must be present; an `ERROR` message
/// reported in its place is carried into the error.
pub fn parse_esearch(body: &str) -> Result<Vec<String>, LookupError> {
    #[derive(Debug, Deserialize)]
    struct ESearchEnvelope {
        esearchresult: ESearchResult,
    }

    #[derive(Debug, Deserialize)]
    struct ESearchResult {
        #[serde(default)]
        idlist: Option<Vec<String>>,
        #[serde(rename = "ERROR", default)]
        error: Option<String>,
    }

    let envelope: ESearchEnvelope = serde_json::from_str(body)?;

    match envelope.esearchresult {
        ESearchResult {
            idlist: Some(ids), ..
        } => Ok(ids),
        ESearchResult {
            error: Some(message),
            ..
        } => Err(LookupError::ResponseShape(format!(
            "eSearch reported an error: {}",
            message
        ))),
        _ => Err(LookupError::ResponseShape(
            "esearchresult has no idlist".to_string(),
        )),
    }
}

fn redact_api_key(url: &str) -> String {
    match url.find("api_key=") {
        Some(start) => {
            let value_start = start + "api_key=".len();
            let value_end = url[value_start..]
                .find('&')
                .map(|i| value_start + i)
                .unwrap_or(url.len());
            format!("{}***{}", &url[..value_start], &url[value_end..])
        }
        None => url.to_string(),
    }
}

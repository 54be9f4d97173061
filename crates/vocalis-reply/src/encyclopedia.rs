//! Encyclopedia lookup.
//!
//! `WikipediaClient` resolves a free-form term to page titles with the
//! OpenSearch API (the auto-suggest step), then reads page summaries from
//! the REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use crate::error::{ReplyError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    Standard,
    Disambiguation,
    Other(String),
}

impl From<&str> for PageKind {
    fn from(kind: &str) -> Self {
        match kind {
            "standard" => Self::Standard,
            "disambiguation" => Self::Disambiguation,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub title: String,
    pub kind: PageKind,
    pub extract: String,
}

#[async_trait]
pub trait Encyclopedia: Send + Sync {
    /// Page titles matching `term`, best match first.
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<String>>;

    /// Summary of one page, `None` if the page does not exist.
    async fn summary(&self, title: &str) -> Result<Option<PageSummary>>;
}

#[derive(Debug, Clone)]
pub struct WikipediaConfig {
    /// Overrides `https://{language}.wikipedia.org`
    pub base_url: Option<String>,
    pub language: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            language: "en".to_string(),
            timeout: Duration::from_secs(10),
            user_agent: format!("vocalis/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

pub struct WikipediaClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl WikipediaClient {
    pub fn new(config: WikipediaConfig) -> Result<Self> {
        let base = config
            .base_url
            .unwrap_or_else(|| format!("https://{}.wikipedia.org", config.language));
        let base_url = Url::parse(&base)
            .map_err(|e| ReplyError::InvalidResponse(format!("invalid base URL {}: {}", base, e)))?;

        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ReplyError::InvalidResponse("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct RestSummary {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    extract: String,
}

#[async_trait]
impl Encyclopedia for WikipediaClient {
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<String>> {
        let url = self.endpoint(["w", "api.php"])?;
        let limit = limit.to_string();

        let response = self
            .http_client
            .get(url)
            .query(&[
                ("action", "opensearch"),
                ("search", term),
                ("limit", limit.as_str()),
                ("namespace", "0"),
                ("redirects", "resolve"),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?;

        // OpenSearch answers `[term, [titles], [descriptions], [urls]]`.
        let body: serde_json::Value = response.json().await?;
        let titles = body
            .get(1)
            .and_then(|titles| titles.as_array())
            .ok_or_else(|| ReplyError::InvalidResponse("malformed OpenSearch response".to_string()))?
            .iter()
            .filter_map(|title| title.as_str().map(str::to_string))
            .collect();
        Ok(titles)
    }

    async fn summary(&self, title: &str) -> Result<Option<PageSummary>> {
        let url = self.endpoint(["api", "rest_v1", "page", "summary", title])?;

        let response = self
            .http_client
            .get(url)
            .query(&[("redirect", "true")])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let summary: RestSummary = response.error_for_status()?.json().await?;
        Ok(Some(PageSummary {
            title: if summary.title.is_empty() {
                title.to_string()
            } else {
                summary.title
            },
            kind: PageKind::from(summary.kind.as_str()),
            extract: summary.extract,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url_uses_language() {
        let client = WikipediaClient::new(WikipediaConfig {
            language: "de".to_string(),
            ..WikipediaConfig::default()
        })
        .unwrap();
        let url = client.endpoint(["w", "api.php"]).unwrap();
        assert_eq!(url.as_str(), "https://de.wikipedia.org/w/api.php");
    }

    #[test]
    fn test_summary_title_is_percent_encoded() {
        let client = WikipediaClient::new(WikipediaConfig::default()).unwrap();
        let url = client
            .endpoint(["api", "rest_v1", "page", "summary", "C/C++ (language)"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://en.wikipedia.org/api/rest_v1/page/summary/C%2FC++%20(language)"
        );
    }

    #[test]
    fn test_page_kind_parsing() {
        assert_eq!(PageKind::from("standard"), PageKind::Standard);
        assert_eq!(PageKind::from("disambiguation"), PageKind::Disambiguation);
        assert_eq!(PageKind::from("no-extract"), PageKind::Other("no-extract".to_string()));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = WikipediaClient::new(WikipediaConfig {
            base_url: Some("not a url".to_string()),
            ..WikipediaConfig::default()
        });
        assert!(result.is_err());
    }
}

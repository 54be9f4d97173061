use async_trait::async_trait;
use reqwest::Response;
use vocalis_types::{ErrorResponse, Exchange, HistoryResponse, ProcessRequest, ProcessResponse};

use crate::error::{ClientError, Result};

/// Server side of the round trip
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send finalized text, get the assistant reply.
    async fn process(&self, text: &str) -> Result<String>;

    /// Recent exchanges for redisplay
    async fn history(&self) -> Result<Vec<Exchange>>;
}

/// `ChatBackend` over the HTTP API
pub struct HttpBackend {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(http_client, base_url))
    }

    pub fn with_client(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Map non-2xx responses to `ClientError::Server`, using the `{error}` body when present.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error)
        .unwrap_or(body);

    Err(ClientError::Server {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn process(&self, text: &str) -> Result<String> {
        let response = self
            .http_client
            .post(format!("{}/process", self.base_url))
            .json(&ProcessRequest::new(text))
            .send()
            .await?;

        let body: ProcessResponse = check_status(response).await?.json().await?;
        Ok(body.reply)
    }

    async fn history(&self) -> Result<Vec<Exchange>> {
        let response = self
            .http_client
            .get(format!("{}/history", self.base_url))
            .send()
            .await?;

        let body: HistoryResponse = check_status(response).await?.json().await?;
        Ok(body.messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let backend = HttpBackend::new("http://127.0.0.1:5000/").unwrap();
        assert_eq!(backend.base_url(), "http://127.0.0.1:5000");
    }
}

//! Transport used by the typed client.

use async_trait::async_trait;

use super::ClientError;

/// Performs an authenticated GET and returns the response body.
///
/// `path_and_query` is relative to the API base, e.g.
/// `/api/programs/prog_1/revenue?event=sales`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, path_and_query: &str) -> Result<String, ClientError>;
}

/// [`Fetcher`] over `reqwest` with a Bearer API token.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, path_and_query: &str) -> Result<String, ClientError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path_and_query))
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

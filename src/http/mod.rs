use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

pub const SITE_URL_ENV: &str = "BANDSTAND_SITE_URL";
pub const DEFAULT_SITE_URL: &str = "http://localhost:8000";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for {path} failed: {source}")]
    Request {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{path} returned {status}")]
    Status { path: String, status: StatusCode },
}

/// The one seam between this process and the site's content tree. The
/// store and parser consume the trait, not the client, so tests can serve
/// documents from memory.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError>;
    async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, FetchError>;
}

pub struct SiteClient {
    base_url: String,
    client: reqwest::Client,
}

impl SiteClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        let base_url =
            std::env::var(SITE_URL_ENV).unwrap_or_else(|_| DEFAULT_SITE_URL.to_string());
        Self::new(base_url)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, FetchError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|source| FetchError::Request {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl Fetch for SiteClient {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        self.get(path)
            .await?
            .text()
            .await
            .map_err(|source| FetchError::Request {
                path: path.to_string(),
                source,
            })
    }

    async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let bytes = self
            .get(path)
            .await?
            .bytes()
            .await
            .map_err(|source| FetchError::Request {
                path: path.to_string(),
                source,
            })?;
        Ok(bytes.to_vec())
    }
}

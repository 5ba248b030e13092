use std::time::Duration;
use async_trait::async_trait;
use tracing::debug;
use crate::error::{AuditError, Result};

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of remote asset bytes for the static comparison.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Fetches `url` on behalf of the asset `name`. Anything other than a
    /// successful response with a body is an error.
    async fn fetch(&self, name: &str, url: &str) -> Result<Vec<u8>>;
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sendcheck/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait]
impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, name: &str, url: &str) -> Result<Vec<u8>> {
        let fetch_error = |reason: String| AuditError::Fetch {
            name: name.to_string(),
            url: url.to_string(),
            reason,
        };

        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| fetch_error(format!("failed to read body: {}", e)))?;

        Ok(body.to_vec())
    }
}

mod builder;

use crate::error::{ClientError, Result};
pub use crate::log_debug;
pub use builder::ClientBuilder;
use reqwest::Client as ReqwestClient;
use url::Url;

#[derive(Debug)]
pub struct ClientResponse {
    pub status: u16,
    pub content: String,
}

pub struct Client {
    inner: ReqwestClient,
    base_url: Option<String>,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Fetches `target`, an absolute URL or a path relative to the base URL.
    /// Non-success statuses are errors.
    pub async fn get(&self, target: &str) -> Result<ClientResponse> {
        let url = self.build_url(target)?;
        self.request(&url).await
    }

    fn build_url(&self, target: &str) -> Result<String> {
        let target = target.trim();
        if let Ok(url) = Url::parse(target) {
            return match url.scheme() {
                "http" | "https" => Ok(url.to_string()),
                scheme => Err(ClientError::InvalidUrl(format!(
                    "Unsupported scheme '{}' in {}",
                    scheme, target
                ))
                .into()),
            };
        }

        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| ClientError::InvalidUrl(format!("Not an absolute URL: {}", target)))?;

        let base = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("Invalid base URL: {}", e)))?;

        let full_url = base
            .join(target)
            .map_err(|e| ClientError::InvalidUrl(format!("Invalid path: {}", e)))?;

        Ok(full_url.to_string())
    }

    async fn request(&self, url: &str) -> Result<ClientResponse> {
        log_debug!("[client] GET {}", url);

        let response = self.inner.get(url).send().await.map_err(classify)?;

        let status = response.status().as_u16();
        let is_success = response.status().is_success();
        let reason = response
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string();

        if !is_success {
            return Err(ClientError::ResponseError {
                status_code: status,
                message: reason,
            }
            .into());
        }

        let content = response.text().await.map_err(|e| {
            ClientError::RequestFailed(format!("Failed to get response text: {}", e))
        })?;

        Ok(ClientResponse { status, content })
    }
}

fn classify(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout(e.to_string())
    } else {
        ClientError::RequestFailed(e.to_string())
    }
}

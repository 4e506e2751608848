use super::Client;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use http::{
    header::{HeaderMap, HeaderName},
    HeaderValue,
};
use reqwest::Client as ReqwestClient;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

#[derive(Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    headers: HeaderMap,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
            ..Default::default()
        }
    }

    /// Builder preloaded from the `[client]` config section.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .header("user-agent", &config.user_agent)?
            .header("accept", "text/html,application/xhtml+xml")?
            .header("accept-language", "en-US,en;q=0.7")
    }

    /// Relative paths passed to [`Client::get`] are joined onto this URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn header<K, V>(mut self, key: K, value: V) -> Result<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let header_name = HeaderName::from_str(key.as_ref())
            .map_err(|e| ClientError::BuildError(format!("Invalid header name: {}", e)))?;

        let header_value = HeaderValue::from_str(value.as_ref())
            .map_err(|e| ClientError::BuildError(format!("Invalid header value: {}", e)))?;

        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn build(self) -> Result<Client> {
        if let Some(base_url) = &self.base_url {
            Url::parse(base_url)
                .map_err(|e| ClientError::InvalidUrl(format!("Invalid base URL: {}", e)))?;
        }

        let mut client_builder = ReqwestClient::builder().default_headers(self.headers);

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let inner = client_builder
            .build()
            .map_err(|e| ClientError::BuildError(format!("Failed to build client: {}", e)))?;

        Ok(Client {
            inner,
            base_url: self.base_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_header_name() {
        assert!(ClientBuilder::new().header("bad header", "x").is_err());
    }

    #[test]
    fn rejects_bad_base_url() {
        let err = ClientBuilder::new().base_url("not a url").build().err().unwrap();
        assert_eq!(err.kind(), "network");
    }
}

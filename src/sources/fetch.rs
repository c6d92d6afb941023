//! HTTP source retrieval
//!
//! The network collaborator of the pipeline. Sources are public playlist
//! mirrors that occasionally gate on browser-looking headers, so requests
//! carry a browser User-Agent and permissive Accept headers. Failures map
//! to `SourceError` and are isolated per source by the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use tracing::debug;

use crate::config::FetchConfig;
use crate::errors::SourceError;

use super::SourceFetcher;

pub struct HttpSourceFetcher {
    client: reqwest::Client,
}

impl HttpSourceFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/plain,text/html,*/*"));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
        );

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::acquisition("<client>", e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl SourceFetcher for HttpSourceFetcher {
    async fn fetch(&self, url: &str) -> Result<String, SourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::acquisition(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::acquisition(
                url,
                format!("HTTP status {status}"),
            ));
        }

        debug!(
            "Fetched {} ({} bytes declared)",
            url,
            response
                .content_length()
                .map(|l| l.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );

        // Body decode failures count as payload problems, not network ones.
        response
            .text()
            .await
            .map_err(|e| SourceError::parse(url, e.to_string()))
    }
}

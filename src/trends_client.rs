use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::Error as _;

use crate::config::DashboardConfig;
use crate::errors::FetchError;
use crate::models::{TrendItem, TrendsResponse};

/// Anything that can produce the current trends list.
///
/// Called from a worker thread, so implementations may block.
pub trait TrendsSource: Send + Sync + 'static {
    fn fetch_trends(&self) -> Result<Vec<TrendItem>, FetchError>;
}

/// Blocking HTTP client for the trends service.
pub struct TrendsClient {
    client: Client,
    trends_url: String,
}

impl TrendsClient {
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            trends_url: config.trends_url(),
        })
    }

    pub fn trends_url(&self) -> &str {
        &self.trends_url
    }
}

impl TrendsSource for TrendsClient {
    fn fetch_trends(&self) -> Result<Vec<TrendItem>, FetchError> {
        let transport = |source| FetchError::Transport {
            url: self.trends_url.clone(),
            source,
        };

        let response = self.client.get(&self.trends_url).send().map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.trends_url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(transport)?;
        parse_trends_body(&self.trends_url, &body)
    }
}

/// Validate a response body against the `{"trends": [...]}` contract.
///
/// Only a JSON object is accepted at the top level; serde would otherwise
/// happily read a struct out of a positional array.
pub fn parse_trends_body(url: &str, body: &[u8]) -> Result<Vec<TrendItem>, FetchError> {
    let decode = |source| FetchError::Decode {
        url: url.to_string(),
        source,
    };

    let value: serde_json::Value = serde_json::from_slice(body).map_err(decode)?;
    if !value.is_object() {
        return Err(decode(serde_json::Error::custom(
            "expected a JSON object with a `trends` array",
        )));
    }

    let response = TrendsResponse::deserialize(value).map_err(decode)?;
    Ok(response.trends)
}

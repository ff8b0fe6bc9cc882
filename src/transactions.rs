use log::debug;
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::{NodeConfig, TX_COUNT};
use crate::models::TransactionApiResponse;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("full node unreachable at {url}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("full node returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected response body: {body}")]
    Decode {
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// True when the node could not be reached at all, as opposed to
    /// answering with something unusable.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }
}

pub fn build_client(config: &NodeConfig) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(FetchError::Client)
}

/// Fetches the most recent `TX_COUNT` transactions, newest first, in the
/// order the node returns them.
pub async fn fetch_transactions(
    client: &reqwest::Client,
    config: &NodeConfig,
) -> Result<TransactionApiResponse, FetchError> {
    let url = config.transactions_url();
    let count = TX_COUNT.to_string();

    debug!("Fetching URL: {}?type=tx&count={}", url, count);
    let unreachable = |source| FetchError::Unreachable {
        url: url.clone(),
        source,
    };
    let response = client
        .get(&url)
        .query(&[("type", "tx"), ("count", count.as_str())])
        .send()
        .await
        .map_err(unreachable)?;

    let status = response.status();
    debug!("Response status: {}", status);

    let body = response.text().await.map_err(unreachable)?;
    if !status.is_success() {
        return Err(FetchError::Status { status, body });
    }

    serde_json::from_str(&body).map_err(|source| FetchError::Decode { body, source })
}

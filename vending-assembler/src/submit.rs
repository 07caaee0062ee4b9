//! Submits a built, signed transaction to the network (spec §4.F): "returns
//! before on-chain finality", mirroring the Blockfrost-compatible HTTP
//! client conventions already used by `vending-indexer`.

use std::time::Duration;

use vending_primitives::NetworkId;

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("submission rejected: {0}")]
    Rejected(String),
    #[error("submission timed out: {0}")]
    Timeout(String),
}

pub struct BlockfrostSubmitter {
    http: reqwest::Client,
    base_url: String,
    project_token: String,
}

impl BlockfrostSubmitter {
    pub fn new(network: NetworkId, project_token: impl Into<String>) -> Self {
        let base_url = if network.is_mainnet() {
            "https://cardano-mainnet.blockfrost.io/api/v0"
        } else {
            "https://cardano-preview.blockfrost.io/api/v0"
        };
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("reqwest client builds"),
            base_url: base_url.to_string(),
            project_token: project_token.into(),
        }
    }

    /// Submits raw transaction CBOR bytes, returning the accepted tx hash.
    pub async fn submit(&self, tx_bytes: &[u8]) -> Result<String, SubmitError> {
        let url = format!("{}/tx/submit", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("project_id", &self.project_token)
            .header("Content-Type", "application/cbor")
            .body(tx_bytes.to_vec())
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    SubmitError::Timeout(err.to_string())
                } else {
                    SubmitError::Rejected(err.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SubmitError::Rejected(format!("{status}: {body}")));
        }

        response
            .text()
            .await
            .map(|tx_hash| tx_hash.trim_matches('"').to_string())
            .map_err(|err| SubmitError::Rejected(err.to_string()))
    }
}

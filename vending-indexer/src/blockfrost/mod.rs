mod types;

use std::collections::HashSet;
use std::time::Duration;

use tracing::debug;

use vending_primitives::{AssetId, TransactionView, TxRef, UTxO};

use crate::error::IndexerError;
use crate::retry::with_retry;
use crate::{AssetRecord, Indexer};

use types::{BfAssetResponse, BfTxDetail, BfTxUtxos, BfUtxo};

/// A Blockfrost-compatible HTTP indexer client (§6): auth via a project
/// token header, network selection baked into the base URL.
pub struct BlockfrostIndexer {
    http: reqwest::Client,
    base_url: String,
    project_token: String,
}

impl BlockfrostIndexer {
    pub fn mainnet(project_token: impl Into<String>) -> Self {
        Self::new("https://cardano-mainnet.blockfrost.io/api/v0", project_token)
    }

    pub fn preview(project_token: impl Into<String>) -> Self {
        Self::new("https://cardano-preview.blockfrost.io/api/v0", project_token)
    }

    pub fn new(base_url: impl Into<String>, project_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            project_token: project_token.into(),
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, IndexerError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .header("project_id", &self.project_token)
            .send()
            .await
            .map_err(IndexerError::from)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(if status.is_server_error() || status.as_u16() == 429 {
                IndexerError::Transient(format!("{status}: {body}"))
            } else {
                IndexerError::Permanent(format!("{status}: {body}"))
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| IndexerError::Permanent(err.to_string()))
    }
}

impl Indexer for BlockfrostIndexer {
    async fn utxos_at(
        &self,
        address: &str,
        exclusions: &HashSet<TxRef>,
    ) -> Result<Vec<UTxO>, IndexerError> {
        let path = format!("/addresses/{address}/utxos");
        let utxos: Vec<BfUtxo> =
            with_retry("utxos_at", || self.get::<Vec<BfUtxo>>(&path)).await?;

        Ok(utxos
            .into_iter()
            .map(|utxo| utxo.into_utxo(address))
            .filter(|utxo| !exclusions.contains(&utxo.reference))
            .collect())
    }

    async fn transaction(&self, tx_hash: &str) -> Result<TransactionView, IndexerError> {
        let utxos_path = format!("/txs/{tx_hash}/utxos");
        let tx: BfTxUtxos = with_retry("transaction", || self.get::<BfTxUtxos>(&utxos_path)).await?;
        debug!(tx_hash, inputs = tx.inputs.len(), "fetched transaction detail");

        let detail_path = format!("/txs/{tx_hash}");
        let detail: BfTxDetail = with_retry("transaction_detail", || self.get::<BfTxDetail>(&detail_path)).await?;

        let mut view = tx.into_view(tx_hash);
        view.fees = detail.fees.parse().unwrap_or(0);
        Ok(view)
    }

    async fn assets_under(&self, policy_id_hex: &str) -> Result<Vec<AssetId>, IndexerError> {
        let path = format!("/assets/policy/{policy_id_hex}");
        let assets: Vec<BfAssetResponse> =
            with_retry("assets_under", || self.get::<Vec<BfAssetResponse>>(&path)).await?;
        assets
            .into_iter()
            .map(|asset| AssetId::parse(asset.asset).map_err(|err| IndexerError::Permanent(err.to_string())))
            .collect()
    }

    async fn asset(&self, asset_id: &AssetId) -> Result<AssetRecord, IndexerError> {
        let path = format!("/assets/{}", asset_id.as_str());
        let asset: types::BfAsset = with_retry("asset", || self.get::<types::BfAsset>(&path)).await?;
        Ok(AssetRecord {
            asset_id: asset_id.clone(),
            quantity: asset.quantity.parse().unwrap_or(0),
            onchain_metadata: asset.onchain_metadata,
        })
    }

    async fn await_payment(
        &self,
        address: &str,
        tx_hash: Option<&str>,
        timeout: Duration,
    ) -> Result<UTxO, IndexerError> {
        let deadline = tokio::time::Instant::now() + timeout;
        let poll_interval = Duration::from_secs(2);
        loop {
            let utxos = self.utxos_at(address, &HashSet::new()).await?;
            let found = match tx_hash {
                Some(hash) => utxos.into_iter().find(|u| u.reference.tx_hash == hash),
                None => utxos.into_iter().next(),
            };
            if let Some(utxo) = found {
                return Ok(utxo);
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(IndexerError::Transient(format!(
                    "timed out waiting for payment at {address}"
                )));
            }
            tokio::time::sleep(poll_interval).await;
        }
    }
}

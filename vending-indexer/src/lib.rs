//! Chain-read API (spec §4.G): UTXOs at an address, transaction detail,
//! asset lookups under a policy, and a blocking "await payment" primitive,
//! backed by a Blockfrost-compatible HTTP indexer.

mod blockfrost;
mod error;
mod retry;

use std::collections::HashSet;
use std::time::Duration;

use vending_primitives::{AssetId, TransactionView, TxRef, UTxO};

pub use blockfrost::BlockfrostIndexer;
pub use error::{IndexerError, IndexerErrorKind};

/// A native asset as reported by the indexer's asset-lookup endpoint.
#[derive(Debug, Clone)]
pub struct AssetRecord {
    pub asset_id: AssetId,
    pub quantity: u64,
    pub onchain_metadata: Option<serde_json::Value>,
}

/// Chain read API (§4.G). Implementations are expected to retry transient
/// failures internally (§6, §7) and surface only `IndexerError::Permanent`
/// (or an exhausted `Transient`) to callers.
pub trait Indexer {
    fn utxos_at(
        &self,
        address: &str,
        exclusions: &HashSet<TxRef>,
    ) -> impl std::future::Future<Output = Result<Vec<UTxO>, IndexerError>>;

    fn transaction(
        &self,
        tx_hash: &str,
    ) -> impl std::future::Future<Output = Result<TransactionView, IndexerError>>;

    fn assets_under(
        &self,
        policy_id_hex: &str,
    ) -> impl std::future::Future<Output = Result<Vec<AssetId>, IndexerError>>;

    fn asset(
        &self,
        asset_id: &AssetId,
    ) -> impl std::future::Future<Output = Result<AssetRecord, IndexerError>>;

    /// Blocks (up to `timeout`) until a new UTXO is visible at `address`.
    /// When `tx_hash` is given, waits specifically for that transaction's
    /// output; otherwise returns on the first new UTXO seen (§4.G).
    fn await_payment(
        &self,
        address: &str,
        tx_hash: Option<&str>,
        timeout: Duration,
    ) -> impl std::future::Future<Output = Result<UTxO, IndexerError>>;
}

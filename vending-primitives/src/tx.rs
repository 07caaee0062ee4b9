use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::asset::AssetId;

pub type TxHash = pallas::crypto::hash::Hash<32>;

/// Addresses a single transaction output: the unit of payment and the unit
/// of exclusion (§3).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TxRef {
    pub tx_hash: String,
    pub output_index: u64,
}

impl TxRef {
    pub fn new(tx_hash: impl Into<String>, output_index: u64) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            output_index,
        }
    }
}

impl std::fmt::Display for TxRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.tx_hash, self.output_index)
    }
}

/// A UTXO: the unit of payment (§3). `multiasset` maps asset id to positive
/// quantity, matching the indexer's native-asset bundle representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UTxO {
    pub reference: TxRef,
    pub address: String,
    pub lovelace: u64,
    pub multiasset: BTreeMap<AssetId, u64>,
}

impl UTxO {
    pub fn quantity_of(&self, asset_id: &AssetId) -> u64 {
        self.multiasset.get(asset_id).copied().unwrap_or(0)
    }

    pub fn contains_asset(&self, asset_id: &AssetId) -> bool {
        self.quantity_of(asset_id) > 0
    }
}

/// The subset of a transaction's structure the whitelist engine needs to
/// inspect (§3): spending inputs and reference inputs carry their full
/// resolved UTXO (including the native-asset bundle), since Blockfrost's
/// `/txs/{hash}/utxos` endpoint returns exactly that; reference inputs are
/// never counted as "sent" to the vending machine.
#[derive(Debug, Clone)]
pub struct TransactionView {
    pub tx_hash: String,
    pub inputs: Vec<UTxO>,
    pub reference_inputs: Vec<UTxO>,
    pub outputs: Vec<UTxO>,
    pub fees: u64,
}

impl TransactionView {
    /// All assets spent as real (non-reference) inputs whose policy matches
    /// `policy_id_hex`.
    pub fn spent_assets_under_policy(&self, policy_id_hex: &str) -> Vec<AssetId> {
        self.inputs
            .iter()
            .flat_map(|utxo| utxo.multiasset.keys().cloned())
            .filter(|asset_id| asset_id.is_under_policy(policy_id_hex))
            .collect()
    }
}

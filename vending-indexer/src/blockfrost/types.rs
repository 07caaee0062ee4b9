use std::collections::BTreeMap;

use serde::Deserialize;
use vending_primitives::{AssetId, TransactionView, TxRef, UTxO};

#[derive(Debug, Deserialize)]
pub struct BfAmount {
    pub unit: String,
    pub quantity: String,
}

fn amounts_to_utxo(tx_hash: &str, output_index: u64, address: &str, amounts: &[BfAmount]) -> UTxO {
    let mut lovelace = 0u64;
    let mut multiasset = BTreeMap::new();
    for amount in amounts {
        if amount.unit == "lovelace" {
            lovelace = amount.quantity.parse().unwrap_or(0);
            continue;
        }
        if let Ok(asset_id) = AssetId::parse(amount.unit.clone()) {
            let qty: u64 = amount.quantity.parse().unwrap_or(0);
            multiasset.insert(asset_id, qty);
        }
    }
    UTxO {
        reference: TxRef::new(tx_hash, output_index),
        address: address.to_string(),
        lovelace,
        multiasset,
    }
}

#[derive(Debug, Deserialize)]
pub struct BfUtxo {
    pub tx_hash: String,
    pub output_index: u64,
    pub amount: Vec<BfAmount>,
}

impl BfUtxo {
    pub fn into_utxo(self, address: &str) -> UTxO {
        amounts_to_utxo(&self.tx_hash, self.output_index, address, &self.amount)
    }
}

#[derive(Debug, Deserialize)]
pub struct BfTxInput {
    pub tx_hash: String,
    pub output_index: u64,
    pub address: String,
    pub amount: Vec<BfAmount>,
    #[serde(default)]
    pub reference: bool,
}

#[derive(Debug, Deserialize)]
pub struct BfTxOutput {
    pub output_index: u64,
    pub address: String,
    pub amount: Vec<BfAmount>,
}

#[derive(Debug, Deserialize)]
pub struct BfTxUtxos {
    #[serde(default)]
    pub inputs: Vec<BfTxInput>,
    #[serde(default)]
    pub outputs: Vec<BfTxOutput>,
}

impl BfTxUtxos {
    pub fn into_view(self, tx_hash: &str) -> TransactionView {
        let mut inputs = Vec::new();
        let mut reference_inputs = Vec::new();
        for input in self.inputs {
            let utxo = amounts_to_utxo(&input.tx_hash, input.output_index, &input.address, &input.amount);
            if input.reference {
                reference_inputs.push(utxo);
            } else {
                inputs.push(utxo);
            }
        }
        let outputs = self
            .outputs
            .into_iter()
            .map(|output| amounts_to_utxo(tx_hash, output.output_index, &output.address, &output.amount))
            .collect();
        TransactionView {
            tx_hash: tx_hash.to_string(),
            inputs,
            reference_inputs,
            outputs,
            fees: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BfTxDetail {
    pub fees: String,
}

#[derive(Debug, Deserialize)]
pub struct BfAssetResponse {
    pub asset: String,
}

#[derive(Debug, Deserialize)]
pub struct BfAsset {
    pub quantity: String,
    pub onchain_metadata: Option<serde_json::Value>,
}

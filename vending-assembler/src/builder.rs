//! Transaction construction (spec §4.F): turns a [`MintRequest`] into a
//! signed, submittable Conway-era transaction using `pallas::txbuilder`,
//! following the same `StagingTransaction` shape as the root `hose` crate's
//! `builder` module and `hose-txbuilder`'s `TransactionBuilder`.

use pallas::crypto::hash::Hash;
use pallas::ledger::addresses::Address;
use pallas::txbuilder::{BuiltTransaction, Input, Output, StagingTransaction, TxBuilderError};

use vending_primitives::{MintAsset, MintRequest, PlannedOutput};

use crate::key::load_ed25519_key;
use crate::metadata::label_721_map;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("malformed input reference {0}")]
    BadTxHash(String),
    #[error("malformed address {0}: {1}")]
    BadAddress(String, String),
    #[error("malformed policy id {0}")]
    BadPolicyId(String),
    #[error(transparent)]
    TxBuilder(#[from] TxBuilderError),
    #[error(transparent)]
    KeyLoad(#[from] anyhow::Error),
}

fn parse_tx_hash(hex_str: &str) -> Result<Hash<32>, BuildError> {
    let bytes = hex::decode(hex_str).map_err(|_| BuildError::BadTxHash(hex_str.to_string()))?;
    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|_| BuildError::BadTxHash(hex_str.to_string()))?;
    Ok(Hash::from(bytes))
}

fn parse_address(addr: &str) -> Result<Address, BuildError> {
    Address::from_bech32(addr).map_err(|err| BuildError::BadAddress(addr.to_string(), err.to_string()))
}

fn planned_output_to_output(planned: &PlannedOutput) -> Result<Output, BuildError> {
    let address = parse_address(&planned.address)?;
    let mut output = Output::new(address, planned.lovelace);
    for (asset_id, quantity) in &planned.multiasset {
        let policy_bytes =
            hex::decode(asset_id.policy_id_hex()).map_err(|_| BuildError::BadPolicyId(asset_id.to_string()))?;
        let policy: [u8; 28] = policy_bytes
            .try_into()
            .map_err(|_| BuildError::BadPolicyId(asset_id.to_string()))?;
        let name = hex::decode(asset_id.name_hex()).map_err(|_| BuildError::BadPolicyId(asset_id.to_string()))?;
        output = output.add_asset(Hash::from(policy), name, *quantity)?;
    }
    Ok(output)
}

fn add_mint(tx: StagingTransaction, policy_id_hex: &str, mint: &[MintAsset]) -> Result<StagingTransaction, BuildError> {
    let policy_bytes = hex::decode(policy_id_hex).map_err(|_| BuildError::BadPolicyId(policy_id_hex.to_string()))?;
    let policy: [u8; 28] = policy_bytes
        .try_into()
        .map_err(|_| BuildError::BadPolicyId(policy_id_hex.to_string()))?;
    let policy_hash = Hash::from(policy);

    let mut tx = tx;
    for asset in mint {
        let name = hex::decode(&asset.asset_name_hex).map_err(|_| BuildError::BadPolicyId(asset.asset_name_hex.clone()))?;
        tx = tx.mint_asset(policy_hash, name, 1)?;
    }
    Ok(tx)
}

/// Builds, embeds metadata into, and signs the mint+pay+refund transaction
/// described by `request` (§4.E step g, §4.F). Does not submit it — that is
/// the caller's job (`submit.rs`), kept separate so the two network-facing
/// concerns (building vs. submitting) can be retried independently.
pub fn build_and_sign(request: &MintRequest) -> Result<BuiltTransaction, BuildError> {
    let input = Input::new(parse_tx_hash(&request.input.tx_hash)?, request.input.output_index);

    let mut tx = StagingTransaction::new().input(input);

    for planned in &request.outputs {
        tx = tx.output(planned_output_to_output(planned)?);
    }

    tx = add_mint(tx, &request.mint_policy_id_hex, &request.mint)?;

    let metadata_entries: Vec<(&str, &serde_json::Value)> = request
        .mint
        .iter()
        .map(|asset| (asset.asset_name.as_str(), &asset.metadata))
        .collect();
    let label_721 = label_721_map(&request.mint_policy_id_hex, &metadata_entries);
    tx = tx.metadata(721, label_721);

    let payment_key = load_ed25519_key(std::path::Path::new(&request.payment_signing_key_path))?;
    let policy_key = load_ed25519_key(std::path::Path::new(&request.policy_signing_key_path))?;

    let built = tx.build_conway_raw()?;
    let built = built.sign(payment_key)?;
    let built = built.sign(policy_key)?;
    Ok(built)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tx_hash_rejects_wrong_length() {
        assert!(parse_tx_hash("deadbeef").is_err());
    }

    #[test]
    fn parse_tx_hash_accepts_32_bytes() {
        let hash_hex = "a".repeat(64);
        assert!(parse_tx_hash(&hash_hex).is_ok());
    }
}

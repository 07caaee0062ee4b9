//! Wire shape exchanged with the transaction assembler (spec §4.F): a
//! self-contained description of one mint+pay+refund transaction, built by
//! the vending loop and handed to the assembler subprocess as JSON on
//! stdin. Kept in `vending-primitives` (rather than `vending-machine`) so
//! the assembler binary can depend on the data model without pulling in
//! the catalog/whitelist/loop machinery.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::asset::AssetId;
use crate::network::NetworkId;
use crate::tx::TxRef;

/// One asset to mint: the display name (for label-721 metadata, keyed by
/// name) and its already-hex-encoded on-chain name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintAsset {
    pub asset_name: String,
    pub asset_name_hex: String,
    pub metadata: serde_json::Value,
}

/// A plain value+assets output, before coin selection/change is applied by
/// the assembler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedOutput {
    pub address: String,
    pub lovelace: u64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub multiasset: BTreeMap<AssetId, u64>,
}

impl PlannedOutput {
    pub fn ada_only(address: impl Into<String>, lovelace: u64) -> Self {
        Self {
            address: address.into(),
            lovelace,
            multiasset: BTreeMap::new(),
        }
    }
}

/// Everything needed to build, sign and submit one vend attempt's
/// transaction (spec §4.E step g, §4.F).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintRequest {
    pub network: NetworkId,
    /// The spending input: the buyer's payment UTXO.
    pub input: TxRef,
    pub outputs: Vec<PlannedOutput>,
    pub mint_policy_id_hex: String,
    pub mint: Vec<MintAsset>,
    pub policy_script_path: String,
    pub policy_signing_key_path: String,
    pub payment_signing_key_path: String,
}

/// The assembler's synchronous reply (§4.F): success carries the submitted
/// transaction's hash; failure carries a human-readable reason and whether
/// the caller should consider the submission terminal (`rejected`) or an
/// ambiguous timeout (spec §7 `AssemblerError::{Rejected,Timeout}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MintOutcome {
    Submitted { tx_hash: String },
    Rejected { reason: String },
    Timeout { reason: String },
}

impl NetworkId {
    pub const fn serde_name(self) -> &'static str {
        match self {
            NetworkId::Mainnet => "mainnet",
            NetworkId::Preview => "preview",
        }
    }
}

impl Serialize for NetworkId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.serde_name())
    }
}

impl<'de> Deserialize<'de> for NetworkId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// On-chain identifier of a native asset: a 28-byte policy id followed by an
/// arbitrary-length asset name, both hex-encoded and concatenated (§6).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

/// Length in hex characters of a 28-byte policy id.
const POLICY_ID_HEX_LEN: usize = 56;

#[derive(Debug, thiserror::Error)]
pub enum AssetIdError {
    #[error("asset id {0:?} is shorter than a policy id (56 hex chars)")]
    TooShort(String),
    #[error("asset id {0:?} is not valid hex")]
    NotHex(String),
}

impl AssetId {
    /// Builds an asset id from an already-hex-encoded policy id and asset name.
    pub fn new(policy_id_hex: &str, name_hex: &str) -> Result<Self, AssetIdError> {
        if policy_id_hex.len() != POLICY_ID_HEX_LEN {
            return Err(AssetIdError::TooShort(policy_id_hex.to_string()));
        }
        let combined = format!("{}{}", policy_id_hex.to_lowercase(), name_hex.to_lowercase());
        if hex::decode(&combined).is_err() {
            return Err(AssetIdError::NotHex(combined));
        }
        Ok(Self(combined))
    }

    pub fn parse(full_hex: impl Into<String>) -> Result<Self, AssetIdError> {
        let full_hex = full_hex.into();
        if full_hex.len() < POLICY_ID_HEX_LEN {
            return Err(AssetIdError::TooShort(full_hex));
        }
        if hex::decode(&full_hex).is_err() {
            return Err(AssetIdError::NotHex(full_hex));
        }
        Ok(Self(full_hex.to_lowercase()))
    }

    pub fn policy_id_hex(&self) -> &str {
        &self.0[..POLICY_ID_HEX_LEN]
    }

    pub fn name_hex(&self) -> &str {
        &self.0[POLICY_ID_HEX_LEN..]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if this asset id belongs to the given policy.
    pub fn is_under_policy(&self, policy_id_hex: &str) -> bool {
        self.policy_id_hex().eq_ignore_ascii_case(policy_id_hex)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hex-encodes an asset's display name for on-chain use.
pub fn asset_name_hex(name: &str) -> String {
    hex::encode(name.as_bytes())
}

/// Inverse of [`asset_name_hex`], restricted to valid UTF-8 names. Returns
/// `None` for byte sequences that are not valid UTF-8 (e.g. CIP-68 reference
/// labels), matching the spec's restriction to UTF-8-nameable assets.
pub fn hex_to_asset_name(name_hex: &str) -> Option<String> {
    let bytes = hex::decode(name_hex).ok()?;
    String::from_utf8(bytes).ok()
}

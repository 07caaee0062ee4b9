//! Mint policy object (spec §4.D): an immutable bundle validated once at
//! startup; failure is fatal and the loop never starts (§6 exit-code
//! contract).

use std::path::{Path, PathBuf};

use crate::errors::ConfigurationError;
use crate::whitelist::Whitelist;

const MIN_PRICE_LOVELACE: u64 = 5_000_000;
const MIN_DONATION_LOVELACE: u64 = 1_000_000;

/// Immutable bundle describing one mint policy (§3): policy id, price,
/// donation, file paths, and the configured whitelist variant.
pub struct MintPolicy {
    pub policy_id_hex: String,
    pub minimum_price_lovelace: u64,
    pub donation_lovelace: u64,
    pub metadata_dir: PathBuf,
    pub locked_dir: PathBuf,
    pub script_file: PathBuf,
    pub signing_key: PathBuf,
    pub whitelist: Box<dyn Whitelist + Send + Sync>,
    /// Present only when the configured whitelist variant requires one
    /// (single-use, unlimited); `NoWhitelist` carries `None` and the
    /// corresponding checks in `validate` are skipped.
    pub whitelist_dir: Option<PathBuf>,
    pub consumed_dir: Option<PathBuf>,
}

impl MintPolicy {
    /// Validates the preconditions of §4.D, in the order the original
    /// implementation checks them (whitelist_dir before consumed_dir) so
    /// the reported error is deterministic when both are missing.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.minimum_price_lovelace < MIN_PRICE_LOVELACE {
            return Err(ConfigurationError::PriceTooLow(self.minimum_price_lovelace));
        }
        if self.donation_lovelace != 0 && self.donation_lovelace < MIN_DONATION_LOVELACE {
            return Err(ConfigurationError::InvalidDonation(self.donation_lovelace));
        }
        if !self.metadata_dir.is_dir() {
            return Err(ConfigurationError::MetadataDirUnreadable(
                path_to_string(&self.metadata_dir),
            ));
        }
        if !self.script_file.is_file() {
            return Err(ConfigurationError::ScriptFileMissing(path_to_string(
                &self.script_file,
            )));
        }
        if !self.signing_key.is_file() {
            return Err(ConfigurationError::SigningKeyMissing(path_to_string(
                &self.signing_key,
            )));
        }
        if let Some(whitelist_dir) = &self.whitelist_dir {
            if !whitelist_dir.is_dir() {
                return Err(ConfigurationError::WhitelistDirMissing(path_to_string(
                    whitelist_dir,
                )));
            }
        }
        if let Some(consumed_dir) = &self.consumed_dir {
            if !consumed_dir.is_dir() {
                return Err(ConfigurationError::ConsumedDirMissing(path_to_string(
                    consumed_dir,
                )));
            }
        }
        Ok(())
    }
}

fn path_to_string(path: &Path) -> String {
    path.display().to_string()
}

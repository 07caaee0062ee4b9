use std::fs;
use std::io;
use std::path::PathBuf;

use vending_primitives::{AssetId, TransactionView, UTxO};

use super::{classify, Whitelist, WhitelistVerdict};

/// Each pass authorizes unlimited mint events (§4.C). `consumed_dir` is
/// still required to exist at validation time for directory-layout
/// symmetry with [`super::SingleUseWhitelist`], but consumption itself is a
/// no-op.
pub struct UnlimitedWhitelist {
    whitelist_dir: PathBuf,
    policy_id_hex: String,
}

impl UnlimitedWhitelist {
    pub fn new(
        whitelist_dir: impl Into<PathBuf>,
        _consumed_dir: impl Into<PathBuf>,
        policy_id_hex: impl Into<String>,
    ) -> Self {
        Self {
            whitelist_dir: whitelist_dir.into(),
            policy_id_hex: policy_id_hex.into(),
        }
    }
}

impl Whitelist for UnlimitedWhitelist {
    fn is_whitelisted(&self, asset_id: &AssetId) -> bool {
        self.whitelist_dir.join(asset_id.as_str()).exists()
    }

    fn available(&self) -> io::Result<usize> {
        Ok(fs::read_dir(&self.whitelist_dir)?.count())
    }

    fn required_info(&self, tx: &TransactionView, payment_utxo: &UTxO) -> WhitelistVerdict {
        classify(tx, payment_utxo, &self.policy_id_hex, &|asset_id| {
            self.is_whitelisted(asset_id)
        })
    }

    fn consume(&self, _asset_ids: &[AssetId]) -> io::Result<()> {
        Ok(())
    }

    /// Any credit at all authorizes up to `single_vend_cap`; without
    /// credit the buyer cannot mint under an unlimited whitelist either
    /// (§4.C).
    fn max_mintable(&self, verdict: &WhitelistVerdict, single_vend_cap: u64) -> u64 {
        match verdict {
            WhitelistVerdict::Eligible(_) => single_vend_cap,
            WhitelistVerdict::Disqualified | WhitelistVerdict::NoCredit => 0,
        }
    }
}

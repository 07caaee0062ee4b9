use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::warn;
use vending_primitives::{AssetId, TransactionView, UTxO};

use super::{classify, Whitelist, WhitelistVerdict};

/// Each pass authorizes exactly one mint event ever (§4.C). Eligibility is
/// `a ∈ whitelist_dir ∧ a ∉ consumed_dir`.
pub struct SingleUseWhitelist {
    whitelist_dir: PathBuf,
    consumed_dir: PathBuf,
    policy_id_hex: String,
}

impl SingleUseWhitelist {
    pub fn new(
        whitelist_dir: impl Into<PathBuf>,
        consumed_dir: impl Into<PathBuf>,
        policy_id_hex: impl Into<String>,
    ) -> Self {
        Self {
            whitelist_dir: whitelist_dir.into(),
            consumed_dir: consumed_dir.into(),
            policy_id_hex: policy_id_hex.into(),
        }
    }

    fn file_name(asset_id: &AssetId) -> String {
        asset_id.as_str().to_string()
    }
}

impl Whitelist for SingleUseWhitelist {
    fn is_whitelisted(&self, asset_id: &AssetId) -> bool {
        let name = Self::file_name(asset_id);
        let listed = self.whitelist_dir.join(&name).exists();
        let consumed = self.consumed_dir.join(&name).exists();
        if consumed && !listed {
            warn!(asset_id = %asset_id, "consumed marker with no matching whitelist entry; failing closed");
            return false;
        }
        listed && !consumed
    }

    fn available(&self) -> io::Result<usize> {
        let count = fs::read_dir(&self.whitelist_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| !self.consumed_dir.join(entry.file_name()).exists())
            .count();
        Ok(count)
    }

    fn required_info(&self, tx: &TransactionView, payment_utxo: &UTxO) -> WhitelistVerdict {
        classify(tx, payment_utxo, &self.policy_id_hex, &|asset_id| {
            self.is_whitelisted(asset_id)
        })
    }

    fn consume(&self, asset_ids: &[AssetId]) -> io::Result<()> {
        fs::create_dir_all(&self.consumed_dir)?;
        for asset_id in asset_ids {
            let path = self.consumed_dir.join(Self::file_name(asset_id));
            if !path.exists() {
                fs::write(path, [])?;
            }
        }
        Ok(())
    }

    /// One NFT per distinct eligible id credited on this transaction; a
    /// buyer with no credit cannot mint at all under single-use (§4.C).
    fn max_mintable(&self, verdict: &WhitelistVerdict, single_vend_cap: u64) -> u64 {
        match verdict {
            WhitelistVerdict::Eligible(ids) => (ids.len() as u64).min(single_vend_cap),
            WhitelistVerdict::Disqualified | WhitelistVerdict::NoCredit => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use vending_primitives::asset_name_hex;

    fn asset(policy: &str, name: &str) -> AssetId {
        AssetId::new(policy, &asset_name_hex(name)).unwrap()
    }

    #[test]
    fn fail_closed_on_orphaned_consumption() {
        let wl_dir = tempdir().unwrap();
        let consumed_dir = tempdir().unwrap();
        let policy = "b".repeat(56);
        let a = asset(&policy, "WildTangz WL 1");
        fs::write(consumed_dir.path().join(a.as_str()), []).unwrap();
        let whitelist = SingleUseWhitelist::new(wl_dir.path(), consumed_dir.path(), policy);
        assert!(!whitelist.is_whitelisted(&a));
    }

    #[test]
    fn consume_is_idempotent() {
        let wl_dir = tempdir().unwrap();
        let consumed_dir = tempdir().unwrap();
        let policy = "b".repeat(56);
        let a = asset(&policy, "WildTangz WL 1");
        fs::write(wl_dir.path().join(a.as_str()), []).unwrap();
        let whitelist = SingleUseWhitelist::new(wl_dir.path(), consumed_dir.path(), policy);
        assert!(whitelist.is_whitelisted(&a));
        whitelist.consume(&[a.clone()]).unwrap();
        whitelist.consume(&[a.clone()]).unwrap();
        assert!(!whitelist.is_whitelisted(&a));
    }
}

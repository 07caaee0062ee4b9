use std::io;

use vending_primitives::{AssetId, TransactionView, UTxO};

use super::{Whitelist, WhitelistVerdict};

/// Always eligible, never mutates (§4.C).
#[derive(Default)]
pub struct NoWhitelist;

impl Whitelist for NoWhitelist {
    fn is_whitelisted(&self, _asset_id: &AssetId) -> bool {
        true
    }

    fn available(&self) -> io::Result<usize> {
        Ok(usize::MAX)
    }

    fn required_info(&self, _tx: &TransactionView, _payment_utxo: &UTxO) -> WhitelistVerdict {
        WhitelistVerdict::NoCredit
    }

    fn consume(&self, _asset_ids: &[AssetId]) -> io::Result<()> {
        Ok(())
    }
}

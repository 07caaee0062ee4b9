//! Whitelist engine (spec §4.C): three variants sharing one interface over
//! a pair of directories — `whitelist_dir` (initial eligibility) and
//! `consumed_dir` (append-only consumption record).

mod no_whitelist;
mod single_use;
mod unlimited;

use std::io;

pub use no_whitelist::NoWhitelist;
pub use single_use::SingleUseWhitelist;
pub use unlimited::UnlimitedWhitelist;

use vending_primitives::{AssetId, TransactionView, UTxO};

/// Outcome of inspecting the transaction that produced the triggering
/// payment UTXO (§4.C).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhitelistVerdict {
    /// The buyer spent at least one matching whitelist asset as a real
    /// input on the same transaction; these ids become the credit.
    Eligible(Vec<AssetId>),
    /// The buyer sent a whitelist asset directly to the payment address —
    /// the payment UTXO must be excluded, never retried.
    Disqualified,
    /// No matching asset spent or present; falls through to no credit.
    NoCredit,
}

pub trait Whitelist {
    fn is_whitelisted(&self, asset_id: &AssetId) -> bool;
    fn available(&self) -> io::Result<usize>;

    /// Inspects `tx` (the transaction that produced `payment_utxo`) for
    /// whitelist-policy assets among its spending inputs, and for a direct
    /// self-send into `payment_utxo` itself (§4.C).
    fn required_info(&self, tx: &TransactionView, payment_utxo: &UTxO) -> WhitelistVerdict;

    /// Applied only after a successful submission. Idempotent: consuming an
    /// already-consumed id is not an error (§4.C, §8).
    fn consume(&self, asset_ids: &[AssetId]) -> io::Result<()>;

    /// The number of NFTs this verdict authorizes, capped by
    /// `single_vend_cap` (§4.C).
    fn max_mintable(&self, verdict: &WhitelistVerdict, single_vend_cap: u64) -> u64 {
        match verdict {
            WhitelistVerdict::Eligible(ids) => (ids.len() as u64).min(single_vend_cap),
            WhitelistVerdict::Disqualified => 0,
            WhitelistVerdict::NoCredit => single_vend_cap,
        }
    }
}

/// Shared by all three variants: classify a transaction against a whitelist
/// policy id, independent of how eligibility/consumption is tracked.
/// `is_whitelisted` gates which policy-matching spent ids actually still
/// carry credit (e.g. excluding ids `SingleUseWhitelist` already consumed),
/// so a previously-consumed pass cannot be reused just by spending the same
/// NFT as an input again.
pub(crate) fn classify(
    tx: &TransactionView,
    payment_utxo: &UTxO,
    policy_id_hex: &str,
    is_whitelisted: &dyn Fn(&AssetId) -> bool,
) -> WhitelistVerdict {
    let sent_directly = payment_utxo
        .multiasset
        .keys()
        .any(|asset_id| asset_id.is_under_policy(policy_id_hex));
    if sent_directly {
        return WhitelistVerdict::Disqualified;
    }

    let spent_matching: Vec<AssetId> = tx
        .spent_assets_under_policy(policy_id_hex)
        .into_iter()
        .filter(is_whitelisted)
        .collect();
    if !spent_matching.is_empty() {
        return WhitelistVerdict::Eligible(spent_matching);
    }

    WhitelistVerdict::NoCredit
}

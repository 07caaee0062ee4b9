//! Rebate calculator (spec §4.A): the lovelace surcharge a mint output must
//! carry to respect the chain's minimum-UTXO rule, as a pure, injectable
//! function of (distinct policies minted, distinct asset names, total name
//! bytes).

use vending_primitives::min_lovelace_for_bundle;

/// Wraps the closed-form minimum-UTXO formula as an injectable value so it
/// can be swapped out when the ledger's constants change, per spec §4.A.
#[derive(Clone)]
pub struct RebateCalculator {
    formula: fn(u64, u64, u64) -> u64,
}

impl RebateCalculator {
    /// The current Cardano (Conway-era) minimum-UTXO formula.
    pub fn default_cardano() -> Self {
        Self {
            formula: min_lovelace_for_bundle,
        }
    }

    pub fn with_formula(formula: fn(u64, u64, u64) -> u64) -> Self {
        Self { formula }
    }

    /// `calculate_rebate_for(p, a, n)`: minimum lovelace for a bundle of `p`
    /// distinct policies, `a` distinct asset names totalling `n` bytes.
    pub fn calculate_rebate_for(&self, num_policies: u64, num_assets: u64, name_bytes: u64) -> u64 {
        (self.formula)(num_policies, num_assets, name_bytes)
    }
}

impl Default for RebateCalculator {
    fn default() -> Self {
        Self::default_cardano()
    }
}

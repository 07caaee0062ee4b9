//! Vending loop (spec §4.E): one pass over the payment address's UTXO set,
//! driving the per-UTXO state machine `Pending → (Disqualified | NoCredit |
//! Credited) → Reserved → (Submitted | SubmitFailed) → (Committed |
//! CommitDrift)` described in §4.E / §5 / §7.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use tracing::{info, warn};

use vending_indexer::Indexer;
use vending_primitives::{
    min_lovelace_for_bundle, AssetId, MintAsset, MintRequest, NetworkId, PlannedOutput, TxRef,
};

use crate::assembler::TransactionAssembler;
use crate::catalog::{total_name_bytes, AssetCatalog};
use crate::errors::{AssemblerErrorKind, VendError};
use crate::policy::MintPolicy;
use crate::rebate::RebateCalculator;
use crate::whitelist::WhitelistVerdict;

/// In-memory, per-session record of UTXOs that must not be retried (§3,
/// §9 OQ-1): plain `HashSet`, not durable across restarts, matching the
/// source's behavior. Threaded by `&mut` through successive `vend` calls.
pub type ExclusionSet = HashSet<TxRef>;

/// Immutable configuration + collaborators for one vending-machine
/// instance (§3). Generic over the indexer and assembler so tests can
/// substitute in-memory fakes.
pub struct VendingMachine<I, A> {
    pub payment_address: String,
    pub payment_signing_key_path: PathBuf,
    pub profit_address: String,
    pub donation_address: Option<String>,
    pub vend_randomly: bool,
    pub single_vend_cap: u64,
    pub network: NetworkId,
    pub mint_policy: MintPolicy,
    pub catalog: AssetCatalog,
    pub rebate_calculator: RebateCalculator,
    pub indexer: I,
    pub assembler: A,
}

impl<I, A> VendingMachine<I, A>
where
    I: Indexer,
    A: TransactionAssembler,
{
    /// One pass over the payment address's current UTXO set (§4.E).
    /// Returns on the first pool-exhaustion or permanent indexer failure;
    /// every per-UTXO error is recorded and the pass continues.
    pub async fn vend(&self, exclusions: &mut ExclusionSet) -> Result<(), VendError> {
        let utxos = self
            .indexer
            .utxos_at(&self.payment_address, exclusions)
            .await?;

        for utxo in utxos {
            if exclusions.contains(&utxo.reference) {
                continue;
            }

            let tx = match self.indexer.transaction(&utxo.reference.tx_hash).await {
                Ok(tx) => tx,
                Err(err) => return Err(err.into()),
            };

            let verdict = self.mint_policy.whitelist.required_info(&tx, &utxo);
            if verdict == WhitelistVerdict::Disqualified {
                warn!(utxo = %utxo.reference, "whitelist asset sent directly to payment address; excluding");
                exclusions.insert(utxo.reference.clone());
                continue;
            }

            if utxo.lovelace < self.mint_policy.minimum_price_lovelace {
                exclusions.insert(utxo.reference.clone());
                continue;
            }

            let whitelist_budget = self
                .mint_policy
                .whitelist
                .max_mintable(&verdict, self.single_vend_cap);
            let min_refund = min_lovelace_for_bundle(0, 0, 0);
            let affordable =
                utxo.lovelace.saturating_sub(min_refund) / self.mint_policy.minimum_price_lovelace;
            let budget = self.single_vend_cap.min(whitelist_budget).min(affordable);

            if budget == 0 {
                // A later top-up might make this UTXO eligible; leave it
                // unprocessed rather than excluding it (§4.E step d).
                continue;
            }

            let reserved = match self.catalog.reserve(budget as usize, self.vend_randomly) {
                Ok(reserved) => reserved,
                Err(err) => {
                    warn!(utxo = %utxo.reference, error = %err, "catalog reserve failed");
                    exclusions.insert(utxo.reference.clone());
                    continue;
                }
            };

            if reserved.is_empty() {
                info!("asset catalog exhausted; ending pass without consuming whitelist credit");
                return Ok(());
            }

            let minted_count = reserved.len() as u64;
            let name_bytes = total_name_bytes(&reserved);
            let rebate = self
                .rebate_calculator
                .calculate_rebate_for(1, minted_count, name_bytes);

            let Some(buyer_address) = tx.inputs.first().map(|u| u.address.clone()) else {
                warn!(utxo = %utxo.reference, "could not determine buyer address from transaction inputs");
                exclusions.insert(utxo.reference.clone());
                continue;
            };

            let gross = self.mint_policy.minimum_price_lovelace * minted_count;
            let donation = self.mint_policy.donation_lovelace;
            let profit = gross.saturating_sub(rebate).saturating_sub(donation);
            let change = utxo.lovelace.saturating_sub(gross);
            let buyer_lovelace = rebate + change;

            let mut minted_assets: BTreeMap<AssetId, u64> = BTreeMap::new();
            for descriptor in &reserved {
                if let Ok(asset_id) =
                    AssetId::new(&self.mint_policy.policy_id_hex, &descriptor.asset_name_hex)
                {
                    minted_assets.insert(asset_id, 1);
                }
            }

            let mut outputs = vec![
                PlannedOutput::ada_only(&self.profit_address, profit),
                PlannedOutput {
                    address: buyer_address,
                    lovelace: buyer_lovelace,
                    multiasset: minted_assets,
                },
            ];
            if donation > 0 {
                if let Some(donation_address) = &self.donation_address {
                    outputs.push(PlannedOutput::ada_only(donation_address, donation));
                }
            }

            let request = MintRequest {
                network: self.network,
                input: utxo.reference.clone(),
                outputs,
                mint_policy_id_hex: self.mint_policy.policy_id_hex.clone(),
                mint: reserved
                    .iter()
                    .map(|descriptor| MintAsset {
                        asset_name: descriptor.asset_name.clone(),
                        asset_name_hex: descriptor.asset_name_hex.clone(),
                        metadata: descriptor.metadata.clone(),
                    })
                    .collect(),
                policy_script_path: path_to_string(&self.mint_policy.script_file),
                policy_signing_key_path: path_to_string(&self.mint_policy.signing_key),
                payment_signing_key_path: path_to_string(&self.payment_signing_key_path),
            };

            match self.assembler.build_and_submit(&request).await {
                Ok(tx_hash) => match self.catalog.commit(&reserved) {
                    Ok(()) => {
                        let eligible_ids = eligible_ids(&verdict);
                        if let Err(err) = self.mint_policy.whitelist.consume(&eligible_ids) {
                            warn!(tx_hash, error = %err, "whitelist consume failed after successful commit");
                        }
                        info!(tx_hash, minted = minted_count, "vend succeeded");
                    }
                    Err(err) => {
                        warn!(
                            utxo = %utxo.reference,
                            tx_hash,
                            error = %err,
                            "commit drift: chain accepted the mint but the catalog file is missing; reconcile manually"
                        );
                        exclusions.insert(utxo.reference.clone());
                    }
                },
                Err(err) => {
                    warn!(utxo = %utxo.reference, kind = ?err.kind, error = %err.message, "assembler submission failed");
                    match err.kind {
                        AssemblerErrorKind::Rejected | AssemblerErrorKind::Timeout => {
                            exclusions.insert(utxo.reference.clone());
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

fn path_to_string(path: &std::path::Path) -> String {
    path.display().to_string()
}

/// The whitelist asset ids that should be consumed for this verdict; empty
/// for `Disqualified`/`NoCredit` (§4.C).
fn eligible_ids(verdict: &WhitelistVerdict) -> Vec<AssetId> {
    match verdict {
        WhitelistVerdict::Eligible(ids) => ids.clone(),
        WhitelistVerdict::Disqualified | WhitelistVerdict::NoCredit => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap as Map;
    use std::sync::Mutex;

    use tempfile::tempdir;
    use vending_indexer::{AssetRecord, IndexerError};
    use vending_primitives::{asset_name_hex, TransactionView, UTxO};

    use crate::whitelist::{NoWhitelist, SingleUseWhitelist, UnlimitedWhitelist, Whitelist};

    const MINT_PRICE: u64 = 10_000_000;

    struct FakeIndexer {
        utxos: Vec<UTxO>,
        transactions: Map<String, TransactionView>,
    }

    impl Indexer for FakeIndexer {
        async fn utxos_at(
            &self,
            _address: &str,
            exclusions: &HashSet<TxRef>,
        ) -> Result<Vec<UTxO>, IndexerError> {
            Ok(self
                .utxos
                .iter()
                .filter(|u| !exclusions.contains(&u.reference))
                .cloned()
                .collect())
        }

        async fn transaction(&self, tx_hash: &str) -> Result<TransactionView, IndexerError> {
            self.transactions
                .get(tx_hash)
                .cloned()
                .ok_or_else(|| IndexerError::Permanent(format!("no such tx {tx_hash}")))
        }

        async fn assets_under(&self, _policy_id_hex: &str) -> Result<Vec<AssetId>, IndexerError> {
            Ok(Vec::new())
        }

        async fn asset(&self, asset_id: &AssetId) -> Result<AssetRecord, IndexerError> {
            Ok(AssetRecord {
                asset_id: asset_id.clone(),
                quantity: 1,
                onchain_metadata: None,
            })
        }

        async fn await_payment(
            &self,
            _address: &str,
            _tx_hash: Option<&str>,
            _timeout: std::time::Duration,
        ) -> Result<UTxO, IndexerError> {
            self.utxos
                .first()
                .cloned()
                .ok_or_else(|| IndexerError::Transient("no utxos".into()))
        }
    }

    struct FakeAssembler {
        submitted: Mutex<Vec<MintRequest>>,
    }

    impl FakeAssembler {
        fn new() -> Self {
            Self {
                submitted: Mutex::new(Vec::new()),
            }
        }
    }

    impl TransactionAssembler for FakeAssembler {
        async fn build_and_submit(
            &self,
            request: &MintRequest,
        ) -> Result<String, crate::errors::AssemblerError> {
            self.submitted.lock().unwrap().push(request.clone());
            Ok(format!("tx-{}", self.submitted.lock().unwrap().len()))
        }
    }

    fn payment_utxo(tx_hash: &str, lovelace: u64, multiasset: Map<AssetId, u64>) -> UTxO {
        UTxO {
            reference: TxRef::new(tx_hash, 0),
            address: "addr_test1paymentmachine".into(),
            lovelace,
            multiasset,
        }
    }

    fn buyer_input(tx_hash: &str, multiasset: Map<AssetId, u64>) -> UTxO {
        UTxO {
            reference: TxRef::new(format!("{tx_hash}-src"), 0),
            address: "addr_test1buyer".into(),
            lovelace: 50_000_000,
            multiasset,
        }
    }

    fn write_asset(dir: &std::path::Path, name: &str) {
        let path = dir.join(format!("{name}.json"));
        let body = serde_json::json!({ name: { "name": name, "image": "ipfs://x" } });
        std::fs::write(path, serde_json::to_string(&body).unwrap()).unwrap();
    }

    fn machine(
        metadata_dir: &std::path::Path,
        locked_dir: &std::path::Path,
        whitelist: Box<dyn Whitelist + Send + Sync>,
        utxos: Vec<UTxO>,
        transactions: Map<String, TransactionView>,
        single_vend_cap: u64,
    ) -> VendingMachine<FakeIndexer, FakeAssembler> {
        VendingMachine {
            payment_address: "addr_test1paymentmachine".into(),
            payment_signing_key_path: PathBuf::from("payment.skey"),
            profit_address: "addr_test1profit".into(),
            donation_address: None,
            vend_randomly: false,
            single_vend_cap,
            network: NetworkId::Preview,
            mint_policy: MintPolicy {
                policy_id_hex: "a".repeat(56),
                minimum_price_lovelace: MINT_PRICE,
                donation_lovelace: 0,
                metadata_dir: metadata_dir.to_path_buf(),
                locked_dir: locked_dir.to_path_buf(),
                script_file: PathBuf::from("policy.script"),
                signing_key: PathBuf::from("policy.skey"),
                whitelist,
                whitelist_dir: None,
                consumed_dir: None,
            },
            catalog: AssetCatalog::new(metadata_dir, locked_dir),
            rebate_calculator: RebateCalculator::default_cardano(),
            indexer: FakeIndexer { utxos, transactions },
            assembler: FakeAssembler::new(),
        }
    }

    #[tokio::test]
    async fn s1_reference_only_whitelist_asset_yields_no_mint() {
        let metadata_dir = tempdir().unwrap();
        let locked_dir = tempdir().unwrap();
        write_asset(metadata_dir.path(), "WildTangz 1");

        let policy_id = "a".repeat(56);
        let wl_asset = AssetId::new(&policy_id, &asset_name_hex("WildTangz WL 1")).unwrap();

        let payment = payment_utxo("tx1", MINT_PRICE, Map::new());
        let tx = TransactionView {
            tx_hash: "tx1".into(),
            inputs: vec![buyer_input("tx1", Map::new())],
            reference_inputs: vec![buyer_input("tx1-ref", Map::from([(wl_asset, 1)]))],
            outputs: vec![],
            fees: 0,
        };

        let wl_dir = tempdir().unwrap();
        let consumed_dir = tempdir().unwrap();
        let whitelist = SingleUseWhitelist::new(wl_dir.path(), consumed_dir.path(), policy_id);

        let vm = machine(
            metadata_dir.path(),
            locked_dir.path(),
            Box::new(whitelist),
            vec![payment],
            Map::from([("tx1".to_string(), tx)]),
            5,
        );

        let mut exclusions = ExclusionSet::new();
        vm.vend(&mut exclusions).await.unwrap();

        assert!(exclusions.is_empty());
        assert_eq!(vm.assembler.submitted.lock().unwrap().len(), 0);
        assert_eq!(vm.catalog.available().unwrap(), 1);
    }

    #[tokio::test]
    async fn s2_direct_send_disqualifies_and_excludes() {
        let metadata_dir = tempdir().unwrap();
        let locked_dir = tempdir().unwrap();
        write_asset(metadata_dir.path(), "WildTangz 1");

        let policy_id = "a".repeat(56);
        let wl_asset = AssetId::new(&policy_id, &asset_name_hex("WildTangz WL 1")).unwrap();

        let payment = payment_utxo("tx2", 2 * MINT_PRICE, Map::from([(wl_asset.clone(), 1)]));
        let tx = TransactionView {
            tx_hash: "tx2".into(),
            inputs: vec![buyer_input("tx2", Map::new())],
            reference_inputs: vec![],
            outputs: vec![],
            fees: 0,
        };

        let wl_dir = tempdir().unwrap();
        let consumed_dir = tempdir().unwrap();
        std::fs::write(wl_dir.path().join(wl_asset.as_str()), []).unwrap();
        let whitelist = SingleUseWhitelist::new(wl_dir.path(), consumed_dir.path(), policy_id);

        let vm = machine(
            metadata_dir.path(),
            locked_dir.path(),
            Box::new(whitelist),
            vec![payment],
            Map::from([("tx2".to_string(), tx)]),
            5,
        );

        let mut exclusions = ExclusionSet::new();
        vm.vend(&mut exclusions).await.unwrap();

        assert_eq!(exclusions.len(), 1);
        assert_eq!(vm.assembler.submitted.lock().unwrap().len(), 0);
        assert!(vm.mint_policy.whitelist.is_whitelisted(&wl_asset));
    }

    #[tokio::test]
    async fn s3_single_use_credit_caps_mint_at_one() {
        let metadata_dir = tempdir().unwrap();
        let locked_dir = tempdir().unwrap();
        write_asset(metadata_dir.path(), "WildTangz 1");
        write_asset(metadata_dir.path(), "WildTangz 2");

        let policy_id = "a".repeat(56);
        let wl_asset = AssetId::new(&policy_id, &asset_name_hex("WildTangz WL 1")).unwrap();

        // Buyer pays for 2, but only has one whitelist credit.
        let rebate = RebateCalculator::default_cardano().calculate_rebate_for(1, 1, 11);
        let payment_lovelace = 2 * MINT_PRICE + rebate;
        let payment = payment_utxo("tx3", payment_lovelace, Map::new());
        let tx = TransactionView {
            tx_hash: "tx3".into(),
            inputs: vec![buyer_input("tx3", Map::from([(wl_asset.clone(), 1)]))],
            reference_inputs: vec![],
            outputs: vec![],
            fees: 0,
        };

        let wl_dir = tempdir().unwrap();
        let consumed_dir = tempdir().unwrap();
        std::fs::write(wl_dir.path().join(wl_asset.as_str()), []).unwrap();
        let whitelist = SingleUseWhitelist::new(wl_dir.path(), consumed_dir.path(), policy_id);

        let vm = machine(
            metadata_dir.path(),
            locked_dir.path(),
            Box::new(whitelist),
            vec![payment],
            Map::from([("tx3".to_string(), tx)]),
            5,
        );

        let mut exclusions = ExclusionSet::new();
        vm.vend(&mut exclusions).await.unwrap();

        assert_eq!(vm.assembler.submitted.lock().unwrap().len(), 1);
        assert_eq!(vm.assembler.submitted.lock().unwrap()[0].mint.len(), 1);
        assert_eq!(vm.catalog.available().unwrap(), 1);
        assert!(!vm.mint_policy.whitelist.is_whitelisted(&wl_asset));
    }

    #[tokio::test]
    async fn s4_single_use_two_passes_credited_depletes_catalog() {
        let metadata_dir = tempdir().unwrap();
        let locked_dir = tempdir().unwrap();
        write_asset(metadata_dir.path(), "WildTangz 1");
        write_asset(metadata_dir.path(), "WildTangz 2");
        write_asset(metadata_dir.path(), "WildTangz 3");

        let policy_id = "a".repeat(56);
        let wl_asset_a = AssetId::new(&policy_id, &asset_name_hex("WildTangz WL 1")).unwrap();
        let wl_asset_b = AssetId::new(&policy_id, &asset_name_hex("WildTangz WL 2")).unwrap();

        let wl_dir = tempdir().unwrap();
        let consumed_dir = tempdir().unwrap();

        let rebate = RebateCalculator::default_cardano().calculate_rebate_for(1, 1, 11);
        let payment_lovelace = MINT_PRICE + rebate;

        // First credited pass: one whitelist asset, spent as input on tx4a.
        let payment_a = payment_utxo("tx4a", payment_lovelace, Map::new());
        let tx_a = TransactionView {
            tx_hash: "tx4a".into(),
            inputs: vec![buyer_input("tx4a", Map::from([(wl_asset_a.clone(), 1)]))],
            reference_inputs: vec![],
            outputs: vec![],
            fees: 0,
        };
        std::fs::write(wl_dir.path().join(wl_asset_a.as_str()), []).unwrap();

        let vm_a = machine(
            metadata_dir.path(),
            locked_dir.path(),
            Box::new(SingleUseWhitelist::new(wl_dir.path(), consumed_dir.path(), policy_id.clone())),
            vec![payment_a],
            Map::from([("tx4a".to_string(), tx_a)]),
            5,
        );

        let mut exclusions = ExclusionSet::new();
        vm_a.vend(&mut exclusions).await.unwrap();

        assert_eq!(vm_a.assembler.submitted.lock().unwrap().len(), 1);
        assert_eq!(vm_a.catalog.available().unwrap(), 2);
        assert!(!vm_a.mint_policy.whitelist.is_whitelisted(&wl_asset_a));

        // Second credited pass, a distinct whitelist asset, processed in a
        // separate vend() call against the same catalog/whitelist state.
        let payment_b = payment_utxo("tx4b", payment_lovelace, Map::new());
        let tx_b = TransactionView {
            tx_hash: "tx4b".into(),
            inputs: vec![buyer_input("tx4b", Map::from([(wl_asset_b.clone(), 1)]))],
            reference_inputs: vec![],
            outputs: vec![],
            fees: 0,
        };
        std::fs::write(wl_dir.path().join(wl_asset_b.as_str()), []).unwrap();

        let vm_b = machine(
            metadata_dir.path(),
            locked_dir.path(),
            Box::new(SingleUseWhitelist::new(wl_dir.path(), consumed_dir.path(), policy_id)),
            vec![payment_b],
            Map::from([("tx4b".to_string(), tx_b)]),
            5,
        );

        vm_b.vend(&mut exclusions).await.unwrap();

        assert_eq!(vm_b.assembler.submitted.lock().unwrap().len(), 1);
        assert_eq!(vm_b.catalog.available().unwrap(), 1);
        assert!(!vm_b.mint_policy.whitelist.is_whitelisted(&wl_asset_a));
        assert!(!vm_b.mint_policy.whitelist.is_whitelisted(&wl_asset_b));
    }

    #[tokio::test]
    async fn s5_unlimited_whitelist_mints_full_request_and_stays_whitelisted() {
        let metadata_dir = tempdir().unwrap();
        let locked_dir = tempdir().unwrap();
        write_asset(metadata_dir.path(), "WildTangz 1");
        write_asset(metadata_dir.path(), "WildTangz 2");

        let policy_id = "a".repeat(56);
        let wl_asset = AssetId::new(&policy_id, &asset_name_hex("WildTangz WL 1")).unwrap();

        let rebate = RebateCalculator::default_cardano().calculate_rebate_for(1, 2, 22);
        let payment = payment_utxo("tx5", 2 * MINT_PRICE + rebate, Map::new());
        let tx = TransactionView {
            tx_hash: "tx5".into(),
            inputs: vec![buyer_input("tx5", Map::from([(wl_asset.clone(), 1)]))],
            reference_inputs: vec![],
            outputs: vec![],
            fees: 0,
        };

        let wl_dir = tempdir().unwrap();
        let consumed_dir = tempdir().unwrap();
        std::fs::write(wl_dir.path().join(wl_asset.as_str()), []).unwrap();
        let whitelist = UnlimitedWhitelist::new(wl_dir.path(), consumed_dir.path(), policy_id);

        let vm = machine(
            metadata_dir.path(),
            locked_dir.path(),
            Box::new(whitelist),
            vec![payment],
            Map::from([("tx5".to_string(), tx)]),
            5,
        );

        let mut exclusions = ExclusionSet::new();
        vm.vend(&mut exclusions).await.unwrap();

        assert_eq!(vm.assembler.submitted.lock().unwrap()[0].mint.len(), 2);
        assert!(vm.mint_policy.whitelist.is_whitelisted(&wl_asset));
    }

    #[tokio::test]
    async fn s6_unlimited_with_cap_mints_up_to_cap_and_leaves_remainder() {
        let metadata_dir = tempdir().unwrap();
        let locked_dir = tempdir().unwrap();
        for name in ["WildTangz 1", "WildTangz 2", "WildTangz 3", "WildTangz 4", "WildTangz 5"] {
            write_asset(metadata_dir.path(), name);
        }

        let policy_id = "a".repeat(56);
        let wl_asset = AssetId::new(&policy_id, &asset_name_hex("WildTangz WL 1")).unwrap();

        let payment = payment_utxo("tx6", 5 * MINT_PRICE, Map::new());
        let tx = TransactionView {
            tx_hash: "tx6".into(),
            inputs: vec![buyer_input("tx6", Map::from([(wl_asset.clone(), 1)]))],
            reference_inputs: vec![],
            outputs: vec![],
            fees: 0,
        };

        let wl_dir = tempdir().unwrap();
        let consumed_dir = tempdir().unwrap();
        std::fs::write(wl_dir.path().join(wl_asset.as_str()), []).unwrap();
        let whitelist = UnlimitedWhitelist::new(wl_dir.path(), consumed_dir.path(), policy_id);

        let vm = machine(
            metadata_dir.path(),
            locked_dir.path(),
            Box::new(whitelist),
            vec![payment],
            Map::from([("tx6".to_string(), tx)]),
            3,
        );

        let mut exclusions = ExclusionSet::new();
        vm.vend(&mut exclusions).await.unwrap();

        assert_eq!(vm.assembler.submitted.lock().unwrap()[0].mint.len(), 3);
        assert_eq!(vm.catalog.available().unwrap(), 2);
        assert!(vm.mint_policy.whitelist.is_whitelisted(&wl_asset));
    }

    #[tokio::test]
    async fn no_whitelist_uses_single_vend_cap_as_budget() {
        let metadata_dir = tempdir().unwrap();
        let locked_dir = tempdir().unwrap();
        write_asset(metadata_dir.path(), "WildTangz 1");

        let payment = payment_utxo("tx7", MINT_PRICE + 1_000_000, Map::new());
        let tx = TransactionView {
            tx_hash: "tx7".into(),
            inputs: vec![buyer_input("tx7", Map::new())],
            reference_inputs: vec![],
            outputs: vec![],
            fees: 0,
        };

        let vm = machine(
            metadata_dir.path(),
            locked_dir.path(),
            Box::new(NoWhitelist),
            vec![payment],
            Map::from([("tx7".to_string(), tx)]),
            5,
        );

        let mut exclusions = ExclusionSet::new();
        vm.vend(&mut exclusions).await.unwrap();

        assert_eq!(vm.assembler.submitted.lock().unwrap()[0].mint.len(), 1);
    }

    #[tokio::test]
    async fn underpaid_utxo_is_excluded_not_left_pending() {
        let metadata_dir = tempdir().unwrap();
        let locked_dir = tempdir().unwrap();
        write_asset(metadata_dir.path(), "WildTangz 1");

        let payment = payment_utxo("tx8", MINT_PRICE - 1, Map::new());
        let tx = TransactionView {
            tx_hash: "tx8".into(),
            inputs: vec![buyer_input("tx8", Map::new())],
            reference_inputs: vec![],
            outputs: vec![],
            fees: 0,
        };

        let vm = machine(
            metadata_dir.path(),
            locked_dir.path(),
            Box::new(NoWhitelist),
            vec![payment],
            Map::from([("tx8".to_string(), tx)]),
            5,
        );

        let mut exclusions = ExclusionSet::new();
        vm.vend(&mut exclusions).await.unwrap();

        assert_eq!(exclusions.len(), 1);
        assert_eq!(vm.assembler.submitted.lock().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn exhausted_catalog_ends_pass_without_consuming_whitelist() {
        let metadata_dir = tempdir().unwrap();
        let locked_dir = tempdir().unwrap();
        // No assets written: catalog is empty.

        let policy_id = "a".repeat(56);
        let wl_asset = AssetId::new(&policy_id, &asset_name_hex("WildTangz WL 1")).unwrap();
        let payment = payment_utxo("tx9", MINT_PRICE + 1_000_000, Map::new());
        let tx = TransactionView {
            tx_hash: "tx9".into(),
            inputs: vec![buyer_input("tx9", Map::from([(wl_asset.clone(), 1)]))],
            reference_inputs: vec![],
            outputs: vec![],
            fees: 0,
        };

        let wl_dir = tempdir().unwrap();
        let consumed_dir = tempdir().unwrap();
        std::fs::write(wl_dir.path().join(wl_asset.as_str()), []).unwrap();
        let whitelist = SingleUseWhitelist::new(wl_dir.path(), consumed_dir.path(), policy_id);

        let vm = machine(
            metadata_dir.path(),
            locked_dir.path(),
            Box::new(whitelist),
            vec![payment],
            Map::from([("tx9".to_string(), tx)]),
            5,
        );

        let mut exclusions = ExclusionSet::new();
        vm.vend(&mut exclusions).await.unwrap();

        assert!(exclusions.is_empty());
        assert_eq!(vm.assembler.submitted.lock().unwrap().len(), 0);
        assert!(vm.mint_policy.whitelist.is_whitelisted(&wl_asset));
    }
}

//! The Babbage/Conway-era minimum-UTXO ("minAda") rule, isolated from the
//! rest of `pallas`'s protocol-parameter bootstrapping since the rebate
//! calculator (spec §4.A) only ever needs this one coefficient.
//!
//! `coins_per_utxo_byte` is a protocol parameter (`coinsPerUTxOByte`); 4310
//! is its value on both mainnet and preview as of the Conway era. It is
//! exposed as a parameter, not hardcoded into the formula, so the caller can
//! update it when the ledger changes (spec §4.A).
pub const CONWAY_COINS_PER_UTXO_BYTE: u64 = 4310;

/// Fixed overhead (in bytes) of a UTXO entry before accounting for the
/// serialized value: CBOR overhead for a `(tx_out, ref_script_size)` pair
/// used in the ledger's formula, independent of how many assets it holds.
const UTXO_ENTRY_SIZE_OVERHEAD: u64 = 160;

/// Minimum lovelace required for a UTXO carrying a native-asset bundle of
/// `num_policies` distinct policies, `num_assets` distinct asset names
/// totalling `name_bytes` bytes, following the ledger's
/// `size = 6 + roundupBytesToWords(...)` bundle-size formula.
pub fn min_lovelace_for_bundle(num_policies: u64, num_assets: u64, name_bytes: u64) -> u64 {
    if num_assets == 0 {
        return CONWAY_COINS_PER_UTXO_BYTE * UTXO_ENTRY_SIZE_OVERHEAD / 8;
    }
    // Word (8-byte) count of the value's multiasset map: 6 header words plus
    // the per-policy and per-asset encoded sizes, rounded up to a whole word.
    let bundle_bytes = 12 * num_policies + 28 * num_policies + 12 * num_assets + name_bytes;
    let bundle_words = bundle_bytes.div_ceil(8);
    let size_words = 6 + bundle_words;
    CONWAY_COINS_PER_UTXO_BYTE * size_words
}

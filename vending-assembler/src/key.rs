//! Loads the bech32-encoded signing keys referenced by a [`MintRequest`]
//! (spec §3 "signing key reference"). Key material storage itself is an
//! external collaborator (spec §1); this module only knows how to turn a
//! file path into the `pallas` key type `StagingTransaction::sign` expects.

use std::path::Path;

use pallas::wallet::keystore::hd::Bip32PrivateKey;
use pallas::wallet::keystore::PrivateKey;

pub fn load_ed25519_key(path: &Path) -> anyhow::Result<PrivateKey> {
    let contents = std::fs::read_to_string(path)
        .map_err(|err| anyhow::anyhow!("could not read signing key {}: {err}", path.display()))?;
    let key = Bip32PrivateKey::from_bech32(contents.trim().to_string())
        .map_err(|err| anyhow::anyhow!("malformed signing key {}: {err}", path.display()))?;
    Ok(key.to_ed25519_private_key())
}

//! Error taxonomy (spec §7).

use vending_indexer::IndexerError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("minimum price {0} is below the required floor of 5,000,000 lovelace")]
    PriceTooLow(u64),
    #[error("donation {0} must be 0 or at least 1,000,000 lovelace")]
    InvalidDonation(u64),
    #[error("metadata directory {0} does not exist or is not readable")]
    MetadataDirUnreadable(String),
    #[error("script file {0} does not exist")]
    ScriptFileMissing(String),
    #[error("signing key {0} does not exist")]
    SigningKeyMissing(String),
    #[error("could not find whitelist directory {0}")]
    WhitelistDirMissing(String),
    #[error("{0} does not exist")]
    ConsumedDirMissing(String),
}

/// Raised when `AssetCatalog::commit` finds a reserved file missing from
/// the metadata directory (concurrent edit of the catalog on disk).
#[derive(Debug, thiserror::Error)]
#[error("catalog file missing at commit time: {0}")]
pub struct CatalogCorruption(pub String);

/// Inconsistent whitelist directory state (e.g. a `consumed` marker without
/// a matching `whitelist` entry). Single-use whitelists fail closed on this.
#[derive(Debug, thiserror::Error)]
#[error("whitelist state inconsistency for {asset_id}: {detail}")]
pub struct WhitelistCorruption {
    pub asset_id: String,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerErrorKind {
    /// The network rejected the transaction; terminal for the UTXO.
    Rejected,
    /// The assembler call timed out; terminal for the UTXO within the
    /// session (safety over liveness — reissuing might double-mint).
    Timeout,
}

#[derive(Debug, thiserror::Error)]
#[error("assembler error ({kind:?}): {message}")]
pub struct AssemblerError {
    pub kind: AssemblerErrorKind,
    pub message: String,
}

impl AssemblerError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            kind: AssemblerErrorKind::Rejected,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: AssemblerErrorKind::Timeout,
            message: message.into(),
        }
    }
}

/// Top-level error surfaced by one step of the vending loop (§7). Every
/// variant other than a transient indexer retry terminates processing of
/// the current UTXO and lets the loop continue with the next one.
#[derive(Debug, thiserror::Error)]
pub enum VendError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Catalog(#[from] CatalogCorruption),
    #[error(transparent)]
    Whitelist(#[from] WhitelistCorruption),
    #[error("indexer error: {0}")]
    Indexer(#[from] IndexerError),
    #[error(transparent)]
    Assembler(#[from] AssemblerError),
}

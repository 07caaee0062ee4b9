//! The NFT vending machine core: rebate calculator (§4.A), asset catalog
//! (§4.B), whitelist engine (§4.C), mint policy (§4.D) and the vending loop
//! (§4.E) that drives them, plus the transaction-assembler interface
//! (§4.F) the loop depends on.

pub mod assembler;
pub mod catalog;
pub mod errors;
pub mod loop_;
pub mod policy;
pub mod rebate;
pub mod whitelist;

pub use assembler::{CliAssembler, TransactionAssembler};
pub use catalog::{total_name_bytes, AssetCatalog, AssetDescriptor};
pub use errors::{
    AssemblerError, AssemblerErrorKind, CatalogCorruption, ConfigurationError, VendError,
    WhitelistCorruption,
};
pub use loop_::{ExclusionSet, VendingMachine};
pub use policy::MintPolicy;
pub use rebate::RebateCalculator;
pub use whitelist::{NoWhitelist, SingleUseWhitelist, UnlimitedWhitelist, Whitelist, WhitelistVerdict};

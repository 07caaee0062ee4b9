mod asset;
mod min_utxo;
mod mint_request;
mod network;
mod tx;

pub use asset::{asset_name_hex, hex_to_asset_name, AssetId, AssetIdError};
pub use min_utxo::{min_lovelace_for_bundle, CONWAY_COINS_PER_UTXO_BYTE};
pub use mint_request::{MintAsset, MintOutcome, MintRequest, PlannedOutput};
pub use network::NetworkId;
pub use tx::{TransactionView, TxHash, TxRef, UTxO};

use std::str::FromStr;

/// Which Cardano network a vending-machine instance is wired to.
///
/// Mirrors `pallas::ledger::primitives::NetworkId`, but also carries the
/// magic number Blockfrost-style indexers expect in request headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkId {
    Mainnet,
    Preview,
}

impl NetworkId {
    pub fn magic(&self) -> u32 {
        match self {
            NetworkId::Mainnet => 764824073,
            NetworkId::Preview => 2,
        }
    }

    pub fn is_mainnet(&self) -> bool {
        matches!(self, NetworkId::Mainnet)
    }
}

impl From<NetworkId> for pallas::ledger::primitives::NetworkId {
    fn from(val: NetworkId) -> Self {
        match val {
            NetworkId::Mainnet => pallas::ledger::primitives::NetworkId::Mainnet,
            NetworkId::Preview => pallas::ledger::primitives::NetworkId::Testnet,
        }
    }
}

impl FromStr for NetworkId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" | "Mainnet" => Ok(NetworkId::Mainnet),
            "preview" | "Preview" | "testnet" | "Testnet" => Ok(NetworkId::Preview),
            _ => Err(format!("unknown network {s}")),
        }
    }
}

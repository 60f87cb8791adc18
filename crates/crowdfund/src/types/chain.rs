//! Chain identifiers for the networks campaigns are deployed to

use serde::{Deserialize, Serialize};
use std::fmt;

/// Chain id used by Anvil and most local development nodes
pub const LOCAL_CHAIN_ID: u64 = 31337;

/// Chain id of Ganache and geth `--dev` nodes
pub const DEV_CHAIN_ID: u64 = 1337;

/// Identifier for blockchain networks
///
/// Known public networks get a display name; anything else, including the
/// local development chain, is carried by its numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub enum ChainId {
	Mainnet,
	Sepolia,
	Local,
	Custom { id: u64 },
}

impl ChainId {
	pub fn from_u64(id: u64) -> Self {
		match id {
			1 => Self::Mainnet,
			11155111 => Self::Sepolia,
			LOCAL_CHAIN_ID => Self::Local,
			id => Self::Custom { id },
		}
	}

	pub fn id(&self) -> u64 {
		match self {
			Self::Mainnet => 1,
			Self::Sepolia => 11155111,
			Self::Local => LOCAL_CHAIN_ID,
			Self::Custom { id } => *id,
		}
	}

	/// Human-readable network name
	pub fn name(&self) -> &str {
		match self {
			Self::Mainnet => "Ethereum Mainnet",
			Self::Sepolia => "Sepolia",
			Self::Local => "Local",
			Self::Custom { id: 4 } => "Rinkeby",
			Self::Custom { id: 5 } => "Goerli",
			Self::Custom { id: 17000 } => "Holesky",
			Self::Custom { .. } => "Custom Chain",
		}
	}

	/// Whether this is a development chain where test mnemonics are acceptable
	pub fn is_local(&self) -> bool {
		matches!(self, Self::Local | Self::Custom { id: DEV_CHAIN_ID })
	}
}

impl fmt::Display for ChainId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({})", self.id(), self.name())
	}
}

impl From<u64> for ChainId {
	fn from(id: u64) -> Self {
		Self::from_u64(id)
	}
}

impl From<ChainId> for u64 {
	fn from(chain: ChainId) -> Self {
		chain.id()
	}
}

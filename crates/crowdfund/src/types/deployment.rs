//! Records of contracts deployed by the `deploy` stage

use crate::types::chain::ChainId;
use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

/// Outcome of a confirmed contract-creation transaction
///
/// Persisted per chain so later invocations can find the factory without a
/// hardcoded address. Contains no credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
	pub contract: String,
	pub address: Address,
	pub chain: ChainId,
	pub tx_hash: B256,
	pub deployer: Address,
	pub gas_used: u64,
	pub block_number: Option<u64>,
}

impl DeploymentRecord {
	/// Storage key under which the latest deployment for a chain is kept
	pub fn storage_key(chain: ChainId) -> String {
		format!("deployments/{}", chain.id())
	}
}

//! Names and defaults shared by the crowdfund stages

/// Contract that registers and creates campaigns; the one `deploy` submits
pub const FACTORY_CONTRACT: &str = "CampaignFactory";

/// Contract created by the factory for each campaign
pub const CAMPAIGN_CONTRACT: &str = "Campaign";

/// Per-account balance, in ether, of locally spawned nodes
pub const DEFAULT_NODE_BALANCE_ETHER: u64 = 100;

/// Well-known development accounts of a local Anvil node
///
/// Public test material. Only ever handed to a local node, never used to
/// sign on a public network.
pub mod dev_accounts {
	/// Anvil's default recovery phrase
	pub const MNEMONIC: &str = "test test test test test test test test test test test junk";

	/// First account derived from [`MNEMONIC`]
	pub const FIRST_ADDRESS: alloy_primitives::Address =
		alloy_primitives::address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
}

/// Environment variable names
pub mod env_vars {
	pub const MNEMONIC: &str = "CROWDFUND_MNEMONIC";
	pub const CONFIG: &str = "CROWDFUND_CONFIG";
	pub const DEBUG: &str = "CROWDFUND_DEBUG";
}

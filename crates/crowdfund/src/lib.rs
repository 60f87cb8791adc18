//! Crowdfunding contract toolchain
//!
//! Compiles the campaign contracts with `solc`, deploys the factory through
//! JSON-RPC, and exposes typed handles to the deployed contracts. The
//! stages share nothing but the build directory and the RPC endpoint.

pub mod cli;
pub mod constants;
pub mod core;
pub mod operations;
pub mod types;
pub mod utils;

use crate::{
	core::{blockchain::Provider, config::Config, signing::Accounts, storage::Storage},
	types::error::Result,
};
use std::path::Path;

/// Configuration and session storage shared by every operation
#[derive(Debug, Clone)]
pub struct Context {
	pub config: Config,
	pub storage: Storage,
}

impl Context {
	/// Load configuration from `path` (or the defaults) and open storage
	pub fn load(path: Option<&Path>) -> Result<Self> {
		Self::new(Config::load(path)?)
	}

	pub fn new(config: Config) -> Result<Self> {
		let storage = Storage::new(&config.data_dir)?;
		Ok(Self { config, storage })
	}

	/// Signing accounts derived from the configured recovery phrase
	pub fn accounts(&self) -> Result<Accounts> {
		Accounts::from_mnemonic(&self.config.mnemonic()?, self.config.account.count)
	}

	/// Provider that signs with the configured accounts
	pub async fn signing_provider(&self) -> Result<(Provider, Accounts)> {
		let accounts = self.accounts()?;
		let provider = Provider::connect(self.config.rpc_url()?.as_str(), Some(&accounts)).await?;
		Ok((provider, accounts))
	}

	/// Provider for queries only; needs no credentials
	pub async fn read_provider(&self) -> Result<Provider> {
		Provider::connect(self.config.rpc_url()?.as_str(), None).await
	}
}

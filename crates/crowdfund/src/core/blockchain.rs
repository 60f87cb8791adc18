//! Blockchain provider and transaction execution
//!
//! Wraps an alloy provider bound to one RPC endpoint. With [`Accounts`] the
//! provider signs locally through a wallet filler, so transactions go out
//! as `eth_sendRawTransaction` and the node never needs unlocked accounts.
//! Nonce, gas limit, fees and chain id are filled by alloy's recommended
//! fillers; the network decides the gas price.

use crate::{
	core::signing::Accounts,
	types::{
		chain::ChainId,
		error::{Error, Result},
	},
};
use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes, U256};
use alloy_provider::{DynProvider, Provider as AlloyProvider, ProviderBuilder};
use alloy_rpc_types::{TransactionReceipt, TransactionRequest};
use tracing::{debug, info};

/// Provider bound to a single chain, optionally able to sign
#[derive(Clone)]
pub struct Provider {
	inner: DynProvider,
	chain: ChainId,
	accounts: Vec<Address>,
	url: String,
}

impl std::fmt::Debug for Provider {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Provider")
			.field("chain", &self.chain)
			.field("url", &self.url)
			.field("accounts", &self.accounts)
			.finish()
	}
}

impl Provider {
	/// Connect to an RPC endpoint and verify it answers
	///
	/// # Arguments
	/// * `rpc_url` - HTTP JSON-RPC endpoint
	/// * `accounts` - Signing accounts; `None` gives a read-only provider
	///
	/// # Errors
	/// Returns `InvalidRpcUrl` for a malformed URL and `RpcError` when the
	/// endpoint cannot report its chain id
	pub async fn connect(rpc_url: &str, accounts: Option<&Accounts>) -> Result<Self> {
		let url: url::Url = rpc_url
			.parse()
			.map_err(|e| Error::InvalidRpcUrl(format!("{}: {}", rpc_url, e)))?;

		let (inner, addresses) = match accounts {
			Some(accounts) => {
				let provider = ProviderBuilder::new()
					.wallet(accounts.wallet()?)
					.connect_http(url);
				(provider.erased(), accounts.addresses())
			},
			None => (ProviderBuilder::new().connect_http(url).erased(), Vec::new()),
		};

		let chain_id = inner
			.get_chain_id()
			.await
			.map_err(|e| Error::RpcError(format!("Failed to connect to {}: {}", rpc_url, e)))?;
		let chain = ChainId::from_u64(chain_id);

		debug!(chain = %chain, url = rpc_url, accounts = addresses.len(), "Connected to RPC endpoint");

		Ok(Self {
			inner,
			chain,
			accounts: addresses,
			url: rpc_url.to_string(),
		})
	}

	pub fn chain(&self) -> ChainId {
		self.chain
	}

	/// Accounts this provider can sign for, default sender first
	pub fn accounts(&self) -> &[Address] {
		&self.accounts
	}

	/// Default sender for transactions without an explicit `from`
	pub fn default_account(&self) -> Result<Address> {
		self.accounts.first().copied().ok_or(Error::NoAccounts)
	}

	/// Balance of `address` in wei
	pub async fn balance(&self, address: Address) -> Result<U256> {
		self.inner
			.get_balance(address)
			.await
			.map_err(|e| Error::RpcError(format!("Failed to get balance: {}", e)))
	}

	/// Execute a read-only `eth_call` and return the raw output
	pub async fn call(&self, tx: TransactionRequest) -> Result<Bytes> {
		Ok(self.inner.call(tx).await?)
	}

	/// Submit a transaction and wait until it is mined
	///
	/// Falls back to the default account when `from` is unset. A mined
	/// transaction whose receipt reports failure is returned as `Reverted`.
	pub async fn send_and_wait(&self, mut tx: TransactionRequest) -> Result<TransactionReceipt> {
		if tx.from.is_none() {
			tx.from = Some(self.default_account()?);
		}

		let pending = self.inner.send_transaction(tx).await?;
		let hash = *pending.tx_hash();
		debug!(tx_hash = %hash, "Transaction submitted");

		let receipt = pending.get_receipt().await?;
		if !receipt.status() {
			return Err(Error::Reverted(format!(
				"transaction {} failed in block {:?}",
				hash, receipt.block_number
			)));
		}

		debug!(tx_hash = %hash, gas_used = receipt.gas_used, "Transaction confirmed");
		Ok(receipt)
	}

	/// Submit a contract-creation transaction carrying `code`
	pub async fn deploy_code(&self, code: Bytes, from: Address) -> Result<TransactionReceipt> {
		let tx = TransactionRequest::default()
			.from(from)
			.with_deploy_code(code);
		self.send_and_wait(tx).await
	}

	/// Release the connection; logs so scripts show an explicit teardown
	pub fn close(self) {
		info!(url = %self.url, "Closing provider connection");
	}
}

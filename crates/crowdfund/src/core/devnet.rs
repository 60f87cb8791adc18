//! Local Anvil chains
//!
//! [`LocalChain`] owns an `anvil` child process on a free port and kills it
//! when dropped, so every holder gets a blank chain of its own. The command
//! line and readiness probe are shared with the detached node started by
//! `crowdfund node start`.

use crate::{
	constants::{dev_accounts, DEFAULT_NODE_BALANCE_ETHER},
	core::{blockchain::Provider, signing::Accounts},
	types::{
		chain::LOCAL_CHAIN_ID,
		error::{Error, Result},
		secret::SecretString,
	},
};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

const READY_ATTEMPTS: u32 = 50;
const READY_INTERVAL: Duration = Duration::from_millis(200);

/// Options for an Anvil process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnvilOptions {
	pub port: u16,
	pub accounts: u32,
	/// Starting balance per account, in ether
	pub balance: u64,
	pub chain_id: u64,
}

impl Default for AnvilOptions {
	fn default() -> Self {
		Self {
			port: 8545,
			accounts: 10,
			balance: DEFAULT_NODE_BALANCE_ETHER,
			chain_id: LOCAL_CHAIN_ID,
		}
	}
}

impl AnvilOptions {
	pub fn url(&self) -> String {
		format!("http://127.0.0.1:{}", self.port)
	}

	fn args(&self) -> Vec<String> {
		vec![
			"--port".into(),
			self.port.to_string(),
			"--accounts".into(),
			self.accounts.to_string(),
			"--balance".into(),
			self.balance.to_string(),
			"--mnemonic".into(),
			dev_accounts::MNEMONIC.into(),
			"--chain-id".into(),
			self.chain_id.to_string(),
		]
	}
}

/// Whether `anvil` can be found on `PATH`
pub fn anvil_available() -> bool {
	which::which("anvil").is_ok()
}

/// Command that starts Anvil with `options`, output discarded
pub fn anvil_command(options: &AnvilOptions) -> Result<Command> {
	let binary = which::which("anvil").map_err(|_| Error::AnvilNotFound)?;

	let mut cmd = Command::new(binary);
	cmd.args(options.args())
		.stdin(Stdio::null())
		.stdout(Stdio::null())
		.stderr(Stdio::null());
	Ok(cmd)
}

/// Pick a TCP port that is free right now
pub fn free_port() -> Result<u16> {
	let listener = TcpListener::bind("127.0.0.1:0")?;
	Ok(listener.local_addr()?.port())
}

/// Check if a node answers `eth_blockNumber`
pub async fn is_ready(url: &str) -> bool {
	let client = reqwest::Client::new();
	let response = client
		.post(url)
		.json(&serde_json::json!({
			"jsonrpc": "2.0",
			"method": "eth_blockNumber",
			"params": [],
			"id": 1
		}))
		.send()
		.await;

	matches!(response, Ok(r) if r.status().is_success())
}

/// Poll `url` until the node answers
pub async fn wait_ready(url: &str) -> Result<()> {
	for attempt in 1..=READY_ATTEMPTS {
		if is_ready(url).await {
			debug!(url, attempt, "Node is ready");
			return Ok(());
		}
		sleep(READY_INTERVAL).await;
	}
	Err(Error::NodeNotReady(url.to_string()))
}

/// Anvil process owned by the current test or script
#[derive(Debug)]
pub struct LocalChain {
	child: Child,
	options: AnvilOptions,
}

impl LocalChain {
	/// Start a blank chain on a free port with ten funded accounts
	pub async fn spawn() -> Result<Self> {
		Self::spawn_with(AnvilOptions {
			port: free_port()?,
			..AnvilOptions::default()
		})
		.await
	}

	/// Start a chain with explicit options and wait until it answers
	pub async fn spawn_with(options: AnvilOptions) -> Result<Self> {
		let child = anvil_command(&options)?
			.spawn()
			.map_err(|e| Error::AnvilStartFailed(e.to_string()))?;

		let mut chain = Self { child, options };
		let url = chain.url();

		for _ in 0..READY_ATTEMPTS {
			if let Some(status) = chain.child.try_wait()? {
				return Err(Error::AnvilStartFailed(format!("exited early with {status}")));
			}
			if is_ready(&url).await {
				info!(url = %url, pid = chain.child.id(), "Local chain started");
				return Ok(chain);
			}
			sleep(READY_INTERVAL).await;
		}

		Err(Error::NodeNotReady(url))
	}

	pub fn url(&self) -> String {
		self.options.url()
	}

	pub fn options(&self) -> &AnvilOptions {
		&self.options
	}

	/// The funded development accounts of this chain
	pub fn accounts(&self) -> Result<Accounts> {
		Accounts::from_mnemonic(
			&SecretString::from(dev_accounts::MNEMONIC),
			self.options.accounts,
		)
	}

	/// Provider signing with every funded account
	pub async fn provider(&self) -> Result<Provider> {
		Provider::connect(&self.url(), Some(&self.accounts()?)).await
	}
}

impl Drop for LocalChain {
	fn drop(&mut self) {
		if let Err(e) = self.child.kill() {
			warn!(error = %e, "Failed to stop local chain");
		}
		let _ = self.child.wait();
	}
}

//! Detached local node management
//!
//! `node start` leaves an Anvil process running after the CLI exits so that
//! `deploy` and the campaign commands can target a persistent local chain.
//! The process record lives in session storage; liveness is checked against
//! the operating system's process table.

use crate::{
	core::devnet::{self, AnvilOptions},
	types::error::{Error, Result},
	Context,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tracing::{info, instrument, warn};

const NODE_KEY: &str = "node";

/// Record of a node started by `node start`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeProcess {
	pub pid: u32,
	pub port: u16,
	pub chain_id: u64,
}

impl NodeProcess {
	pub fn url(&self) -> String {
		format!("http://127.0.0.1:{}", self.port)
	}
}

/// Result of `node status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeStatus {
	pub running: bool,
	pub process: Option<NodeProcess>,
	pub url: String,
}

/// Local node operations
pub struct NodeOps {
	ctx: Arc<Context>,
}

impl NodeOps {
	pub fn new(ctx: Arc<Context>) -> Self {
		Self { ctx }
	}

	fn options(&self) -> AnvilOptions {
		let node = &self.ctx.config.node;
		AnvilOptions {
			port: node.port,
			accounts: node.accounts,
			balance: node.balance,
			chain_id: node.chain_id,
		}
	}

	/// Stored record, if its process is still alive
	fn running_process(&self) -> Result<Option<NodeProcess>> {
		let process: Option<NodeProcess> = self.ctx.storage.load_optional(NODE_KEY)?;
		Ok(process.filter(|p| is_pid_running(p.pid)))
	}

	/// Start Anvil in the background and wait until it answers
	///
	/// # Errors
	/// Returns `NodeAlreadyRunning` when a previously started node is alive
	#[instrument(skip(self))]
	pub async fn start(&self) -> Result<NodeProcess> {
		if let Some(process) = self.running_process()? {
			return Err(Error::NodeAlreadyRunning(process.pid));
		}

		let options = self.options();
		info!(port = options.port, chain_id = options.chain_id, "Starting Anvil process");

		let child = devnet::anvil_command(&options)?
			.spawn()
			.map_err(|e| Error::AnvilStartFailed(e.to_string()))?;

		let process = NodeProcess {
			pid: child.id(),
			port: options.port,
			chain_id: options.chain_id,
		};
		self.ctx.storage.save(NODE_KEY, &process)?;

		if let Err(e) = devnet::wait_ready(&process.url()).await {
			kill_pid(process.pid);
			self.ctx.storage.delete(NODE_KEY)?;
			return Err(e);
		}

		info!(pid = process.pid, url = %process.url(), "Anvil process started");
		Ok(process)
	}

	/// Stop the node started by `start`; returns the stopped record
	#[instrument(skip(self))]
	pub fn stop(&self) -> Result<Option<NodeProcess>> {
		let process = self.running_process()?;
		if let Some(process) = &process {
			info!(pid = process.pid, "Stopping Anvil process");
			if !kill_pid(process.pid) {
				warn!(pid = process.pid, "Process did not accept the kill signal");
			}
		}
		self.ctx.storage.delete(NODE_KEY)?;
		Ok(process)
	}

	pub fn status(&self) -> Result<NodeStatus> {
		let process = self.running_process()?;
		let url = process
			.as_ref()
			.map(NodeProcess::url)
			.unwrap_or_else(|| self.ctx.config.node_url());

		Ok(NodeStatus {
			running: process.is_some(),
			process,
			url,
		})
	}
}

fn is_pid_running(pid: u32) -> bool {
	let mut sys = System::new();
	sys.refresh_processes(ProcessesToUpdate::All, true);
	sys.processes().contains_key(&Pid::from_u32(pid))
}

fn kill_pid(pid: u32) -> bool {
	let mut sys = System::new();
	sys.refresh_processes(ProcessesToUpdate::All, true);
	sys.process(Pid::from_u32(pid))
		.map(|process| process.kill())
		.unwrap_or(false)
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	fn ops(dir: &TempDir) -> NodeOps {
		let toml = format!(
			"data_dir = \"{}\"\n[node]\nport = 9999\n",
			dir.path().display()
		);
		NodeOps::new(Arc::new(Context::new(toml.parse().unwrap()).unwrap()))
	}

	#[test]
	fn test_status_without_node() {
		let dir = TempDir::new().unwrap();
		let status = ops(&dir).status().unwrap();

		assert!(!status.running);
		assert!(status.process.is_none());
		assert_eq!(status.url, "http://127.0.0.1:9999");
	}

	#[test]
	fn test_stale_record_is_not_running() {
		let dir = TempDir::new().unwrap();
		let ops = ops(&dir);
		ops.ctx
			.storage
			.save(
				NODE_KEY,
				&NodeProcess {
					pid: u32::MAX,
					port: 9999,
					chain_id: 31337,
				},
			)
			.unwrap();

		assert!(!ops.status().unwrap().running);
		assert_eq!(ops.stop().unwrap(), None);
		assert!(!ops.ctx.storage.exists(NODE_KEY));
	}

	#[test]
	fn test_current_process_is_running() {
		assert!(is_pid_running(std::process::id()));
	}
}

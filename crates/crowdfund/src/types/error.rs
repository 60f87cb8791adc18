//! Error types and result handling for the crowdfund toolchain
//!
//! Every stage (compile, deploy, contract access, local node management)
//! reports failures through the single [`Error`] enum defined here. Variants
//! are grouped by the subsystem that raises them so callers can tell a
//! compiler rejection from an RPC outage or an on-chain revert.

use std::path::PathBuf;

/// Convenience Result type alias using the local Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all crowdfund operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
	// Compiler errors
	#[error("Compiler binary not found: {0}")]
	CompilerNotFound(String),

	#[error("Compilation failed:\n{0}")]
	Compilation(String),

	#[error("Source file not found: {0}")]
	SourceNotFound(PathBuf),

	// Artifact and storage errors
	#[error("Artifact not found for contract {name} in {dir}")]
	ArtifactNotFound { name: String, dir: PathBuf },

	#[error("Invalid artifact: {0}")]
	InvalidArtifact(String),

	#[error("Storage error: {0}")]
	StorageError(String),

	// Network errors
	#[error("RPC request failed: {0}")]
	RpcError(String),

	#[error("Invalid RPC URL: {0}")]
	InvalidRpcUrl(String),

	// Contract errors
	#[error("Transaction reverted: {0}")]
	Reverted(String),

	#[error("Failed to encode call to {method}: {reason}")]
	AbiEncode { method: String, reason: String },

	#[error("Failed to decode result of {method}: {reason}")]
	AbiDecode { method: String, reason: String },

	#[error("Function {0} not found in contract interface")]
	UnknownFunction(String),

	#[error("Contract not deployed on chain {0}")]
	ContractNotDeployed(u64),

	#[error("Deployment failed: {0}")]
	DeploymentFailed(String),

	// Config errors
	#[error("Configuration file not found: {0}")]
	ConfigNotFound(PathBuf),

	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("Missing required setting: {0}")]
	MissingField(String),

	// Account errors
	#[error("Invalid mnemonic: {0}")]
	InvalidMnemonic(String),

	#[error("No accounts available")]
	NoAccounts,

	// Local node errors
	#[error("Anvil binary not found, install Foundry from https://getfoundry.sh")]
	AnvilNotFound,

	#[error("Failed to start Anvil: {0}")]
	AnvilStartFailed(String),

	#[error("Local node already running (pid {0})")]
	NodeAlreadyRunning(u32),

	#[error("Local node not ready at {0}")]
	NodeNotReady(String),

	// Validation errors
	#[error("Invalid hex string: {0}")]
	InvalidHex(String),

	#[error("Invalid address: {0}")]
	InvalidAddress(String),

	#[error("Invalid amount: {0}")]
	InvalidAmount(String),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	// Generic error for unexpected cases
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl Error {
	/// Whether this error was reported by the network as a contract-level revert
	pub fn is_revert(&self) -> bool {
		matches!(self, Error::Reverted(_))
	}
}

/// Classifies a transport error raised while estimating or submitting a
/// transaction. Node error payloads mentioning a revert are contract-level
/// rejections, everything else stays an RPC failure.
impl From<alloy_transport::TransportError> for Error {
	fn from(err: alloy_transport::TransportError) -> Self {
		match err.as_error_resp() {
			Some(payload) if payload.message.contains("revert") => {
				Error::Reverted(payload.message.to_string())
			},
			Some(payload) => {
				Error::RpcError(format!("{} (code {})", payload.message, payload.code))
			},
			None => Error::RpcError(err.to_string()),
		}
	}
}

impl From<alloy_provider::PendingTransactionError> for Error {
	fn from(err: alloy_provider::PendingTransactionError) -> Self {
		match err {
			alloy_provider::PendingTransactionError::TransportError(e) => e.into(),
			other => Error::RpcError(other.to_string()),
		}
	}
}

//! Deploy stage
//!
//! Submits the creation transaction for a compiled contract from the first
//! configured account and records where it landed. Failures are reported
//! once and never retried.

use crate::{
	constants::dev_accounts,
	core::{blockchain::Provider, contracts::ContractHandle},
	types::{
		artifact::Artifact,
		deployment::DeploymentRecord,
		error::{Error, Result},
	},
	Context,
};
use alloy_primitives::Address;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Deploy operations
pub struct DeployOps {
	ctx: Arc<Context>,
}

impl DeployOps {
	pub fn new(ctx: Arc<Context>) -> Self {
		Self { ctx }
	}

	/// Deploy `contract` from the build directory and record the result
	///
	/// # Errors
	/// Returns `ArtifactNotFound` when the contract was not compiled,
	/// `MissingField` without a recovery phrase, and the RPC or revert error
	/// of the creation transaction otherwise
	#[instrument(skip(self))]
	pub async fn deploy(&self, contract: &str) -> Result<DeploymentRecord> {
		let artifact = Artifact::load(&self.ctx.config.compiler.build_dir, contract)?;
		if !artifact.is_deployable() {
			return Err(Error::DeploymentFailed(format!(
				"{contract} has no creation bytecode"
			)));
		}

		let (provider, accounts) = self.ctx.signing_provider().await?;
		let from = accounts.first()?;
		let result = self.submit(&artifact, &provider, from).await;
		provider.close();

		let record = result?;
		self.ctx
			.storage
			.save(&DeploymentRecord::storage_key(record.chain), &record)?;
		Ok(record)
	}

	async fn submit(
		&self,
		artifact: &Artifact,
		provider: &Provider,
		from: Address,
	) -> Result<DeploymentRecord> {
		info!("Attempting to deploy from account {}", from);
		if !provider.chain().is_local() && from == dev_accounts::FIRST_ADDRESS {
			warn!(chain = %provider.chain(), "Deploying from the public development account");
		}

		let (handle, receipt) =
			ContractHandle::deploy(artifact, &[], provider.clone(), from).await?;

		info!(
			contract = %artifact.name,
			address = %handle.address(),
			tx_hash = %receipt.transaction_hash,
			gas_used = receipt.gas_used,
			"Contract deployed"
		);

		Ok(DeploymentRecord {
			contract: artifact.name.clone(),
			address: handle.address(),
			chain: provider.chain(),
			tx_hash: receipt.transaction_hash,
			deployer: from,
			gas_used: receipt.gas_used,
			block_number: receipt.block_number,
		})
	}
}

//! Access to the deployed campaign factory

use crate::{
	constants::FACTORY_CONTRACT,
	core::{blockchain::Provider, contracts::CampaignFactory},
	types::{
		artifact::Artifact,
		chain::ChainId,
		deployment::DeploymentRecord,
		error::{Error, Result},
	},
	Context,
};
use alloy_primitives::{Address, U256};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Campaign created through the factory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedCampaign {
	pub address: Address,
	pub manager: Address,
	pub minimum: U256,
}

/// Factory operations
pub struct FactoryOps {
	ctx: Arc<Context>,
}

impl FactoryOps {
	pub fn new(ctx: Arc<Context>) -> Self {
		Self { ctx }
	}

	/// Factory address for `chain`: the configured one, else the recorded
	/// deployment
	///
	/// # Errors
	/// Returns `ContractNotDeployed` when neither is available
	pub fn resolve_address(&self, chain: ChainId) -> Result<Address> {
		if let Some(address) = self.ctx.config.network.factory_address {
			debug!(address = %address, "Using configured factory address");
			return Ok(address);
		}

		let record: Option<DeploymentRecord> = self
			.ctx
			.storage
			.load_optional(&DeploymentRecord::storage_key(chain))?;

		match record {
			Some(record) if record.contract == FACTORY_CONTRACT && record.chain == chain => {
				debug!(address = %record.address, "Using recorded factory deployment");
				Ok(record.address)
			},
			_ => Err(Error::ContractNotDeployed(chain.id())),
		}
	}

	/// Handle to the factory on the provider's chain
	pub fn factory(&self, provider: Provider) -> Result<CampaignFactory> {
		let artifact = Artifact::load(&self.ctx.config.compiler.build_dir, FACTORY_CONTRACT)?;
		let address = self.resolve_address(provider.chain())?;
		Ok(CampaignFactory::at(&artifact, address, provider))
	}

	/// Every campaign the factory created
	#[instrument(skip(self))]
	pub async fn list(&self) -> Result<Vec<Address>> {
		let provider = self.ctx.read_provider().await?;
		self.factory(provider)?.deployed_campaigns().await
	}

	/// Create a campaign managed by account `account`
	#[instrument(skip(self))]
	pub async fn create(&self, minimum: U256, account: usize) -> Result<CreatedCampaign> {
		let (provider, accounts) = self.ctx.signing_provider().await?;
		let manager = accounts.get(account)?;
		let factory = self.factory(provider)?;

		factory.create_campaign(minimum, manager).await?;
		let address = factory
			.deployed_campaigns()
			.await?
			.last()
			.copied()
			.ok_or_else(|| Error::DeploymentFailed("factory lists no campaigns".into()))?;

		info!(campaign = %address, manager = %manager, minimum = %minimum, "Campaign created");
		Ok(CreatedCampaign {
			address,
			manager,
			minimum,
		})
	}
}

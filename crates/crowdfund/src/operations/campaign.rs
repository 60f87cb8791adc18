//! Interaction with individual campaigns
//!
//! Each state-changing operation signs with one of the configured accounts,
//! selected by index, and waits for the transaction to be mined.

use crate::{
	constants::CAMPAIGN_CONTRACT,
	core::{
		blockchain::Provider,
		contracts::{Campaign, CampaignSummary, Request},
	},
	types::{artifact::Artifact, error::Result},
	Context,
};
use alloy_primitives::{Address, B256, U256};
use alloy_rpc_types::TransactionReceipt;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

/// Summary of a campaign together with all of its requests
#[derive(Debug, Clone, Serialize)]
pub struct CampaignDetails {
	pub address: Address,
	pub summary: CampaignSummary,
	pub requests: Vec<Request>,
}

/// Outcome of a mined campaign transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxOutcome {
	pub tx_hash: B256,
	pub from: Address,
	pub gas_used: u64,
	pub block_number: Option<u64>,
}

impl TxOutcome {
	fn from_receipt(receipt: &TransactionReceipt) -> Self {
		Self {
			tx_hash: receipt.transaction_hash,
			from: receipt.from,
			gas_used: receipt.gas_used,
			block_number: receipt.block_number,
		}
	}
}

/// Campaign operations
pub struct CampaignOps {
	ctx: Arc<Context>,
}

impl CampaignOps {
	pub fn new(ctx: Arc<Context>) -> Self {
		Self { ctx }
	}

	fn bind(&self, address: Address, provider: Provider) -> Result<Campaign> {
		let artifact = Artifact::load(&self.ctx.config.compiler.build_dir, CAMPAIGN_CONTRACT)?;
		Ok(Campaign::at(&artifact, address, provider))
	}

	async fn signing(&self, address: Address, account: usize) -> Result<(Campaign, Address)> {
		let (provider, accounts) = self.ctx.signing_provider().await?;
		let from = accounts.get(account)?;
		Ok((self.bind(address, provider)?, from))
	}

	/// Summary and every request of the campaign at `address`
	#[instrument(skip(self))]
	pub async fn show(&self, address: Address) -> Result<CampaignDetails> {
		let campaign = self.bind(address, self.ctx.read_provider().await?)?;
		let summary = campaign.summary().await?;

		let count = u64::try_from(summary.requests_count).unwrap_or(u64::MAX);
		let mut requests = Vec::new();
		for index in 0..count {
			requests.push(campaign.request(index).await?);
		}

		Ok(CampaignDetails {
			address,
			summary,
			requests,
		})
	}

	#[instrument(skip(self))]
	pub async fn contribute(&self, address: Address, value: U256, account: usize) -> Result<TxOutcome> {
		let (campaign, from) = self.signing(address, account).await?;
		let receipt = campaign.contribute(from, value).await?;
		info!(campaign = %address, from = %from, value = %value, "Contribution accepted");
		Ok(TxOutcome::from_receipt(&receipt))
	}

	#[instrument(skip(self))]
	pub async fn create_request(
		&self,
		address: Address,
		description: &str,
		value: U256,
		recipient: Address,
		account: usize,
	) -> Result<TxOutcome> {
		let (campaign, from) = self.signing(address, account).await?;
		let receipt = campaign
			.create_request(from, description, value, recipient)
			.await?;
		info!(campaign = %address, recipient = %recipient, value = %value, "Request created");
		Ok(TxOutcome::from_receipt(&receipt))
	}

	#[instrument(skip(self))]
	pub async fn approve(&self, address: Address, index: u64, account: usize) -> Result<TxOutcome> {
		let (campaign, from) = self.signing(address, account).await?;
		let receipt = campaign.approve_request(from, index).await?;
		info!(campaign = %address, index, approver = %from, "Request approved");
		Ok(TxOutcome::from_receipt(&receipt))
	}

	#[instrument(skip(self))]
	pub async fn finalize(&self, address: Address, index: u64, account: usize) -> Result<TxOutcome> {
		let (campaign, from) = self.signing(address, account).await?;
		let receipt = campaign.finalize_request(from, index).await?;
		info!(campaign = %address, index, "Request finalized");
		Ok(TxOutcome::from_receipt(&receipt))
	}
}

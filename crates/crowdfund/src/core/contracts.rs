//! Contract handles built from compiled artifacts
//!
//! A [`ContractHandle`] pairs the interface of one artifact with a deployed
//! address and a provider. It keeps no client-side state: every query is an
//! `eth_call` and every state change is a mined transaction. The typed
//! [`CampaignFactory`] and [`Campaign`] wrappers encode arguments and decode
//! results for the crowdfunding contracts.

use crate::types::{
	artifact::Artifact,
	error::{Error, Result},
};
use alloy_dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy_json_abi::{Function, JsonAbi};
use alloy_primitives::{Address, Bytes, U256};
use alloy_rpc_types::{TransactionReceipt, TransactionRequest};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use super::blockchain::Provider;

/// Deployed contract bound to the interface it was compiled with
#[derive(Debug, Clone)]
pub struct ContractHandle {
	name: String,
	abi: Arc<JsonAbi>,
	address: Address,
	provider: Provider,
}

impl ContractHandle {
	/// Bind an artifact's interface to an address
	///
	/// The address is not checked. An address holding a different contract
	/// fails on first use with a decode or RPC error.
	pub fn at(artifact: &Artifact, address: Address, provider: Provider) -> Self {
		Self {
			name: artifact.name.clone(),
			abi: Arc::new(artifact.abi.clone()),
			address,
			provider,
		}
	}

	/// Deploy the artifact's bytecode with ABI-encoded constructor arguments
	///
	/// # Errors
	/// Returns `AbiEncode` when the arguments do not fit the constructor,
	/// `Reverted` when the creation transaction fails, and `DeploymentFailed`
	/// when the receipt carries no contract address
	pub async fn deploy(
		artifact: &Artifact,
		args: &[DynSolValue],
		provider: Provider,
		from: Address,
	) -> Result<(Self, TransactionReceipt)> {
		let mut code = artifact.bytecode()?.to_vec();

		match &artifact.abi.constructor {
			Some(constructor) => {
				let encoded = constructor
					.abi_encode_input(args)
					.map_err(|e| Error::AbiEncode {
						method: format!("{}.constructor", artifact.name),
						reason: e.to_string(),
					})?;
				code.extend_from_slice(&encoded);
			},
			None if !args.is_empty() => {
				return Err(Error::AbiEncode {
					method: format!("{}.constructor", artifact.name),
					reason: format!("takes no arguments, {} given", args.len()),
				});
			},
			None => {},
		}

		let receipt = provider.deploy_code(Bytes::from(code), from).await?;
		let address = receipt.contract_address.ok_or_else(|| {
			Error::DeploymentFailed(format!(
				"no contract address in receipt {}",
				receipt.transaction_hash
			))
		})?;

		debug!(contract = %artifact.name, address = %address, "Contract deployed");
		Ok((Self::at(artifact, address, provider), receipt))
	}

	pub fn address(&self) -> Address {
		self.address
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn provider(&self) -> &Provider {
		&self.provider
	}

	fn function(&self, method: &str) -> Result<&Function> {
		self.abi
			.function(method)
			.and_then(|overloads| overloads.first())
			.ok_or_else(|| Error::UnknownFunction(format!("{}.{}", self.name, method)))
	}

	fn encode(&self, method: &str, args: &[DynSolValue]) -> Result<Bytes> {
		let function = self.function(method)?;
		function
			.abi_encode_input(args)
			.map(Bytes::from)
			.map_err(|e| Error::AbiEncode {
				method: format!("{}.{}", self.name, method),
				reason: e.to_string(),
			})
	}

	/// Query a function with `eth_call` and decode its outputs
	pub async fn call(&self, method: &str, args: &[DynSolValue]) -> Result<Vec<DynSolValue>> {
		let function = self.function(method)?;
		let input = self.encode(method, args)?;

		let tx = TransactionRequest::default()
			.to(self.address)
			.input(input.into());
		let output = self.provider.call(tx).await?;

		function
			.abi_decode_output(&output)
			.map_err(|e| Error::AbiDecode {
				method: format!("{}.{}", self.name, method),
				reason: e.to_string(),
			})
	}

	/// Prepare a state-changing call; submit it with [`SendCall::execute`]
	pub fn send(&self, method: &str, args: Vec<DynSolValue>) -> SendCall<'_> {
		SendCall {
			handle: self,
			method: method.to_string(),
			args,
			from: None,
			value: None,
			gas: None,
		}
	}
}

/// Pending state-changing call with optional sender, value and gas limit
#[must_use = "a SendCall does nothing until executed"]
pub struct SendCall<'a> {
	handle: &'a ContractHandle,
	method: String,
	args: Vec<DynSolValue>,
	from: Option<Address>,
	value: Option<U256>,
	gas: Option<u64>,
}

impl SendCall<'_> {
	/// Sender; defaults to the provider's first account
	pub fn from(mut self, from: Address) -> Self {
		self.from = Some(from);
		self
	}

	/// Wei attached to the call
	pub fn value(mut self, value: U256) -> Self {
		self.value = Some(value);
		self
	}

	/// Fixed gas limit instead of an estimate
	pub fn gas(mut self, gas: u64) -> Self {
		self.gas = Some(gas);
		self
	}

	/// Submit the transaction and wait for its receipt
	pub async fn execute(self) -> Result<TransactionReceipt> {
		let input = self.handle.encode(&self.method, &self.args)?;

		let mut tx = TransactionRequest::default()
			.to(self.handle.address)
			.input(input.into());
		tx.from = self.from;
		tx.value = self.value;
		tx.gas = self.gas;

		debug!(
			contract = %self.handle.name,
			method = %self.method,
			from = ?self.from,
			value = ?self.value,
			"Sending transaction"
		);
		self.handle.provider.send_and_wait(tx).await
	}
}

fn single(values: Vec<DynSolValue>, method: &str) -> Result<DynSolValue> {
	let mut values = values.into_iter();
	match (values.next(), values.next()) {
		(Some(value), None) => Ok(value),
		_ => Err(decode_error(method, "expected exactly one return value")),
	}
}

fn decode_error(method: &str, reason: &str) -> Error {
	Error::AbiDecode {
		method: method.to_string(),
		reason: reason.to_string(),
	}
}

fn as_address(value: &DynSolValue, method: &str) -> Result<Address> {
	value
		.as_address()
		.ok_or_else(|| decode_error(method, "expected address"))
}

fn as_uint(value: &DynSolValue, method: &str) -> Result<U256> {
	value
		.as_uint()
		.map(|(v, _)| v)
		.ok_or_else(|| decode_error(method, "expected uint"))
}

fn as_bool(value: &DynSolValue, method: &str) -> Result<bool> {
	value
		.as_bool()
		.ok_or_else(|| decode_error(method, "expected bool"))
}

fn as_string(value: &DynSolValue, method: &str) -> Result<String> {
	value
		.as_str()
		.map(str::to_string)
		.ok_or_else(|| decode_error(method, "expected string"))
}

fn expect_len<'a>(values: &'a [DynSolValue], len: usize, method: &str) -> Result<&'a [DynSolValue]> {
	if values.len() != len {
		return Err(decode_error(
			method,
			&format!("expected {} return values, got {}", len, values.len()),
		));
	}
	Ok(values)
}

/// Handle to the factory that creates and lists campaigns
#[derive(Debug, Clone)]
pub struct CampaignFactory {
	handle: ContractHandle,
}

impl CampaignFactory {
	/// Deploy a new factory from `from`
	pub async fn deploy(
		artifact: &Artifact,
		provider: Provider,
		from: Address,
	) -> Result<(Self, TransactionReceipt)> {
		let (handle, receipt) = ContractHandle::deploy(artifact, &[], provider, from).await?;
		Ok((Self { handle }, receipt))
	}

	pub fn at(artifact: &Artifact, address: Address, provider: Provider) -> Self {
		Self {
			handle: ContractHandle::at(artifact, address, provider),
		}
	}

	pub fn address(&self) -> Address {
		self.handle.address()
	}

	pub fn handle(&self) -> &ContractHandle {
		&self.handle
	}

	/// Create a campaign managed by `from` with the given minimum contribution
	pub async fn create_campaign(&self, minimum: U256, from: Address) -> Result<TransactionReceipt> {
		self.handle
			.send("createCampaign", vec![DynSolValue::Uint(minimum, 256)])
			.from(from)
			.execute()
			.await
	}

	/// Addresses of every campaign created so far, oldest first
	pub async fn deployed_campaigns(&self) -> Result<Vec<Address>> {
		const METHOD: &str = "getDeployedCampaigns";
		let value = single(self.handle.call(METHOD, &[]).await?, METHOD)?;
		value
			.as_array()
			.ok_or_else(|| decode_error(METHOD, "expected address[]"))?
			.iter()
			.map(|item| as_address(item, METHOD))
			.collect()
	}
}

/// Spending request as stored by a campaign
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
	pub description: String,
	pub value: U256,
	pub recipient: Address,
	pub complete: bool,
	pub approval_count: U256,
}

/// Snapshot returned by `getSummary()`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignSummary {
	pub minimum_contribution: U256,
	pub balance: U256,
	pub requests_count: U256,
	pub approvers_count: U256,
	pub manager: Address,
}

/// Handle to one crowdfunding campaign
#[derive(Debug, Clone)]
pub struct Campaign {
	handle: ContractHandle,
}

impl Campaign {
	pub fn at(artifact: &Artifact, address: Address, provider: Provider) -> Self {
		Self {
			handle: ContractHandle::at(artifact, address, provider),
		}
	}

	pub fn address(&self) -> Address {
		self.handle.address()
	}

	pub fn handle(&self) -> &ContractHandle {
		&self.handle
	}

	async fn call_single(&self, method: &str, args: &[DynSolValue]) -> Result<DynSolValue> {
		single(self.handle.call(method, args).await?, method)
	}

	pub async fn manager(&self) -> Result<Address> {
		as_address(&self.call_single("manager", &[]).await?, "manager")
	}

	pub async fn minimum_contribution(&self) -> Result<U256> {
		as_uint(
			&self.call_single("minimumContribution", &[]).await?,
			"minimumContribution",
		)
	}

	/// Whether `account` has contributed at least the minimum
	pub async fn approvers(&self, account: Address) -> Result<bool> {
		as_bool(
			&self
				.call_single("approvers", &[DynSolValue::Address(account)])
				.await?,
			"approvers",
		)
	}

	pub async fn approvers_count(&self) -> Result<U256> {
		as_uint(&self.call_single("approversCount", &[]).await?, "approversCount")
	}

	pub async fn requests_count(&self) -> Result<U256> {
		as_uint(
			&self.call_single("getRequestsCount", &[]).await?,
			"getRequestsCount",
		)
	}

	/// Contribute `value` wei from `from`
	pub async fn contribute(&self, from: Address, value: U256) -> Result<TransactionReceipt> {
		self.handle
			.send("contribute", Vec::new())
			.from(from)
			.value(value)
			.execute()
			.await
	}

	/// Open a spending request; only the manager may do this
	pub async fn create_request(
		&self,
		from: Address,
		description: &str,
		value: U256,
		recipient: Address,
	) -> Result<TransactionReceipt> {
		self.handle
			.send(
				"createRequest",
				vec![
					DynSolValue::String(description.to_string()),
					DynSolValue::Uint(value, 256),
					DynSolValue::Address(recipient),
				],
			)
			.from(from)
			.execute()
			.await
	}

	pub async fn approve_request(&self, from: Address, index: u64) -> Result<TransactionReceipt> {
		self.handle
			.send("approveRequest", vec![DynSolValue::Uint(U256::from(index), 256)])
			.from(from)
			.execute()
			.await
	}

	/// Pay out an approved request to its recipient
	pub async fn finalize_request(&self, from: Address, index: u64) -> Result<TransactionReceipt> {
		self.handle
			.send("finalizeRequest", vec![DynSolValue::Uint(U256::from(index), 256)])
			.from(from)
			.execute()
			.await
	}

	/// Request at `index`. Indices past the end read as an empty request
	pub async fn request(&self, index: u64) -> Result<Request> {
		const METHOD: &str = "requests";
		let values = self
			.handle
			.call(METHOD, &[DynSolValue::Uint(U256::from(index), 256)])
			.await?;
		let values = expect_len(&values, 5, METHOD)?;

		Ok(Request {
			description: as_string(&values[0], METHOD)?,
			value: as_uint(&values[1], METHOD)?,
			recipient: as_address(&values[2], METHOD)?,
			complete: as_bool(&values[3], METHOD)?,
			approval_count: as_uint(&values[4], METHOD)?,
		})
	}

	pub async fn summary(&self) -> Result<CampaignSummary> {
		const METHOD: &str = "getSummary";
		let values = self.handle.call(METHOD, &[]).await?;
		let values = expect_len(&values, 5, METHOD)?;

		Ok(CampaignSummary {
			minimum_contribution: as_uint(&values[0], METHOD)?,
			balance: as_uint(&values[1], METHOD)?,
			requests_count: as_uint(&values[2], METHOD)?,
			approvers_count: as_uint(&values[3], METHOD)?,
			manager: as_address(&values[4], METHOD)?,
		})
	}
}

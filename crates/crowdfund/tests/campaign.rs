//! End-to-end campaign lifecycle against a blank local chain
//!
//! Every test compiles `contracts/Campaign.sol` and starts its own Anvil
//! node. The contract-level tests deploy the factory from account 0 and
//! create a campaign with a minimum contribution of 100 wei; the last ones
//! go through the operations layer instead. Tests skip when `anvil` or
//! `solc` is missing.

use alloy_primitives::{utils::parse_ether, Address, U256};
use crowdfund::{
	constants::{dev_accounts, CAMPAIGN_CONTRACT, FACTORY_CONTRACT},
	core::{
		compiler::Solc,
		config::Config,
		contracts::{Campaign, CampaignFactory},
		devnet::{self, LocalChain},
	},
	operations::{CampaignOps, CompileOps, DeployOps, FactoryOps},
	types::{Artifact, ChainId, DeploymentRecord},
	Context,
};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

struct Fixture {
	chain: LocalChain,
	_build: TempDir,
	accounts: Vec<Address>,
	factory: CampaignFactory,
	campaign: Campaign,
}

fn source_path() -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../contracts/Campaign.sol")
}

/// Compiled build directory, or `None` when a required tool is missing
fn compile_contracts() -> Option<TempDir> {
	if !devnet::anvil_available() {
		eprintln!("skipping: anvil not found on PATH");
		return None;
	}
	let Ok(solc) = Solc::find("solc") else {
		eprintln!("skipping: solc not found on PATH");
		return None;
	};

	let build = TempDir::new().unwrap();
	let report = CompileOps::with_compiler(Box::new(solc), build.path().to_path_buf())
		.compile(&source_path())
		.unwrap();
	assert!(report.contracts.iter().any(|c| c == FACTORY_CONTRACT));
	Some(build)
}

async fn setup() -> Option<Fixture> {
	let build = compile_contracts()?;

	let chain = LocalChain::spawn().await.unwrap();
	let provider = chain.provider().await.unwrap();
	let accounts = provider.accounts().to_vec();

	let factory_artifact = Artifact::load(build.path(), FACTORY_CONTRACT).unwrap();
	let campaign_artifact = Artifact::load(build.path(), CAMPAIGN_CONTRACT).unwrap();

	let (factory, _) = CampaignFactory::deploy(&factory_artifact, provider.clone(), accounts[0])
		.await
		.unwrap();
	factory
		.create_campaign(U256::from(100), accounts[0])
		.await
		.unwrap();

	let address = factory.deployed_campaigns().await.unwrap()[0];
	let campaign = Campaign::at(&campaign_artifact, address, provider);

	Some(Fixture {
		chain,
		_build: build,
		accounts,
		factory,
		campaign,
	})
}

macro_rules! fixture {
	() => {
		match setup().await {
			Some(fixture) => fixture,
			None => return,
		}
	};
}

#[tokio::test]
async fn deploys_a_factory_and_a_campaign() {
	let f = fixture!();

	assert_ne!(f.factory.address(), Address::ZERO);
	assert_ne!(f.campaign.address(), Address::ZERO);
	assert_eq!(f.accounts.len(), 10);
	assert!(f.chain.url().starts_with("http://127.0.0.1:"));
}

#[tokio::test]
async fn marks_caller_as_the_campaign_manager() {
	let f = fixture!();

	assert_eq!(f.campaign.manager().await.unwrap(), f.accounts[0]);
	assert_eq!(
		f.campaign.minimum_contribution().await.unwrap(),
		U256::from(100)
	);
}

#[tokio::test]
async fn allows_people_to_contribute_and_marks_them_as_approvers() {
	let f = fixture!();

	f.campaign
		.contribute(f.accounts[1], U256::from(200))
		.await
		.unwrap();

	assert!(f.campaign.approvers(f.accounts[1]).await.unwrap());
	assert!(!f.campaign.approvers(f.accounts[2]).await.unwrap());
	assert_eq!(f.campaign.approvers_count().await.unwrap(), U256::from(1));
}

#[tokio::test]
async fn accepts_an_explicit_gas_limit() {
	let f = fixture!();

	let receipt = f
		.campaign
		.handle()
		.send("contribute", vec![])
		.from(f.accounts[2])
		.value(U256::from(100))
		.gas(1_000_000)
		.execute()
		.await
		.unwrap();

	assert!(receipt.gas_used < 1_000_000);
	assert!(f.campaign.approvers(f.accounts[2]).await.unwrap());
}

#[tokio::test]
async fn requires_a_minimum_contribution() {
	let f = fixture!();

	let err = f
		.campaign
		.contribute(f.accounts[1], U256::from(5))
		.await
		.unwrap_err();

	assert!(err.is_revert(), "unexpected error: {err}");
	assert!(!f.campaign.approvers(f.accounts[1]).await.unwrap());
}

#[tokio::test]
async fn allows_a_manager_to_make_a_payment_request() {
	let f = fixture!();

	f.campaign
		.create_request(f.accounts[0], "Buy batteries", U256::from(100), f.accounts[1])
		.await
		.unwrap();

	let request = f.campaign.request(0).await.unwrap();
	assert_eq!(request.description, "Buy batteries");
	assert_eq!(request.value, U256::from(100));
	assert_eq!(request.recipient, f.accounts[1]);
	assert!(!request.complete);
	assert_eq!(f.campaign.requests_count().await.unwrap(), U256::from(1));
}

#[tokio::test]
async fn processes_requests() {
	let f = fixture!();
	let recipient = f.accounts[1];

	f.campaign
		.contribute(f.accounts[0], parse_ether("10").unwrap())
		.await
		.unwrap();
	f.campaign
		.create_request(f.accounts[0], "Buy toilet paper", parse_ether("5").unwrap(), recipient)
		.await
		.unwrap();
	f.campaign.approve_request(f.accounts[0], 0).await.unwrap();
	f.campaign.finalize_request(f.accounts[0], 0).await.unwrap();

	let balance = f.campaign.handle().provider().balance(recipient).await.unwrap();
	assert!(
		balance > parse_ether("104").unwrap(),
		"recipient balance {balance} should exceed 104 ether"
	);
	assert!(f.campaign.request(0).await.unwrap().complete);

	let summary = f.campaign.summary().await.unwrap();
	assert_eq!(summary.balance, parse_ether("5").unwrap());
}

#[tokio::test]
async fn refuses_to_finalize_without_a_majority() {
	let f = fixture!();

	for contributor in &f.accounts[1..3] {
		f.campaign
			.contribute(*contributor, U256::from(100))
			.await
			.unwrap();
	}
	f.campaign
		.create_request(f.accounts[0], "Buy cables", U256::from(50), f.accounts[4])
		.await
		.unwrap();
	f.campaign.approve_request(f.accounts[1], 0).await.unwrap();

	let err = f
		.campaign
		.finalize_request(f.accounts[0], 0)
		.await
		.unwrap_err();
	assert!(err.is_revert(), "unexpected error: {err}");

	f.campaign.approve_request(f.accounts[2], 0).await.unwrap();
	f.campaign.finalize_request(f.accounts[0], 0).await.unwrap();

	let again = f
		.campaign
		.finalize_request(f.accounts[0], 0)
		.await
		.unwrap_err();
	assert!(again.is_revert(), "unexpected error: {again}");
}

#[tokio::test]
async fn approvals_are_limited_to_one_per_contributor() {
	let f = fixture!();

	f.campaign
		.contribute(f.accounts[1], U256::from(100))
		.await
		.unwrap();
	f.campaign
		.create_request(f.accounts[0], "Rent a venue", U256::from(10), f.accounts[5])
		.await
		.unwrap();
	f.campaign.approve_request(f.accounts[1], 0).await.unwrap();

	let twice = f.campaign.approve_request(f.accounts[1], 0).await.unwrap_err();
	assert!(twice.is_revert(), "unexpected error: {twice}");

	let outsider = f.campaign.approve_request(f.accounts[3], 0).await.unwrap_err();
	assert!(outsider.is_revert(), "unexpected error: {outsider}");

	assert_eq!(
		f.campaign.request(0).await.unwrap().approval_count,
		U256::from(1)
	);
}

#[tokio::test]
async fn restricts_requests_to_the_manager() {
	let f = fixture!();

	let err = f
		.campaign
		.create_request(f.accounts[1], "Not mine", U256::from(1), f.accounts[1])
		.await
		.unwrap_err();
	assert!(err.is_revert(), "unexpected error: {err}");
}

#[tokio::test]
async fn rejects_votes_on_requests_that_do_not_exist() {
	let f = fixture!();

	f.campaign
		.contribute(f.accounts[1], U256::from(100))
		.await
		.unwrap();

	let approve = f.campaign.approve_request(f.accounts[1], 5).await.unwrap_err();
	assert!(approve.is_revert(), "unexpected error: {approve}");

	let finalize = f
		.campaign
		.finalize_request(f.accounts[0], 5)
		.await
		.unwrap_err();
	assert!(finalize.is_revert(), "unexpected error: {finalize}");
	assert_eq!(f.campaign.requests_count().await.unwrap(), U256::ZERO);
}

/// Context for `chain` using the compiled `build` directory and fresh storage
fn operations_context(chain: &LocalChain, build: &TempDir, state: &TempDir) -> Arc<Context> {
	std::env::set_var("CROWDFUND_TEST_HARNESS_MNEMONIC", dev_accounts::MNEMONIC);
	let config: Config = format!(
		"data_dir = \"{}\"\n\
		 [compiler]\nbuild_dir = \"{}\"\n\
		 [network]\nrpc_url = \"{}\"\n\
		 [account]\nmnemonic = \"${{CROWDFUND_TEST_HARNESS_MNEMONIC}}\"\n",
		state.path().display(),
		build.path().display(),
		chain.url()
	)
	.parse()
	.unwrap();
	Arc::new(Context::new(config).unwrap())
}

#[tokio::test]
async fn deploy_stage_records_the_factory() {
	let Some(build) = compile_contracts() else {
		return;
	};
	let chain = LocalChain::spawn().await.unwrap();
	let state = TempDir::new().unwrap();
	let ctx = operations_context(&chain, &build, &state);

	let record = DeployOps::new(ctx.clone())
		.deploy(FACTORY_CONTRACT)
		.await
		.unwrap();

	assert_eq!(record.contract, FACTORY_CONTRACT);
	assert_eq!(record.chain, ChainId::Local);
	assert_eq!(record.deployer, dev_accounts::FIRST_ADDRESS);
	assert_ne!(record.address, Address::ZERO);
	assert!(record.gas_used > 0);

	let stored: DeploymentRecord = ctx
		.storage
		.load(&DeploymentRecord::storage_key(ChainId::Local))
		.unwrap();
	assert_eq!(stored, record);

	let factory = FactoryOps::new(ctx);
	assert_eq!(
		factory.resolve_address(ChainId::Local).unwrap(),
		record.address
	);
	assert!(factory.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn operations_drive_a_campaign_to_payout() {
	let Some(build) = compile_contracts() else {
		return;
	};
	let chain = LocalChain::spawn().await.unwrap();
	let state = TempDir::new().unwrap();
	let ctx = operations_context(&chain, &build, &state);
	let accounts = ctx.accounts().unwrap().addresses();

	DeployOps::new(ctx.clone())
		.deploy(FACTORY_CONTRACT)
		.await
		.unwrap();

	let factory = FactoryOps::new(ctx.clone());
	let first = factory.create(U256::from(100), 1).await.unwrap();
	let second = factory.create(U256::from(250), 2).await.unwrap();

	assert_eq!(first.manager, accounts[1]);
	assert_eq!(second.manager, accounts[2]);
	assert_eq!(second.minimum, U256::from(250));
	assert_ne!(first.address, second.address);
	assert_eq!(
		factory.list().await.unwrap(),
		vec![first.address, second.address]
	);

	let campaigns = CampaignOps::new(ctx.clone());
	let campaign = first.address;
	let recipient = accounts[5];

	let contribution = campaigns
		.contribute(campaign, parse_ether("2").unwrap(), 3)
		.await
		.unwrap();
	assert_eq!(contribution.from, accounts[3]);

	let outsider = campaigns
		.create_request(campaign, "Not the manager", U256::from(1), recipient, 3)
		.await
		.unwrap_err();
	assert!(outsider.is_revert(), "unexpected error: {outsider}");

	let request = campaigns
		.create_request(campaign, "Buy toilet paper", parse_ether("1").unwrap(), recipient, 1)
		.await
		.unwrap();
	assert_eq!(request.from, accounts[1]);

	let approval = campaigns.approve(campaign, 0, 3).await.unwrap();
	assert_eq!(approval.from, accounts[3]);
	assert!(approval.gas_used > 0);

	let before = chain.provider().await.unwrap().balance(recipient).await.unwrap();
	let payout = campaigns.finalize(campaign, 0, 1).await.unwrap();
	assert_eq!(payout.from, accounts[1]);
	let after = chain.provider().await.unwrap().balance(recipient).await.unwrap();
	assert_eq!(after - before, parse_ether("1").unwrap());

	let details = campaigns.show(campaign).await.unwrap();
	assert_eq!(details.summary.manager, accounts[1]);
	assert_eq!(details.summary.approvers_count, U256::from(1));
	assert_eq!(details.summary.balance, parse_ether("1").unwrap());
	assert_eq!(details.requests.len(), 1);
	assert_eq!(details.requests[0].description, "Buy toilet paper");
	assert!(details.requests[0].complete);
}

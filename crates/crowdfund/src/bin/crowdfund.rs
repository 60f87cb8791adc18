//! Entry point of the `crowdfund` CLI
//!
//! Parses arguments, sets up logging and dispatches each subcommand to its
//! operation. Any error ends the process with a non-zero exit code.

use alloy_primitives::Address;
use anyhow::{Context as _, Result};
use clap::Parser;
use crowdfund::{
	cli::{
		commands::{
			CampaignCommand, CampaignSubcommand, CompileCommand, DeployCommand, FactoryCommand,
			FactorySubcommand, NodeCommand, NodeSubcommand,
		},
		output::Display,
		Cli, Commands,
	},
	operations::{CampaignOps, CompileOps, DeployOps, FactoryOps, NodeOps},
	types::Hex,
	utils::{format_ether, parse_amount},
	Context,
};
use std::sync::Arc;
use tracing::{debug, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	init_logging(cli.debug);

	let ctx = Arc::new(Context::load(cli.config.as_deref())?);
	debug!(config = ?ctx.config.path, "Configuration loaded");

	match cli.command {
		Commands::Compile(cmd) => handle_compile(&ctx, cmd),
		Commands::Deploy(cmd) => handle_deploy(ctx, cmd).await,
		Commands::Factory(cmd) => handle_factory(ctx, cmd).await,
		Commands::Campaign(cmd) => handle_campaign(ctx, cmd).await,
		Commands::Node(cmd) => handle_node(ctx, cmd).await,
	}
}

/// Initialize structured logging
///
/// `RUST_LOG` takes precedence; otherwise `--debug` switches between info
/// and debug output for this crate.
fn init_logging(debug: bool) {
	use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

	let default_filter = if debug {
		"crowdfund=debug,info"
	} else {
		"crowdfund=info,warn"
	};
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

	tracing_subscriber::registry()
		.with(
			fmt::layer()
				.with_target(debug)
				.with_thread_ids(false)
				.with_file(false)
				.with_line_number(false)
				.compact(),
		)
		.with(env_filter)
		.init();
}

fn parse_address(input: &str) -> Result<Address> {
	Hex::to_address(input).with_context(|| format!("invalid address '{input}'"))
}

#[instrument(skip_all)]
fn handle_compile(ctx: &Context, cmd: CompileCommand) -> Result<()> {
	let source = cmd
		.source
		.unwrap_or_else(|| ctx.config.compiler.source.clone());

	let ops = match cmd.build_dir {
		Some(build_dir) => {
			let solc = crowdfund::core::compiler::Solc::find(&ctx.config.compiler.solc)?;
			CompileOps::with_compiler(Box::new(solc), build_dir)
		},
		None => CompileOps::new(ctx)?,
	};

	let report = ops.compile(&source)?;

	Display::header("Compilation");
	Display::kv("Source", &report.source.display().to_string());
	Display::kv("Build directory", &report.build_dir.display().to_string());
	for contract in &report.contracts {
		Display::success(&format!("{contract}.json"));
	}
	Ok(())
}

#[instrument(skip_all)]
async fn handle_deploy(ctx: Arc<Context>, cmd: DeployCommand) -> Result<()> {
	let record = DeployOps::new(ctx.clone()).deploy(&cmd.contract).await?;

	Display::header("Deployment");
	Display::kv("Contract", &record.contract);
	Display::kv("Address", &record.address.to_string());
	Display::kv("Chain", &record.chain.to_string());
	Display::kv("Transaction", &record.tx_hash.to_string());
	Display::kv("Deployer", &record.deployer.to_string());
	Display::kv("Gas used", &record.gas_used.to_string());
	Display::kv("Recorded in", &ctx.storage.root().display().to_string());
	Display::success(&format!("Contract deployed to {}", record.address));
	Ok(())
}

#[instrument(skip_all)]
async fn handle_factory(ctx: Arc<Context>, cmd: FactoryCommand) -> Result<()> {
	let ops = FactoryOps::new(ctx);

	match cmd.command.unwrap_or(FactorySubcommand::List) {
		FactorySubcommand::List => {
			let campaigns = ops.list().await?;
			Display::header("Campaigns");
			if campaigns.is_empty() {
				Display::info("No campaigns created yet");
			}
			for (i, address) in campaigns.iter().enumerate() {
				println!("  {}. {}", i, address);
			}
		},
		FactorySubcommand::Create { minimum, account } => {
			let minimum = parse_amount(&minimum)?;
			let created = ops.create(minimum, account).await?;
			Display::success("Campaign created");
			Display::kv("Address", &created.address.to_string());
			Display::kv("Manager", &created.manager.to_string());
			Display::kv("Minimum contribution", &format!("{} wei", created.minimum));
		},
	}
	Ok(())
}

#[instrument(skip_all)]
async fn handle_campaign(ctx: Arc<Context>, cmd: CampaignCommand) -> Result<()> {
	let ops = CampaignOps::new(ctx);

	let outcome = match cmd.command {
		CampaignSubcommand::Show { address } => {
			let details = ops.show(parse_address(&address)?).await?;
			let summary = &details.summary;

			Display::header(&format!("Campaign {}", details.address));
			Display::kv("Manager", &summary.manager.to_string());
			Display::kv(
				"Minimum contribution",
				&format!("{} wei", summary.minimum_contribution),
			);
			Display::kv("Balance", &format!("{} ether", format_ether(summary.balance)));
			Display::kv("Approvers", &summary.approvers_count.to_string());
			Display::kv("Requests", &summary.requests_count.to_string());

			for (i, request) in details.requests.iter().enumerate() {
				Display::section(&format!("Request {i}"));
				Display::kv("Description", &request.description);
				Display::kv("Value", &format!("{} ether", format_ether(request.value)));
				Display::kv("Recipient", &request.recipient.to_string());
				Display::kv(
					"Approvals",
					&format!("{} of {}", request.approval_count, summary.approvers_count),
				);
				Display::kv("Complete", &request.complete.to_string());
			}
			return Ok(());
		},
		CampaignSubcommand::Contribute {
			address,
			value,
			account,
		} => {
			ops.contribute(parse_address(&address)?, parse_amount(&value)?, account)
				.await?
		},
		CampaignSubcommand::Request {
			address,
			description,
			value,
			recipient,
			account,
		} => {
			ops.create_request(
				parse_address(&address)?,
				&description,
				parse_amount(&value)?,
				parse_address(&recipient)?,
				account,
			)
			.await?
		},
		CampaignSubcommand::Approve {
			address,
			index,
			account,
		} => ops.approve(parse_address(&address)?, index, account).await?,
		CampaignSubcommand::Finalize {
			address,
			index,
			account,
		} => ops.finalize(parse_address(&address)?, index, account).await?,
	};

	Display::success("Transaction confirmed");
	Display::kv("Transaction", &outcome.tx_hash.to_string());
	Display::kv("From", &outcome.from.to_string());
	Display::kv("Gas used", &outcome.gas_used.to_string());
	Ok(())
}

#[instrument(skip_all)]
async fn handle_node(ctx: Arc<Context>, cmd: NodeCommand) -> Result<()> {
	let ops = NodeOps::new(ctx);

	match cmd.command {
		NodeSubcommand::Start => {
			let process = ops.start().await?;
			Display::success(&format!("Anvil running at {}", process.url()));
			Display::kv("PID", &process.pid.to_string());
			Display::kv("Chain ID", &process.chain_id.to_string());
			Display::next_steps(&["crowdfund compile", "crowdfund deploy", "crowdfund factory"]);
		},
		NodeSubcommand::Stop => match ops.stop()? {
			Some(process) => Display::success(&format!("Stopped Anvil (pid {})", process.pid)),
			None => Display::info("No local node running"),
		},
		NodeSubcommand::Status => {
			let status = ops.status()?;
			Display::header("Local node");
			Display::kv("URL", &status.url);
			match status.process {
				Some(process) => {
					Display::kv("Status", "running");
					Display::kv("PID", &process.pid.to_string());
				},
				None => Display::kv("Status", "stopped"),
			}
		},
	}
	Ok(())
}

//! Command-line interface definitions
//!
//! One binary exposes every stage as a subcommand. Each subcommand works
//! without flags, taking its settings from the configuration file and
//! environment.

pub mod commands;
pub mod output;

use crate::constants::env_vars;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Crowdfunding contract toolchain
#[derive(Parser, Debug)]
#[command(name = "crowdfund")]
#[command(about = "Compile, deploy and operate crowdfunding campaign contracts")]
#[command(version)]
pub struct Cli {
	#[command(subcommand)]
	pub command: Commands,

	/// Enable debug logging
	#[arg(global = true, long, env = env_vars::DEBUG)]
	pub debug: bool,

	/// Config file path (defaults to ./crowdfund.toml, then built-in settings)
	#[arg(global = true, long, env = env_vars::CONFIG)]
	pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Compile the contract source into build artifacts
	Compile(commands::CompileCommand),

	/// Deploy the campaign factory
	Deploy(commands::DeployCommand),

	/// Query or use the deployed factory
	Factory(commands::FactoryCommand),

	/// Interact with a campaign
	Campaign(commands::CampaignCommand),

	/// Manage a detached local Anvil node
	Node(commands::NodeCommand),
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;

	#[test]
	fn test_cli_definition_is_valid() {
		Cli::command().debug_assert();
	}

	#[test]
	fn test_factory_defaults_to_list() {
		let cli = Cli::try_parse_from(["crowdfund", "factory"]).unwrap();
		match cli.command {
			Commands::Factory(cmd) => assert!(cmd.command.is_none()),
			other => panic!("unexpected command {other:?}"),
		}
	}

	#[test]
	fn test_contribute_arguments() {
		let cli = Cli::try_parse_from([
			"crowdfund",
			"campaign",
			"contribute",
			"0x5FbDB2315678afecb367f032d93F642f64180aa3",
			"10 ether",
			"--account",
			"1",
		])
		.unwrap();

		match cli.command {
			Commands::Campaign(cmd) => match cmd.command {
				commands::CampaignSubcommand::Contribute {
					value, account, ..
				} => {
					assert_eq!(value, "10 ether");
					assert_eq!(account, 1);
				},
				other => panic!("unexpected subcommand {other:?}"),
			},
			other => panic!("unexpected command {other:?}"),
		}
	}
}

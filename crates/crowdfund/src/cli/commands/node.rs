use clap::{Args, Subcommand};

/// Local node lifecycle
#[derive(Args, Debug)]
pub struct NodeCommand {
	#[command(subcommand)]
	pub command: NodeSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum NodeSubcommand {
	/// Start Anvil in the background on the configured port
	Start,

	/// Stop the node started by `node start`
	Stop,

	/// Show whether the node is running
	Status,
}

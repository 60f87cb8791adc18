//! Factory command definitions

use clap::{Args, Subcommand};

/// Factory commands; lists campaigns when no subcommand is given
#[derive(Args, Debug)]
pub struct FactoryCommand {
	#[command(subcommand)]
	pub command: Option<FactorySubcommand>,
}

#[derive(Subcommand, Debug)]
pub enum FactorySubcommand {
	/// List every campaign created by the factory
	List,

	/// Create a new campaign
	Create {
		/// Minimum contribution, e.g. `100` (wei) or `0.1 ether`
		minimum: String,

		/// Index of the managing account
		#[arg(short, long, default_value_t = 0)]
		account: usize,
	},
}

//! Campaign command definitions
//!
//! Amounts accept a unit suffix (`wei`, `gwei`, `ether`); a bare number is
//! wei. Accounts are indices into the accounts derived from the configured
//! recovery phrase.

use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct CampaignCommand {
	#[command(subcommand)]
	pub command: CampaignSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CampaignSubcommand {
	/// Show the campaign summary and its requests
	Show {
		/// Campaign address
		address: String,
	},

	/// Contribute to a campaign and become an approver
	Contribute {
		address: String,

		/// Amount to contribute
		value: String,

		#[arg(short, long, default_value_t = 0)]
		account: usize,
	},

	/// Open a spending request (manager only)
	Request {
		address: String,

		/// What the money is for
		description: String,

		/// Amount to pay out
		value: String,

		/// Address receiving the payout
		recipient: String,

		#[arg(short, long, default_value_t = 0)]
		account: usize,
	},

	/// Approve a request as a contributor
	Approve {
		address: String,

		/// Request index
		index: u64,

		#[arg(short, long, default_value_t = 0)]
		account: usize,
	},

	/// Pay out a request approved by a majority (manager only)
	Finalize {
		address: String,

		/// Request index
		index: u64,

		#[arg(short, long, default_value_t = 0)]
		account: usize,
	},
}

use clap::Args;

/// Deploy a compiled contract from the first configured account
#[derive(Args, Debug)]
pub struct DeployCommand {
	/// Contract to deploy
	#[arg(short = 'n', long, default_value = crate::constants::FACTORY_CONTRACT)]
	pub contract: String,
}

use clap::Args;
use std::path::PathBuf;

/// Compile the contract source
#[derive(Args, Debug)]
pub struct CompileCommand {
	/// Solidity source file (defaults to `compiler.source`)
	pub source: Option<PathBuf>,

	/// Output directory for artifacts (defaults to `compiler.build_dir`)
	#[arg(short, long)]
	pub build_dir: Option<PathBuf>,
}

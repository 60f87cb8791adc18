//! Compile stage
//!
//! Turns the Solidity source into one JSON artifact per contract. The build
//! directory is wiped first, so after a run it holds exactly the artifacts
//! of that run, or nothing when compilation failed.

use crate::{
	core::compiler::{Compiler, CompilerInput, Solc},
	types::{
		artifact::Artifact,
		error::{Error, Result},
	},
	Context,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Summary of a successful compile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileReport {
	pub source: PathBuf,
	pub build_dir: PathBuf,
	/// Contract names, one artifact each
	pub contracts: Vec<String>,
}

/// Compile operations
pub struct CompileOps {
	compiler: Box<dyn Compiler>,
	build_dir: PathBuf,
}

impl CompileOps {
	/// Compile with the configured `solc` into the configured build directory
	pub fn new(ctx: &Context) -> Result<Self> {
		let solc = Solc::find(&ctx.config.compiler.solc)?;
		debug!(solc = %solc.binary().display(), "Using compiler");
		Ok(Self::with_compiler(
			Box::new(solc),
			ctx.config.compiler.build_dir.clone(),
		))
	}

	pub fn with_compiler(compiler: Box<dyn Compiler>, build_dir: PathBuf) -> Self {
		Self {
			compiler,
			build_dir,
		}
	}

	pub fn build_dir(&self) -> &Path {
		&self.build_dir
	}

	/// Compile `source` and write its artifacts
	///
	/// # Errors
	/// Returns `SourceNotFound` for a missing source and `Compilation` with
	/// the compiler's messages when it reports errors
	#[instrument(skip(self), fields(build_dir = %self.build_dir.display()))]
	pub fn compile(&self, source: &Path) -> Result<CompileReport> {
		if !source.is_file() {
			return Err(Error::SourceNotFound(source.to_path_buf()));
		}
		let content = std::fs::read_to_string(source)?;
		let file_name = source
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.ok_or_else(|| Error::SourceNotFound(source.to_path_buf()))?;

		self.clear_build_dir()?;

		info!(source = %source.display(), "Compiling");
		let output = self
			.compiler
			.compile(&CompilerInput::for_source(&file_name, content))?;

		for warning in output.warnings() {
			warn!(message = %warning.message, "Compiler warning");
		}
		if output.has_errors() {
			return Err(Error::Compilation(output.error_messages()));
		}

		std::fs::create_dir_all(&self.build_dir)?;

		let mut contracts = Vec::new();
		if let Some(compiled) = output.contracts.get(&file_name) {
			for (name, contract) in compiled {
				let path = Artifact::path_in(&self.build_dir, name);
				std::fs::write(&path, serde_json::to_string_pretty(contract)?)?;
				info!(contract = %name, path = %path.display(), "Wrote artifact");
				contracts.push(name.clone());
			}
		}

		Ok(CompileReport {
			source: source.to_path_buf(),
			build_dir: self.build_dir.clone(),
			contracts,
		})
	}

	fn clear_build_dir(&self) -> Result<()> {
		match std::fs::remove_dir_all(&self.build_dir) {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(e.into()),
		}
	}
}

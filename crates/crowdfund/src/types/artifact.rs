//! Compiled contract artifacts
//!
//! An artifact is the compiler's per-contract JSON object as written to the
//! build directory. Only the interface description and creation bytecode are
//! read back; everything else the compiler emitted stays on disk untouched.
//! Both the solc standard-JSON layout (`evm.bytecode.object`) and the Foundry
//! layout (top-level `bytecode.object`) are accepted.

use crate::types::{
	error::{Error, Result},
	hex::Hex,
};
use alloy_json_abi::{Function, JsonAbi};
use alloy_primitives::Bytes;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Interface description and bytecode of one compiled contract
#[derive(Debug, Clone, Deserialize)]
pub struct Artifact {
	#[serde(skip)]
	pub name: String,
	pub abi: JsonAbi,
	#[serde(default)]
	evm: Option<EvmOutput>,
	#[serde(default)]
	bytecode: Option<BytecodeObject>,
}

#[derive(Debug, Clone, Deserialize)]
struct EvmOutput {
	bytecode: Option<BytecodeObject>,
}

#[derive(Debug, Clone, Deserialize)]
struct BytecodeObject {
	#[serde(default)]
	object: String,
}

impl Artifact {
	/// Path of the artifact for `name` inside a build directory
	pub fn path_in(dir: &Path, name: &str) -> PathBuf {
		dir.join(format!("{name}.json"))
	}

	/// Parse an artifact from its JSON text
	pub fn from_json(name: &str, json: &str) -> Result<Self> {
		let mut artifact: Artifact = serde_json::from_str(json)
			.map_err(|e| Error::InvalidArtifact(format!("{name}: {e}")))?;
		artifact.name = name.to_string();
		Ok(artifact)
	}

	/// Load the artifact for `name` from a build directory
	///
	/// # Errors
	/// Returns `ArtifactNotFound` if the build directory has no file for the
	/// contract, which usually means the compile stage has not been run
	pub fn load(dir: &Path, name: &str) -> Result<Self> {
		let path = Self::path_in(dir, name);
		if !path.exists() {
			return Err(Error::ArtifactNotFound {
				name: name.to_string(),
				dir: dir.to_path_buf(),
			});
		}

		let content = std::fs::read_to_string(&path)?;
		Self::from_json(name, &content)
	}

	fn bytecode_hex(&self) -> &str {
		self.evm
			.as_ref()
			.and_then(|evm| evm.bytecode.as_ref())
			.or(self.bytecode.as_ref())
			.map(|b| b.object.as_str())
			.unwrap_or_default()
	}

	/// Whether the artifact carries creation bytecode (interfaces and
	/// abstract contracts do not)
	pub fn is_deployable(&self) -> bool {
		let hex = self.bytecode_hex();
		!hex.is_empty() && hex != "0x"
	}

	/// Creation bytecode ready to be sent in a deployment transaction
	pub fn bytecode(&self) -> Result<Bytes> {
		if !self.is_deployable() {
			return Err(Error::InvalidArtifact(format!(
				"{} has no deployable bytecode",
				self.name
			)));
		}
		Hex::decode(self.bytecode_hex())
	}

	/// Look up a function by name. Overloads resolve to the first declaration
	pub fn function(&self, method: &str) -> Result<&Function> {
		self.abi
			.function(method)
			.and_then(|overloads| overloads.first())
			.ok_or_else(|| Error::UnknownFunction(method.to_string()))
	}
}

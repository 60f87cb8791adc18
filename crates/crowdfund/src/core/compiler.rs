//! Solidity compiler driver
//!
//! Talks to `solc` in standard-JSON mode: the input document goes in on
//! stdin and the output document comes back on stdout. Diagnostics are part
//! of the output document, so a rejected source still yields a parsed
//! [`CompilerOutput`].

use crate::types::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

/// Standard-JSON compiler input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompilerInput {
	pub language: String,
	pub sources: BTreeMap<String, SourceContent>,
	pub settings: CompilerSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceContent {
	pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerSettings {
	/// file -> contract -> requested outputs
	pub output_selection: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl CompilerInput {
	/// Input compiling a single source and requesting every output
	pub fn for_source(file_name: &str, content: impl Into<String>) -> Self {
		let sources = BTreeMap::from([(
			file_name.to_string(),
			SourceContent {
				content: content.into(),
			},
		)]);

		let everything = BTreeMap::from([("*".to_string(), vec!["*".to_string()])]);
		let output_selection = BTreeMap::from([("*".to_string(), everything)]);

		Self {
			language: "Solidity".to_string(),
			sources,
			settings: CompilerSettings { output_selection },
		}
	}
}

/// One error or warning reported by the compiler
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerDiagnostic {
	pub severity: String,
	pub message: String,
	#[serde(default)]
	pub formatted_message: Option<String>,
	#[serde(default, rename = "type")]
	pub kind: Option<String>,
}

impl CompilerDiagnostic {
	pub fn is_error(&self) -> bool {
		self.severity.eq_ignore_ascii_case("error")
	}

	/// Human readable form, preferring the compiler's formatted message
	pub fn render(&self) -> String {
		match &self.formatted_message {
			Some(formatted) => formatted.trim_end().to_string(),
			None => match &self.kind {
				Some(kind) => format!("{kind}: {}", self.message),
				None => self.message.clone(),
			},
		}
	}
}

/// Standard-JSON compiler output
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompilerOutput {
	#[serde(default)]
	pub errors: Vec<CompilerDiagnostic>,
	/// source file -> contract name -> contract object
	#[serde(default)]
	pub contracts: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

impl CompilerOutput {
	pub fn has_errors(&self) -> bool {
		self.errors.iter().any(CompilerDiagnostic::is_error)
	}

	/// Rendered error diagnostics joined by newlines
	pub fn error_messages(&self) -> String {
		self.errors
			.iter()
			.filter(|d| d.is_error())
			.map(CompilerDiagnostic::render)
			.collect::<Vec<_>>()
			.join("\n")
	}

	pub fn warnings(&self) -> impl Iterator<Item = &CompilerDiagnostic> {
		self.errors.iter().filter(|d| !d.is_error())
	}
}

/// Anything that turns a standard-JSON input into a standard-JSON output
#[cfg_attr(test, mockall::automock)]
pub trait Compiler: Send + Sync {
	fn compile(&self, input: &CompilerInput) -> Result<CompilerOutput>;
}

/// `solc` found on `PATH` or at an explicit location
#[derive(Debug, Clone)]
pub struct Solc {
	binary: PathBuf,
}

impl Solc {
	/// Resolve `program`, a bare name looked up on `PATH` or a path
	///
	/// # Errors
	/// Returns `CompilerNotFound` when no such executable exists
	pub fn find(program: &str) -> Result<Self> {
		let binary =
			which::which(program).map_err(|_| Error::CompilerNotFound(program.to_string()))?;
		Ok(Self { binary })
	}

	pub fn binary(&self) -> &std::path::Path {
		&self.binary
	}
}

impl Compiler for Solc {
	fn compile(&self, input: &CompilerInput) -> Result<CompilerOutput> {
		let payload = serde_json::to_vec(input)?;
		debug!(binary = %self.binary.display(), bytes = payload.len(), "Running solc --standard-json");

		let mut child = Command::new(&self.binary)
			.arg("--standard-json")
			.stdin(Stdio::piped())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.spawn()
			.map_err(|e| {
				Error::CompilerNotFound(format!("{}: {}", self.binary.display(), e))
			})?;

		if let Some(mut stdin) = child.stdin.take() {
			stdin.write_all(&payload)?;
		}

		let output = child.wait_with_output()?;
		if !output.status.success() && output.stdout.is_empty() {
			return Err(Error::Compilation(
				String::from_utf8_lossy(&output.stderr).trim().to_string(),
			));
		}

		serde_json::from_slice(&output.stdout)
			.map_err(|e| Error::Compilation(format!("unreadable compiler output: {e}")))
	}
}

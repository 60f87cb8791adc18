//! Configuration loading with environment variable expansion
//!
//! Settings come from a TOML file (default `crowdfund.toml` in the working
//! directory). When no file exists the built-in template is used, so every
//! subcommand works without flags. String values may reference environment
//! variables as `${VAR}` or `${VAR:-default}`; `.env` files are loaded first.
//!
//! Credentials are never read from the file verbatim. The recovery phrase
//! arrives through `CROWDFUND_MNEMONIC`, either directly or by a
//! `${VAR}` reference in `account.mnemonic`; a literal phrase is rejected.

use crate::{
	constants::{self, env_vars},
	types::{
		error::{Error, Result},
		secret::SecretString,
	},
};
use alloy_primitives::Address;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "crowdfund.toml";

/// Template used when no config file exists
const DEFAULT_TEMPLATE: &str = r#"
[compiler]
solc = "${CROWDFUND_SOLC:-solc}"
source = "contracts/Campaign.sol"
build_dir = "build"

[network]
rpc_url = "${CROWDFUND_RPC_URL:-http://127.0.0.1:8545}"

[account]
mnemonic = "${CROWDFUND_MNEMONIC:-}"
count = 10
"#;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	#[serde(skip)]
	pub path: Option<PathBuf>,
	#[serde(default)]
	pub compiler: CompilerConfig,
	#[serde(default)]
	pub network: NetworkConfig,
	#[serde(default)]
	pub account: AccountConfig,
	#[serde(default)]
	pub node: NodeConfig,
	/// Directory for node state and deployment records
	#[serde(default = "default_data_dir")]
	pub data_dir: PathBuf,
}

/// External compiler settings
#[derive(Debug, Clone, Deserialize)]
pub struct CompilerConfig {
	#[serde(default = "default_solc")]
	pub solc: String,
	#[serde(default = "default_source")]
	pub source: PathBuf,
	#[serde(default = "default_build_dir")]
	pub build_dir: PathBuf,
}

/// RPC endpoint and known contract addresses
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
	#[serde(default = "default_rpc_url")]
	pub rpc_url: String,
	/// Address of an already deployed factory
	#[serde(default, deserialize_with = "deserialize_optional_address")]
	pub factory_address: Option<Address>,
}

/// Signing account settings
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
	#[serde(default)]
	pub mnemonic: Option<SecretString>,
	/// Number of accounts derived from the mnemonic
	#[serde(default = "default_account_count")]
	pub count: u32,
}

/// Local Anvil node settings for `node start`
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
	#[serde(default = "default_node_port")]
	pub port: u16,
	#[serde(default = "default_account_count")]
	pub accounts: u32,
	/// Starting balance of each account in ether
	#[serde(default = "default_node_balance")]
	pub balance: u64,
	#[serde(default = "default_node_chain_id")]
	pub chain_id: u64,
}

fn default_data_dir() -> PathBuf {
	PathBuf::from(".crowdfund")
}

fn default_solc() -> String {
	"solc".to_string()
}

fn default_source() -> PathBuf {
	PathBuf::from("contracts/Campaign.sol")
}

fn default_build_dir() -> PathBuf {
	PathBuf::from("build")
}

fn default_rpc_url() -> String {
	"http://127.0.0.1:8545".to_string()
}

fn default_account_count() -> u32 {
	10
}

fn default_node_port() -> u16 {
	8545
}

fn default_node_balance() -> u64 {
	constants::DEFAULT_NODE_BALANCE_ETHER
}

fn default_node_chain_id() -> u64 {
	crate::types::chain::LOCAL_CHAIN_ID
}

impl Default for CompilerConfig {
	fn default() -> Self {
		Self {
			solc: default_solc(),
			source: default_source(),
			build_dir: default_build_dir(),
		}
	}
}

impl Default for NetworkConfig {
	fn default() -> Self {
		Self {
			rpc_url: default_rpc_url(),
			factory_address: None,
		}
	}
}

impl Default for AccountConfig {
	fn default() -> Self {
		Self {
			mnemonic: None,
			count: default_account_count(),
		}
	}
}

impl Default for NodeConfig {
	fn default() -> Self {
		Self {
			port: default_node_port(),
			accounts: default_account_count(),
			balance: default_node_balance(),
			chain_id: default_node_chain_id(),
		}
	}
}

fn deserialize_optional_address<'de, D>(deserializer: D) -> std::result::Result<Option<Address>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let raw: Option<String> = Option::deserialize(deserializer)?;
	match raw.as_deref().map(str::trim) {
		None | Some("") => Ok(None),
		Some(s) => Address::from_str(s)
			.map(Some)
			.map_err(|e| serde::de::Error::custom(format!("invalid address {s}: {e}"))),
	}
}

/// Replaces `${VAR}` with the value of `VAR`, or `${VAR:-default}` with the
/// default when `VAR` is unset
pub(crate) fn resolve_env_vars(input: &str) -> Result<String> {
	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| Error::InvalidConfig(format!("Regex error: {e}")))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(Error::MissingField(format!(
						"environment variable '{}'",
						var_name.as_str()
					)))
				},
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

/// Rejects an `account.mnemonic` that is anything but an environment
/// reference such as `${CROWDFUND_MNEMONIC}` or `${CROWDFUND_MNEMONIC:-}`
///
/// Runs on the raw document, so every `${VAR}` must sit inside a string.
fn reject_literal_mnemonic(raw: &str) -> Result<()> {
	let table: toml::Table = toml::from_str(raw)
		.map_err(|e| Error::InvalidConfig(e.message().to_string()))?;

	let Some(mnemonic) = table.get("account").and_then(|account| account.get("mnemonic")) else {
		return Ok(());
	};
	let Some(value) = mnemonic.as_str() else {
		return Err(Error::InvalidConfig(
			"account.mnemonic must be a string".into(),
		));
	};

	let value = value.trim();
	let reference = Regex::new(r"^\$\{[A-Z_][A-Z0-9_]{0,127}(?::-)?\}$")
		.map_err(|e| Error::InvalidConfig(format!("Regex error: {e}")))?;
	if value.is_empty() || reference.is_match(value) {
		Ok(())
	} else {
		Err(Error::InvalidConfig(format!(
			"account.mnemonic must reference an environment variable, e.g. \"${{{}}}\"",
			env_vars::MNEMONIC
		)))
	}
}

impl Config {
	/// Load configuration from an explicit path, the default file, or the
	/// built-in template, in that order
	///
	/// # Errors
	/// Returns `ConfigNotFound` when an explicit path does not exist, and
	/// `InvalidConfig`/`MissingField` when parsing or validation fails
	pub fn load(path: Option<&Path>) -> Result<Self> {
		let _ = dotenvy::dotenv();

		match path {
			Some(path) => Self::from_file(path),
			None => {
				let default_path = Path::new(DEFAULT_CONFIG_FILE);
				if default_path.exists() {
					Self::from_file(default_path)
				} else {
					DEFAULT_TEMPLATE.parse()
				}
			},
		}
	}

	/// Read and parse a specific config file
	pub fn from_file(path: &Path) -> Result<Self> {
		if !path.exists() {
			return Err(Error::ConfigNotFound(path.to_path_buf()));
		}

		let content = std::fs::read_to_string(path)?;
		let mut config: Config = content.parse()?;
		config.path = Some(path.to_path_buf());
		Ok(config)
	}

	fn validate(&self) -> Result<()> {
		if self.compiler.source.as_os_str().is_empty() {
			return Err(Error::InvalidConfig(
				"compiler.source cannot be empty".into(),
			));
		}
		if self.compiler.solc.trim().is_empty() {
			return Err(Error::InvalidConfig("compiler.solc cannot be empty".into()));
		}
		if self.account.count == 0 {
			return Err(Error::InvalidConfig(
				"account.count must be at least 1".into(),
			));
		}
		self.rpc_url()?;
		Ok(())
	}

	/// Parsed RPC endpoint
	pub fn rpc_url(&self) -> Result<url::Url> {
		url::Url::parse(&self.network.rpc_url)
			.map_err(|e| Error::InvalidRpcUrl(format!("{}: {}", self.network.rpc_url, e)))
	}

	/// Recovery phrase for the signing accounts
	///
	/// Uses the config value when set, otherwise `CROWDFUND_MNEMONIC`.
	pub fn mnemonic(&self) -> Result<SecretString> {
		self.mnemonic_or(std::env::var(env_vars::MNEMONIC).ok())
	}

	fn mnemonic_or(&self, env_value: Option<String>) -> Result<SecretString> {
		self.account
			.mnemonic
			.clone()
			.filter(|m| !m.is_empty())
			.or_else(|| env_value.map(SecretString::from).filter(|m| !m.is_empty()))
			.ok_or_else(|| {
				Error::MissingField(format!("account.mnemonic (or {})", env_vars::MNEMONIC))
			})
	}

	/// URL of the local node managed by `node start`
	pub fn node_url(&self) -> String {
		format!("http://127.0.0.1:{}", self.node.port)
	}
}

impl FromStr for Config {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		reject_literal_mnemonic(s)?;
		let resolved = resolve_env_vars(s)?;
		let config: Config =
			toml::from_str(&resolved).map_err(|e| Error::InvalidConfig(e.message().to_string()))?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("CROWDFUND_TEST_HOST", "node.internal");
		std::env::set_var("CROWDFUND_TEST_PORT", "8546");

		let input = "url = \"http://${CROWDFUND_TEST_HOST}:${CROWDFUND_TEST_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "url = \"http://node.internal:8546\"");

		std::env::remove_var("CROWDFUND_TEST_HOST");
		std::env::remove_var("CROWDFUND_TEST_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${CROWDFUND_TEST_MISSING:-fallback}\"";
		assert_eq!(resolve_env_vars(input).unwrap(), "value = \"fallback\"");

		let input = "value = \"${CROWDFUND_TEST_MISSING:-}\"";
		assert_eq!(resolve_env_vars(input).unwrap(), "value = \"\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let result = resolve_env_vars("value = \"${CROWDFUND_TEST_UNSET}\"");
		assert!(result.unwrap_err().to_string().contains("CROWDFUND_TEST_UNSET"));
	}

	#[test]
	fn test_default_template_parses() {
		let config: Config = DEFAULT_TEMPLATE.parse().unwrap();

		assert_eq!(config.compiler.source, PathBuf::from("contracts/Campaign.sol"));
		assert_eq!(config.compiler.build_dir, PathBuf::from("build"));
		assert_eq!(config.account.count, 10);
		assert_eq!(config.node.chain_id, 31337);
		assert!(config.network.factory_address.is_none());
	}

	#[test]
	fn test_full_config() {
		std::env::set_var(
			"CROWDFUND_TEST_FULL_MNEMONIC",
			"test test test test test test test test test test test junk",
		);
		let config: Config = r#"
data_dir = "state"

[compiler]
solc = "/opt/solc-0.8.24"
source = "sol/Campaign.sol"
build_dir = "out"

[network]
rpc_url = "https://sepolia.example.org/v3/key"
factory_address = "0xa1DAa872C3992FFb9cEAe5543Dd6840487E9f3E9"

[account]
mnemonic = "${CROWDFUND_TEST_FULL_MNEMONIC}"
count = 3

[node]
port = 9545
balance = 1000
"#
		.parse()
		.unwrap();

		assert_eq!(config.compiler.solc, "/opt/solc-0.8.24");
		assert_eq!(config.data_dir, PathBuf::from("state"));
		assert_eq!(config.rpc_url().unwrap().host_str(), Some("sepolia.example.org"));
		assert!(config.network.factory_address.is_some());
		assert_eq!(config.account.count, 3);
		assert_eq!(config.node_url(), "http://127.0.0.1:9545");
		assert_eq!(config.node.balance, 1000);
		assert_eq!(
			config.mnemonic_or(None).unwrap().expose(),
			"test test test test test test test test test test test junk"
		);
		assert!(!format!("{:?}", config).contains("junk"));
	}

	#[test]
	fn test_literal_mnemonic_is_rejected() {
		let literal = "[account]\nmnemonic = \"duck wrong ring solar scrap coil vote glance fever early hand year\"\n"
			.parse::<Config>();
		assert!(matches!(literal, Err(Error::InvalidConfig(ref msg)) if msg.contains("CROWDFUND_MNEMONIC")));

		let with_default = "[account]\nmnemonic = \"${CROWDFUND_TEST_UNSET_PHRASE:-duck wrong ring}\"\n"
			.parse::<Config>();
		assert!(matches!(with_default, Err(Error::InvalidConfig(_))));

		let not_a_string = "[account]\nmnemonic = 12\n".parse::<Config>();
		assert!(matches!(not_a_string, Err(Error::InvalidConfig(_))));
	}

	#[test]
	fn test_mnemonic_reference_is_accepted() {
		let empty = "[account]\nmnemonic = \"\"\n".parse::<Config>().unwrap();
		assert!(empty.account.mnemonic.unwrap().is_empty());

		let optional = "[account]\nmnemonic = \"${CROWDFUND_TEST_UNSET_PHRASE:-}\"\n"
			.parse::<Config>()
			.unwrap();
		assert!(matches!(optional.mnemonic_or(None), Err(Error::MissingField(_))));

		std::env::set_var("CROWDFUND_TEST_REF_MNEMONIC", "from reference");
		let referenced = "[account]\nmnemonic = \"${CROWDFUND_TEST_REF_MNEMONIC}\"\n"
			.parse::<Config>()
			.unwrap();
		assert_eq!(
			referenced.mnemonic_or(None).unwrap().expose(),
			"from reference"
		);
		std::env::remove_var("CROWDFUND_TEST_REF_MNEMONIC");
	}

	#[test]
	fn test_validation_rejects_bad_values() {
		let zero_accounts = "[account]\ncount = 0\n".parse::<Config>();
		assert!(matches!(zero_accounts, Err(Error::InvalidConfig(_))));

		let bad_url = "[network]\nrpc_url = \"not a url\"\n".parse::<Config>();
		assert!(matches!(bad_url, Err(Error::InvalidRpcUrl(_))));

		let bad_address = "[network]\nfactory_address = \"0x1234\"\n".parse::<Config>();
		assert!(matches!(bad_address, Err(Error::InvalidConfig(_))));
	}

	#[test]
	fn test_mnemonic_sources() {
		let mut config: Config = "".parse().unwrap();
		assert!(matches!(
			config.mnemonic_or(None),
			Err(Error::MissingField(_))
		));
		assert!(matches!(
			config.mnemonic_or(Some(String::new())),
			Err(Error::MissingField(_))
		));
		assert_eq!(
			config.mnemonic_or(Some("from env".into())).unwrap().expose(),
			"from env"
		);

		config.account.mnemonic = Some(SecretString::from("from file"));
		assert_eq!(
			config.mnemonic_or(Some("from env".into())).unwrap().expose(),
			"from file"
		);
	}

	#[test]
	fn test_missing_file() {
		let err = Config::from_file(Path::new("/nonexistent/crowdfund.toml")).unwrap_err();
		assert!(matches!(err, Error::ConfigNotFound(_)));
	}
}

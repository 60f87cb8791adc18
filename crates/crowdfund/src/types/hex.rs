//! Hexadecimal parsing helpers for bytecode and addresses

use crate::types::error::{Error, Result};
use alloy_primitives::{Address, Bytes};
use std::str::FromStr;

/// Hex conversion functions used when reading artifacts and CLI input
pub struct Hex;

impl Hex {
	/// Decode a hex string with or without the 0x prefix
	pub fn decode(s: &str) -> Result<Bytes> {
		let s = s.trim();
		let s = s.strip_prefix("0x").unwrap_or(s);
		hex::decode(s)
			.map(Into::into)
			.map_err(|e| Error::InvalidHex(format!("{}: {}", truncate(s), e)))
	}

	/// Parse a 20-byte address, accepting any checksum casing
	pub fn to_address(s: &str) -> Result<Address> {
		Address::from_str(s.trim()).map_err(|e| Error::InvalidAddress(format!("{}: {}", s, e)))
	}
}

fn truncate(s: &str) -> &str {
	match s.char_indices().nth(16) {
		Some((idx, _)) => &s[..idx],
		None => s,
	}
}

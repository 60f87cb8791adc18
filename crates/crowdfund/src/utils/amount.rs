use crate::types::error::{Error, Result};
use alloy_primitives::{utils::parse_units, U256};

const UNITS: [&str; 3] = ["ether", "gwei", "wei"];

/// Parse an amount such as `200`, `1.5 gwei` or `10ether`
///
/// A bare number is taken as wei, matching the contract's own unit.
pub fn parse_amount(input: &str) -> Result<U256> {
	let trimmed = input.trim();
	if trimmed.is_empty() {
		return Err(Error::InvalidAmount("empty amount".into()));
	}

	let lower = trimmed.to_lowercase();
	let (number, unit) = UNITS
		.iter()
		.find_map(|unit| lower.strip_suffix(unit).map(|n| (n.trim(), *unit)))
		.unwrap_or((lower.as_str(), "wei"));

	if number.starts_with('-') {
		return Err(Error::InvalidAmount(format!("{input}: must not be negative")));
	}

	parse_units(number, unit)
		.map(|parsed| parsed.get_absolute())
		.map_err(|e| Error::InvalidAmount(format!("{input}: {e}")))
}

/// Format wei as ether with trailing zeros trimmed
pub fn format_ether(amount: U256) -> String {
	let formatted = alloy_primitives::utils::format_ether(amount);
	match formatted.split_once('.') {
		Some((whole, fraction)) => {
			let fraction = fraction.trim_end_matches('0');
			if fraction.is_empty() {
				format!("{whole}.0")
			} else {
				format!("{whole}.{fraction}")
			}
		},
		None => formatted,
	}
}

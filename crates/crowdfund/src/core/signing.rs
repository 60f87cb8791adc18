//! Accounts derived from a recovery phrase
//!
//! Signers are derived along `m/44'/60'/0'/0/{index}` once per process and
//! kept in memory only. The first account is the default sender.

use crate::types::{
	error::{Error, Result},
	secret::SecretString,
};
use alloy_network::EthereumWallet;
use alloy_primitives::Address;
use alloy_signer_local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use std::fmt;

/// Ordered set of signing accounts
#[derive(Clone)]
pub struct Accounts {
	signers: Vec<PrivateKeySigner>,
}

impl fmt::Debug for Accounts {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Accounts")
			.field("addresses", &self.addresses())
			.finish()
	}
}

impl Accounts {
	/// Derive `count` accounts from a BIP-39 English mnemonic
	///
	/// # Errors
	/// Returns `NoAccounts` for a zero count and `InvalidMnemonic` when the
	/// phrase is not a valid mnemonic. The error never echoes the phrase.
	pub fn from_mnemonic(phrase: &SecretString, count: u32) -> Result<Self> {
		if count == 0 {
			return Err(Error::NoAccounts);
		}

		let signers = (0..count)
			.map(|index| {
				MnemonicBuilder::<English>::default()
					.phrase(phrase.expose())
					.index(index)
					.and_then(|builder| builder.build())
					.map_err(|_| Error::InvalidMnemonic(format!("cannot derive account {index}")))
			})
			.collect::<Result<Vec<_>>>()?;

		Ok(Self { signers })
	}

	pub fn addresses(&self) -> Vec<Address> {
		self.signers.iter().map(|signer| signer.address()).collect()
	}

	/// Address of the account at `index`
	pub fn get(&self, index: usize) -> Result<Address> {
		self.signers
			.get(index)
			.map(|signer| signer.address())
			.ok_or(Error::NoAccounts)
	}

	/// Default sender
	pub fn first(&self) -> Result<Address> {
		self.get(0)
	}

	/// Wallet holding every account, with the first as default signer
	pub fn wallet(&self) -> Result<EthereumWallet> {
		let (first, rest) = self.signers.split_first().ok_or(Error::NoAccounts)?;

		let mut wallet = EthereumWallet::from(first.clone());
		for signer in rest {
			wallet.register_signer(signer.clone());
		}
		Ok(wallet)
	}
}

//! Core building blocks shared by the operations
//!
//! Configuration, storage, signing, the RPC provider, contract handles, the
//! compiler driver and local chains.

pub mod blockchain;
pub mod compiler;
pub mod config;
pub mod contracts;
pub mod devnet;
pub mod signing;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;

pub use blockchain::Provider;
pub use compiler::{Compiler, CompilerInput, CompilerOutput, Solc};
pub use config::Config;
pub use contracts::{Campaign, CampaignFactory, CampaignSummary, ContractHandle, Request, SendCall};
pub use devnet::{AnvilOptions, LocalChain};
pub use signing::Accounts;
pub use storage::Storage;

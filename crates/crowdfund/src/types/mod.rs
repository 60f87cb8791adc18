//! Type definitions shared across the crowdfund stages
//!
//! Chain identifiers, compiled artifacts, deployment records, secrets and
//! the crate-wide error type.

pub mod artifact;
pub mod chain;
pub mod deployment;
pub mod error;
pub mod hex;
pub mod secret;

pub use artifact::Artifact;
pub use chain::ChainId;
pub use deployment::DeploymentRecord;
pub use error::{Error, Result};
pub use hex::Hex;
pub use secret::SecretString;

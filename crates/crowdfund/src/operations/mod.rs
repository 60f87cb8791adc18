//! High-level operations behind the CLI commands
//!
//! Each submodule owns one stage: compiling the contracts, deploying the
//! factory, working with the factory and its campaigns, and managing a
//! detached local node.

pub mod campaign;
pub mod compile;
pub mod deploy;
pub mod factory;
pub mod node;

pub use campaign::CampaignOps;
pub use compile::{CompileOps, CompileReport};
pub use deploy::DeployOps;
pub use factory::FactoryOps;
pub use node::NodeOps;

//! Argument structures for each subcommand

mod campaign;
mod compile;
mod deploy;
mod factory;
mod node;

pub use campaign::{CampaignCommand, CampaignSubcommand};
pub use compile::CompileCommand;
pub use deploy::DeployCommand;
pub use factory::{FactoryCommand, FactorySubcommand};
pub use node::{NodeCommand, NodeSubcommand};

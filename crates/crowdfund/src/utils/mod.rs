//! Small helpers shared by the CLI and operations

pub mod amount;

pub use amount::{format_ether, parse_amount};

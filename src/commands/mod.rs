//! CLI command implementations.
//!
//! Available commands:
//! - **scan**: Build the class hierarchy of a codebase and report incompatible overrides
//! - **init**: Initialize a new sigmap configuration file

pub mod init;
pub mod scan;

pub use init::init_config;
pub use scan::{handle_scan, ScanCommandConfig, ScanOutcome};

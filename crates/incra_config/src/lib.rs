//! Parsing and validation of `incra.toml` workspace configuration files.
//!
//! The configuration names the build units of a monorepo build: which
//! sources each unit owns and where its analysis is written when a joint
//! analysis is split. It also carries the rebase rules applied when analyses
//! are written for relocation between machines.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{PlannedUnit, SplitPlan};
pub use types::*;

//! Shared foundational types used across the incra analysis toolchain.
//!
//! This crate provides content hashing for serialized analyses, source path
//! resolution against a build root, and the line-rewrite rules applied when
//! analyses are written back to disk.

#![warn(missing_docs)]

pub mod hash;
pub mod paths;
pub mod rebase;

pub use hash::{ContentHash, InvalidContentHash};
pub use paths::{AbsolutePaths, BuildRoot, PathResolver};
pub use rebase::{rebase_line, Rebase, RebaseParseError};

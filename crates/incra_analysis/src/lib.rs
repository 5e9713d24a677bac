//! In-memory model and transformation engine for incremental-compilation
//! dependency analyses.
//!
//! An [`Analysis`] records, for a set of compiled sources, the classes each
//! source produced, its internal and external dependencies, content stamps,
//! and per-class API digests. This crate merges several per-unit analyses into
//! one joint analysis and splits a joint analysis back into per-unit ones,
//! rewriting dependency edges between internal (source to source) and
//! external (source to class name) form as sources cross the boundary.

#![warn(missing_docs)]

pub mod analysis;
pub mod diff;
pub mod element;
pub mod elements;
pub mod error;
pub mod merge;
pub mod parser;
pub mod section;
pub mod split;
pub mod translate;

pub use analysis::{Analysis, FORMAT_VERSION_LINE};
pub use diff::{DiffInput, Differ, ElementDiff, KeyDiffer, SectionDiff};
pub use element::Element;
pub use elements::{
    Apis, CompileSetup, Compilations, DependencyKind, Relations, SourceInfos, Stamps,
};
pub use error::{AnalysisError, AnalysisResult};
pub use parser::parse_analysis;
pub use section::Section;
pub use split::representative;
pub use translate::{Anonymizer, TokenTranslator};

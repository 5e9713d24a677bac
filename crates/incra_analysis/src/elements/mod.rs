//! The six elements of an analysis, in on-disk order.

mod apis;
mod compilations;
mod compile_setup;
mod relations;
mod source_infos;
mod stamps;

pub use apis::Apis;
pub use compilations::Compilations;
pub use compile_setup::CompileSetup;
pub use relations::{DependencyKind, Relations};
pub use source_infos::SourceInfos;
pub use stamps::Stamps;

//! Resolution of build-unit source identifiers to absolute path strings.
//!
//! Analyses key every source by its absolute path. Callers that describe a
//! build unit with paths relative to a build root pass a [`PathResolver`]
//! into split so that the engine only ever compares absolute identities.

use std::path::{Path, PathBuf};

/// Resolves a logical source identifier to the absolute path string used as
/// an analysis key.
pub trait PathResolver {
    /// Returns the absolute identity for `source`.
    fn resolve(&self, source: &str) -> String;
}

/// Resolves relative sources against a fixed build root directory.
///
/// Already-absolute sources are returned unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRoot {
    root: PathBuf,
}

impl BuildRoot {
    /// Creates a resolver rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the build root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PathResolver for BuildRoot {
    fn resolve(&self, source: &str) -> String {
        let path = Path::new(source);
        if path.is_absolute() {
            source.to_string()
        } else {
            self.root.join(path).to_string_lossy().into_owned()
        }
    }
}

/// Identity resolver for callers whose sources are already absolute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbsolutePaths;

impl PathResolver for AbsolutePaths {
    fn resolve(&self, source: &str) -> String {
        source.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_source_joins_root() {
        let root = BuildRoot::new("/home/user/proj");
        assert_eq!(
            root.resolve("src/com/x/A.scala"),
            "/home/user/proj/src/com/x/A.scala"
        );
    }

    #[test]
    fn absolute_source_unchanged() {
        let root = BuildRoot::new("/home/user/proj");
        assert_eq!(root.resolve("/elsewhere/B.scala"), "/elsewhere/B.scala");
    }

    #[test]
    fn root_accessor() {
        let root = BuildRoot::new("/repo");
        assert_eq!(root.root(), Path::new("/repo"));
    }

    #[test]
    fn absolute_paths_is_identity() {
        assert_eq!(AbsolutePaths.resolve("rel/C.java"), "rel/C.java");
        assert_eq!(AbsolutePaths.resolve("/abs/C.java"), "/abs/C.java");
    }
}

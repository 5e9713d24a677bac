//! Resolution of configured units into the inputs of a split.

use crate::error::ConfigError;
use crate::types::{ProjectConfig, UnitConfig};
use incra_common::{BuildRoot, Rebase};
use std::path::{Path, PathBuf};

/// A split fully resolved against the configuration directory.
///
/// `units[i]` receives the i-th analysis returned by a split over
/// [`sources`](Self::sources); the catch-all analysis, if any, comes last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPlan {
    /// Per-unit source lists and output paths, in configuration order.
    pub units: Vec<PlannedUnit>,
    /// Whether sources owned by no unit are collected into one more analysis.
    pub catchall: bool,
    /// Output path of the catch-all analysis.
    pub catchall_output: Option<PathBuf>,
}

/// One unit of a [`SplitPlan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUnit {
    /// The unit name.
    pub name: String,
    /// Sources as written in the configuration.
    pub sources: Vec<String>,
    /// Output path, resolved against the configuration directory.
    pub output: PathBuf,
}

impl SplitPlan {
    /// Source lists in unit order, suitable for passing to a split.
    pub fn sources(&self) -> impl Iterator<Item = &[String]> {
        self.units.iter().map(|u| u.sources.as_slice())
    }

    /// Every output path, in the order split results are produced.
    ///
    /// Fails if the catch-all is enabled without an output path.
    pub fn outputs(&self) -> Result<Vec<&Path>, ConfigError> {
        let mut outputs: Vec<&Path> = self.units.iter().map(|u| u.output.as_path()).collect();
        if self.catchall {
            let catchall = self
                .catchall_output
                .as_deref()
                .ok_or_else(|| ConfigError::MissingField("split.catchall_output".to_string()))?;
            outputs.push(catchall);
        }
        Ok(outputs)
    }
}

impl ProjectConfig {
    /// Returns the resolver for unit sources.
    ///
    /// A relative `project.build_root` is taken relative to `config_dir`; when
    /// it is absent, `config_dir` itself is the root.
    pub fn build_root(&self, config_dir: &Path) -> BuildRoot {
        match &self.project.build_root {
            Some(root) => BuildRoot::new(config_dir.join(root)),
            None => BuildRoot::new(config_dir),
        }
    }

    /// Converts the configured rebase rules into ordered [`Rebase`] values.
    pub fn rebasings(&self) -> Vec<Rebase> {
        self.rebase
            .iter()
            .map(|rule| match (&rule.to, rule.drop) {
                (Some(to), false) => Rebase::replace(rule.from.as_str(), to.as_str()),
                _ => Rebase::drop_lines(rule.from.as_str()),
            })
            .collect()
    }

    /// Looks up a unit by name.
    pub fn unit(&self, name: &str) -> Result<&UnitConfig, ConfigError> {
        self.units
            .iter()
            .find(|u| u.name == name)
            .ok_or_else(|| ConfigError::UnknownUnit(name.to_string()))
    }

    /// Resolves every unit's output path against `config_dir`.
    pub fn split_plan(&self, config_dir: &Path) -> SplitPlan {
        SplitPlan {
            units: self
                .units
                .iter()
                .map(|unit| PlannedUnit {
                    name: unit.name.clone(),
                    sources: unit.sources.clone(),
                    output: config_dir.join(&unit.output),
                })
                .collect(),
            catchall: self.split.catchall,
            catchall_output: self
                .split
                .catchall_output
                .as_ref()
                .map(|out| config_dir.join(out)),
        }
    }
}

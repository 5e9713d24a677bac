//! Configuration types deserialized from `incra.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// The top-level configuration parsed from `incra.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Workspace metadata.
    pub project: ProjectMeta,
    /// Build units, in the order their analyses are split out.
    #[serde(default)]
    pub units: Vec<UnitConfig>,
    /// Split settings.
    #[serde(default)]
    pub split: SplitConfig,
    /// Ordered path rewriting rules applied when writing analyses.
    #[serde(default)]
    pub rebase: Vec<RebaseRule>,
}

/// Workspace metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMeta {
    /// The workspace name.
    pub name: String,
    /// Directory that relative unit sources are resolved against.
    ///
    /// Defaults to the directory holding `incra.toml`.
    #[serde(default)]
    pub build_root: Option<String>,
}

/// One build unit: a set of sources compiled together.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitConfig {
    /// Unique unit name.
    pub name: String,
    /// Where this unit's analysis is written after a split.
    #[serde(default)]
    pub output: String,
    /// Source files owned by the unit, absolute or relative to the build root.
    ///
    /// Accepts a single string or a list.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub sources: Vec<String>,
}

/// Split settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SplitConfig {
    /// Whether sources not owned by any unit are collected into one extra
    /// analysis instead of being dropped.
    #[serde(default)]
    pub catchall: bool,
    /// Output path of the catch-all analysis.
    #[serde(default)]
    pub catchall_output: Option<String>,
}

/// A single rebase rule as written in the configuration.
///
/// Exactly one of `to` and `drop = true` must be given.
#[derive(Debug, Clone, Deserialize)]
pub struct RebaseRule {
    /// Substring to look for.
    pub from: String,
    /// Replacement text.
    #[serde(default)]
    pub to: Option<String>,
    /// Drop whole lines containing `from` instead of rewriting them.
    #[serde(default)]
    pub drop: bool,
}

/// Deserializes a field that can be either a single string or a list of strings.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::collections::HashSet;
use std::path::Path;

/// Name of the configuration file looked up in a workspace directory.
pub const CONFIG_FILE_NAME: &str = "incra.toml";

/// Loads and validates an `incra.toml` configuration from a workspace directory.
///
/// Reads `<dir>/incra.toml`, parses it, and validates it.
pub fn load_config(dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::IoError {
            path: config_path.clone(),
            source,
        })?;
    load_config_from_str(&content)
}

/// Parses and validates an `incra.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and configuration values are consistent.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }

    let mut names = HashSet::new();
    for (i, unit) in config.units.iter().enumerate() {
        if unit.name.is_empty() {
            return Err(ConfigError::MissingField(format!("units[{i}].name")));
        }
        if unit.output.is_empty() {
            return Err(ConfigError::MissingField(format!("units.{}.output", unit.name)));
        }
        if !names.insert(unit.name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "unit '{}' is defined more than once",
                unit.name
            )));
        }
    }

    if config.split.catchall && config.split.catchall_output.is_none() {
        return Err(ConfigError::MissingField("split.catchall_output".to_string()));
    }

    for (i, rule) in config.rebase.iter().enumerate() {
        if rule.from.is_empty() {
            return Err(ConfigError::MissingField(format!("rebase[{i}].from")));
        }
        match (&rule.to, rule.drop) {
            (Some(_), true) => {
                return Err(ConfigError::ValidationError(format!(
                    "rebase rule for '{}' cannot both replace and drop",
                    rule.from
                )))
            }
            (None, false) => {
                return Err(ConfigError::ValidationError(format!(
                    "rebase rule for '{}' needs either `to` or `drop = true`",
                    rule.from
                )))
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let config = load_config_from_str("[project]\nname = \"mono\"\n").unwrap();
        assert_eq!(config.project.name, "mono");
        assert!(config.units.is_empty());
        assert!(config.rebase.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[project]
name = "mono"
build_root = "/home/user/proj"

[[units]]
name = "core"
output = "out/core.analysis"
sources = ["src/core/A.scala", "/abs/path/B.scala"]

[[units]]
name = "web"
output = "out/web.analysis"
sources = ["src/web/C.scala"]

[split]
catchall = true
catchall_output = "out/rest.analysis"

[[rebase]]
from = "/home/user/proj"
to = ""

[[rebase]]
from = "/tmp/scratch"
drop = true
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.build_root.as_deref(), Some("/home/user/proj"));
        assert_eq!(config.units.len(), 2);
        assert_eq!(config.units[1].name, "web");
        assert!(config.split.catchall);
        assert_eq!(config.rebase.len(), 2);
    }

    #[test]
    fn missing_name_errors() {
        let err = load_config_from_str("[project]\nname = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn missing_output_errors() {
        let toml = r#"
[project]
name = "mono"

[[units]]
name = "core"
sources = ["A.scala"]
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert_eq!(
            format!("{err}"),
            "missing required field: units.core.output"
        );
    }

    #[test]
    fn duplicate_unit_errors() {
        let toml = r#"
[project]
name = "mono"

[[units]]
name = "core"
output = "a.analysis"

[[units]]
name = "core"
output = "b.analysis"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn catchall_requires_output() {
        let toml = r#"
[project]
name = "mono"

[split]
catchall = true
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "split.catchall_output"));
    }

    #[test]
    fn rebase_needs_exactly_one_action() {
        let neither = "[project]\nname = \"m\"\n\n[[rebase]]\nfrom = \"/x\"\n";
        assert!(matches!(
            load_config_from_str(neither).unwrap_err(),
            ConfigError::ValidationError(_)
        ));
        let both = "[project]\nname = \"m\"\n\n[[rebase]]\nfrom = \"/x\"\nto = \"\"\ndrop = true\n";
        assert!(matches!(
            load_config_from_str(both).unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn empty_rebase_from_errors() {
        let toml = "[project]\nname = \"m\"\n\n[[rebase]]\nfrom = \"\"\nto = \"y\"\n";
        assert!(matches!(
            load_config_from_str(toml).unwrap_err(),
            ConfigError::MissingField(_)
        ));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[project]\nname = \"ondisk\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.project.name, "ondisk");
    }

    #[test]
    fn load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
    }
}

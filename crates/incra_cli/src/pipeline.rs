//! Shared helpers for CLI commands: configuration discovery and parallel
//! analysis loading.

use std::path::{Path, PathBuf};

use incra_analysis::{Analysis, AnalysisResult};
use incra_config::{ProjectConfig, CONFIG_FILE_NAME};
use incra_common::Rebase;
use rayon::prelude::*;

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing `incra.toml`.
pub fn find_config_dir(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE_NAME).is_file())
        .map(Path::to_path_buf)
}

/// Resolves the directory holding the configuration.
///
/// If `--config` is specified, uses that path (file → parent dir, dir → itself).
/// Otherwise walks up from the current directory; `None` if no configuration
/// exists there.
pub fn resolve_config_dir(
    global: &GlobalArgs,
) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(Some(
                p.parent()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_else(|| PathBuf::from(".")),
            ))
        } else {
            Ok(Some(p))
        }
    } else {
        Ok(find_config_dir(&std::env::current_dir()?))
    }
}

/// Loads the configuration if one can be found.
pub fn load_optional_config(
    global: &GlobalArgs,
) -> Result<Option<(PathBuf, ProjectConfig)>, Box<dyn std::error::Error>> {
    match resolve_config_dir(global)? {
        Some(dir) => {
            let config = incra_config::load_config(&dir)?;
            tracing::debug!(
                dir = %dir.display(),
                project = %config.project.name,
                "loaded configuration"
            );
            Ok(Some((dir, config)))
        }
        None => Ok(None),
    }
}

/// Loads the configuration, failing if none exists.
pub fn load_required_config(
    global: &GlobalArgs,
) -> Result<(PathBuf, ProjectConfig), Box<dyn std::error::Error>> {
    load_optional_config(global)?.ok_or_else(|| {
        format!("could not find {CONFIG_FILE_NAME} in the current directory or any parent").into()
    })
}

/// Rebase rules from the configuration, or none without one.
pub fn configured_rebasings(
    global: &GlobalArgs,
) -> Result<Vec<Rebase>, Box<dyn std::error::Error>> {
    Ok(load_optional_config(global)?
        .map(|(_, config)| config.rebasings())
        .unwrap_or_default())
}

/// Reads and parses every analysis in parallel, preserving input order.
pub fn read_analyses(paths: &[PathBuf]) -> AnalysisResult<Vec<Analysis>> {
    paths
        .par_iter()
        .map(|path| {
            let analysis = Analysis::read_from(path)?;
            tracing::debug!(
                path = %path.display(),
                sources = analysis.sources().len(),
                "read analysis"
            );
            Ok(analysis)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn global(config: Option<&Path>) -> GlobalArgs {
        GlobalArgs {
            quiet: false,
            verbose: false,
            config: config.map(|p| p.to_str().unwrap().to_string()),
        }
    }

    #[test]
    fn find_config_dir_in_ancestor() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "[project]\nname = \"t\"\n").unwrap();
        let nested = tmp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_config_dir(&nested).as_deref(), Some(tmp.path()));
    }

    #[test]
    fn resolve_config_dir_from_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[project]\nname = \"t\"\n").unwrap();
        let dir = resolve_config_dir(&global(Some(&config_path))).unwrap();
        assert_eq!(dir.as_deref(), Some(tmp.path()));
    }

    #[test]
    fn resolve_config_dir_from_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = resolve_config_dir(&global(Some(tmp.path()))).unwrap();
        assert_eq!(dir.as_deref(), Some(tmp.path()));
    }

    #[test]
    fn configured_rebasings_from_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "[project]\nname = \"t\"\n\n[[rebase]]\nfrom = \"/x\"\ndrop = true\n",
        )
        .unwrap();
        let rules = configured_rebasings(&global(Some(tmp.path()))).unwrap();
        assert_eq!(rules, vec![Rebase::drop_lines("/x")]);
    }

    #[test]
    fn missing_config_file_in_explicit_dir_errors() {
        let tmp = TempDir::new().unwrap();
        assert!(load_required_config(&global(Some(tmp.path()))).is_err());
    }

    #[test]
    fn read_analyses_keeps_order() {
        let tmp = TempDir::new().unwrap();
        let mut paths = Vec::new();
        for i in 0..4 {
            let mut analysis = Analysis::default();
            analysis
                .stamps
                .sources
                .push(format!("/src/S{i}.scala"), format!("hash({i})"));
            let path = tmp.path().join(format!("{i}.analysis"));
            analysis.write_to_path(&path, &[]).unwrap();
            paths.push(path);
        }
        let analyses = read_analyses(&paths).unwrap();
        for (i, analysis) in analyses.iter().enumerate() {
            assert!(analysis.stamps.sources.contains_key(&format!("/src/S{i}.scala")));
        }
    }

    #[test]
    fn read_analyses_reports_missing_file() {
        let tmp = TempDir::new().unwrap();
        assert!(read_analyses(&[tmp.path().join("absent")]).is_err());
    }
}

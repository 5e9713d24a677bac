//! `incra merge`: combine per-unit analyses into one joint analysis.

use incra_analysis::Analysis;

use crate::pipeline::{configured_rebasings, read_analyses};
use crate::{GlobalArgs, MergeArgs};

/// Runs the `incra merge` command.
///
/// Inputs are parsed in parallel and merged in command-line order. Unless
/// `--allow-overlap` is given, inputs claiming the same source are rejected.
pub fn run(args: &MergeArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let rebasings = configured_rebasings(global)?;
    let analyses = read_analyses(&args.inputs)?;

    let merged = if args.allow_overlap {
        Analysis::merge(&analyses)
    } else {
        Analysis::merge_checked(&analyses)?
    };
    merged.write_to_path(&args.output, &rebasings)?;

    if !global.quiet {
        eprintln!(
            "     Merged {} analyses ({} sources) into {}",
            analyses.len(),
            merged.sources().len(),
            args.output.display()
        );
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn write_unit(
        dir: &Path,
        name: &str,
        source: &str,
        class: &str,
        dep: Option<&str>,
    ) -> PathBuf {
        let mut a = Analysis::default();
        a.relations.products.push(source, format!("/out/{class}.class"));
        a.relations.classes.push(source, class);
        a.stamps.sources.push(source, "hash(1)");
        if let Some(dep) = dep {
            a.relations.direct_external.push(source, dep);
            a.apis.external.push(dep, "QQ==");
        }
        let path = dir.join(name);
        a.write_to_path(&path, &[]).unwrap();
        path
    }

    fn global(dir: &Path) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some(dir.to_str().unwrap().to_string()),
        }
    }

    #[test]
    fn merges_and_internalizes() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("incra.toml"), "[project]\nname = \"t\"\n").unwrap();
        let a = write_unit(tmp.path(), "a.analysis", "/src/a.scala", "x.A", Some("x.B"));
        let b = write_unit(tmp.path(), "b.analysis", "/src/b.scala", "x.B", None);
        let output = tmp.path().join("joint.analysis");
        let args = MergeArgs {
            inputs: vec![a, b],
            output: output.clone(),
            allow_overlap: false,
        };
        assert_eq!(run(&args, &global(tmp.path())).unwrap(), 0);

        let joint = Analysis::read_from(&output).unwrap();
        assert_eq!(
            joint.relations.direct_internal.get("/src/a.scala").unwrap(),
            ["/src/b.scala"]
        );
    }

    #[test]
    fn overlap_rejected_unless_allowed() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("incra.toml"), "[project]\nname = \"t\"\n").unwrap();
        let a = write_unit(tmp.path(), "a.analysis", "/src/a.scala", "x.A", None);
        let mut args = MergeArgs {
            inputs: vec![a.clone(), a],
            output: tmp.path().join("joint.analysis"),
            allow_overlap: false,
        };
        assert!(run(&args, &global(tmp.path())).is_err());
        args.allow_overlap = true;
        assert_eq!(run(&args, &global(tmp.path())).unwrap(), 0);
    }

    #[test]
    fn configured_rebasings_apply_to_output() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("incra.toml"),
            "[project]\nname = \"t\"\n\n[[rebase]]\nfrom = \"/src/\"\nto = \"/moved/\"\n",
        )
        .unwrap();
        let a = write_unit(tmp.path(), "a.analysis", "/src/a.scala", "x.A", None);
        let output = tmp.path().join("joint.analysis");
        let args = MergeArgs {
            inputs: vec![a],
            output: output.clone(),
            allow_overlap: false,
        };
        run(&args, &global(tmp.path())).unwrap();
        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.contains("/moved/a.scala"));
        assert!(!text.contains("/src/a.scala"));
    }
}

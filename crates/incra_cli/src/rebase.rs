//! `incra rebase`: rewrite the paths recorded in an analysis.

use incra_analysis::Analysis;
use incra_common::Rebase;

use crate::pipeline::configured_rebasings;
use crate::{GlobalArgs, RebaseArgs};

/// Runs the `incra rebase` command.
///
/// Configured rules run first, then `--replace` rules, then `--drop` rules,
/// each group in command-line order.
pub fn run(args: &RebaseArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut rebasings = configured_rebasings(global)?;
    rebasings.extend(args.replace.iter().cloned());
    rebasings.extend(args.drop.iter().map(Rebase::drop_lines));

    let analysis = Analysis::read_from(&args.input)?;
    analysis.write_to_path(&args.output, &rebasings)?;

    if !global.quiet {
        eprintln!(
            "    Rebased {} with {} rule(s) into {}",
            args.input.display(),
            rebasings.len(),
            args.output.display()
        );
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn cli_rules_follow_configured_rules() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("incra.toml"),
            "[project]\nname = \"t\"\n\n[[rebase]]\nfrom = \"/home/me\"\nto = \"/work\"\n",
        )
        .unwrap();

        let mut analysis = Analysis::default();
        analysis.stamps.sources.push("/home/me/src/A.scala", "hash(1)");
        analysis.stamps.sources.push("/home/me/tmp/Gen.scala", "hash(2)");
        let input = tmp.path().join("in.analysis");
        analysis.write_to_path(&input, &[]).unwrap();

        let output = tmp.path().join("out.analysis");
        let args = RebaseArgs {
            input,
            output: output.clone(),
            replace: vec![Rebase::replace("/work/src", "$SRC")],
            drop: vec!["/tmp/".to_string()],
        };
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some(tmp.path().to_str().unwrap().to_string()),
        };
        assert_eq!(run(&args, &global).unwrap(), 0);

        let rebased = Analysis::read_from(&output).unwrap();
        assert_eq!(
            rebased.stamps.sources.keys().collect::<Vec<_>>(),
            ["$SRC/A.scala"]
        );
    }
}

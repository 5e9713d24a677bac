//! Command-line driver for incremental-compilation analyses.
//!
//! Provides `incra merge` and `incra split` for combining per-unit analyses
//! into one joint analysis and back, `incra diff` for comparing analyses,
//! `incra rebase` for relocating them, `incra anonymize` for producing
//! shareable fixtures, and `incra fingerprint` for content hashes.

#![warn(missing_docs)]

mod anonymize;
mod diff;
mod fingerprint;
mod merge;
mod pipeline;
mod rebase;
mod split;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use incra_common::Rebase;
use tracing::Level;

/// Merge, split, and inspect incremental-compilation analyses.
#[derive(Parser, Debug)]
#[command(name = "incra", version, about = "Incremental analysis toolkit")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to an `incra.toml` file or the directory holding it.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge per-unit analyses into one joint analysis.
    Merge(MergeArgs),
    /// Split a joint analysis into the configured units.
    Split(SplitArgs),
    /// Compare two analyses.
    Diff(DiffArgs),
    /// Rewrite paths in an analysis.
    Rebase(RebaseArgs),
    /// Replace every token in an analysis with random text of the same shape.
    Anonymize(AnonymizeArgs),
    /// Print the content hash of each analysis.
    Fingerprint(FingerprintArgs),
}

/// Arguments for the `incra merge` subcommand.
#[derive(Parser, Debug)]
pub struct MergeArgs {
    /// Analyses to merge.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Where to write the merged analysis.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Accept inputs that claim the same source; the last one wins.
    #[arg(long)]
    pub allow_overlap: bool,
}

/// Arguments for the `incra split` subcommand.
#[derive(Parser, Debug)]
pub struct SplitArgs {
    /// Joint analysis to split.
    pub input: PathBuf,

    /// Collect sources owned by no unit into the configured catch-all output.
    #[arg(long)]
    pub catchall: bool,

    /// Write only the named unit (repeatable). All units are written by default.
    #[arg(long = "unit", value_name = "NAME")]
    pub units: Vec<String>,
}

/// Arguments for the `incra diff` subcommand.
#[derive(Parser, Debug)]
pub struct DiffArgs {
    /// Left-hand analysis.
    pub left: PathBuf,

    /// Right-hand analysis.
    pub right: PathBuf,

    /// Output format for the report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `incra rebase` subcommand.
#[derive(Parser, Debug)]
pub struct RebaseArgs {
    /// Analysis to rewrite.
    pub input: PathBuf,

    /// Where to write the rewritten analysis.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Replace a token, as `FROM=TO`. Applied after configured rules.
    #[arg(long = "replace", value_name = "FROM=TO")]
    pub replace: Vec<Rebase>,

    /// Drop every line containing a token. Applied after replacements.
    #[arg(long = "drop", value_name = "TOKEN")]
    pub drop: Vec<String>,
}

/// Arguments for the `incra anonymize` subcommand.
#[derive(Parser, Debug)]
pub struct AnonymizeArgs {
    /// Analysis to anonymize.
    pub input: PathBuf,

    /// Where to write the anonymized analysis.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Random seed (default: derived from the input's content hash).
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for the `incra fingerprint` subcommand.
#[derive(Parser, Debug)]
pub struct FingerprintArgs {
    /// Analyses to hash.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

impl GlobalArgs {
    /// Maximum level of log events written to stderr.
    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::ERROR
        } else {
            Level::WARN
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    tracing_subscriber::fmt()
        .with_max_level(global.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = match cli.command {
        Command::Merge(ref args) => merge::run(args, &global),
        Command::Split(ref args) => split::run(args, &global),
        Command::Diff(ref args) => diff::run(args, &global),
        Command::Rebase(ref args) => rebase::run(args, &global),
        Command::Anonymize(ref args) => anonymize::run(args, &global),
        Command::Fingerprint(ref args) => fingerprint::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_merge() {
        let cli = Cli::parse_from(["incra", "merge", "a.analysis", "b.analysis", "-o", "joint"]);
        match cli.command {
            Command::Merge(ref args) => {
                assert_eq!(
                    args.inputs,
                    vec![PathBuf::from("a.analysis"), PathBuf::from("b.analysis")]
                );
                assert_eq!(args.output, PathBuf::from("joint"));
                assert!(!args.allow_overlap);
            }
            _ => panic!("expected Merge command"),
        }
    }

    #[test]
    fn parse_merge_requires_inputs() {
        assert!(Cli::try_parse_from(["incra", "merge", "-o", "joint"]).is_err());
    }

    #[test]
    fn parse_merge_allow_overlap() {
        let cli = Cli::parse_from(["incra", "merge", "a", "-o", "j", "--allow-overlap"]);
        match cli.command {
            Command::Merge(ref args) => assert!(args.allow_overlap),
            _ => panic!("expected Merge command"),
        }
    }

    #[test]
    fn parse_split() {
        let cli = Cli::parse_from(["incra", "split", "joint.analysis", "--catchall"]);
        match cli.command {
            Command::Split(ref args) => {
                assert_eq!(args.input, PathBuf::from("joint.analysis"));
                assert!(args.catchall);
            }
            _ => panic!("expected Split command"),
        }
    }

    #[test]
    fn parse_split_units() {
        let cli = Cli::parse_from(["incra", "split", "j", "--unit", "core", "--unit", "web"]);
        match cli.command {
            Command::Split(ref args) => {
                assert_eq!(args.units, vec!["core".to_string(), "web".to_string()]);
                assert!(!args.catchall);
            }
            _ => panic!("expected Split command"),
        }
    }

    #[test]
    fn parse_diff_default_format() {
        let cli = Cli::parse_from(["incra", "diff", "l", "r"]);
        match cli.command {
            Command::Diff(ref args) => assert_eq!(args.format, ReportFormat::Text),
            _ => panic!("expected Diff command"),
        }
    }

    #[test]
    fn parse_diff_json() {
        let cli = Cli::parse_from(["incra", "diff", "l", "r", "--format", "json"]);
        match cli.command {
            Command::Diff(ref args) => assert_eq!(args.format, ReportFormat::Json),
            _ => panic!("expected Diff command"),
        }
    }

    #[test]
    fn parse_rebase_rules() {
        let cli = Cli::parse_from([
            "incra",
            "rebase",
            "in",
            "-o",
            "out",
            "--replace",
            "/home/me=$ROOT",
            "--replace",
            "/tmp=",
            "--drop",
            "scratch",
        ]);
        match cli.command {
            Command::Rebase(ref args) => {
                assert_eq!(
                    args.replace,
                    vec![
                        Rebase::replace("/home/me", "$ROOT"),
                        Rebase::replace("/tmp", "")
                    ]
                );
                assert_eq!(args.drop, vec!["scratch"]);
            }
            _ => panic!("expected Rebase command"),
        }
    }

    #[test]
    fn parse_rebase_rejects_malformed_rule() {
        let parsed =
            Cli::try_parse_from(["incra", "rebase", "in", "-o", "out", "--replace", "nope"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn parse_anonymize_seed() {
        let cli = Cli::parse_from(["incra", "anonymize", "in", "-o", "out", "--seed", "7"]);
        match cli.command {
            Command::Anonymize(ref args) => assert_eq!(args.seed, Some(7)),
            _ => panic!("expected Anonymize command"),
        }
    }

    #[test]
    fn parse_fingerprint() {
        let cli = Cli::parse_from(["incra", "fingerprint", "a", "b", "c"]);
        match cli.command {
            Command::Fingerprint(ref args) => assert_eq!(args.inputs.len(), 3),
            _ => panic!("expected Fingerprint command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from([
            "incra",
            "--quiet",
            "--config",
            "/repo/incra.toml",
            "fingerprint",
            "a",
        ]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.config.as_deref(), Some("/repo/incra.toml"));
    }

    #[test]
    fn log_level_follows_flags() {
        let mut global = GlobalArgs {
            quiet: false,
            verbose: false,
            config: None,
        };
        assert_eq!(global.log_level(), Level::WARN);
        global.quiet = true;
        assert_eq!(global.log_level(), Level::ERROR);
        global.verbose = true;
        assert_eq!(global.log_level(), Level::DEBUG);
    }
}

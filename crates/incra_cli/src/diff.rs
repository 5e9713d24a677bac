//! `incra diff`: compare two analyses element by element.

use incra_analysis::{ElementDiff, KeyDiffer};

use crate::pipeline::read_analyses;
use crate::{DiffArgs, GlobalArgs, ReportFormat};

/// Runs the `incra diff` command.
///
/// Returns exit code 0 if the analyses are equal, 1 if they differ.
pub fn run(args: &DiffArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let analyses = read_analyses(&[args.left.clone(), args.right.clone()])?;
    let [left, right] =
        <[_; 2]>::try_from(analyses).map_err(|_| "expected exactly two analyses")?;
    let diffs = left.diff(&right, &KeyDiffer);

    match args.format {
        ReportFormat::Text => print!("{}", render_text(&diffs)),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&diffs)?),
    }

    if !global.quiet && args.format == ReportFormat::Text {
        if diffs.is_empty() {
            eprintln!("   Analyses are equal");
        } else {
            eprintln!("   {} element(s) differ", diffs.len());
        }
    }
    Ok(if diffs.is_empty() { 0 } else { 1 })
}

fn render_text(diffs: &[ElementDiff]) -> String {
    diffs.iter().map(ToString::to_string).collect()
}

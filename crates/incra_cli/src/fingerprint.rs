//! `incra fingerprint`: print content hashes of analyses.

use crate::pipeline::read_analyses;
use crate::{FingerprintArgs, GlobalArgs};

/// Runs the `incra fingerprint` command.
///
/// Prints `<hash>  <path>` per input, in input order.
pub fn run(
    args: &FingerprintArgs,
    _global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    let analyses = read_analyses(&args.inputs)?;
    for (analysis, path) in analyses.iter().zip(&args.inputs) {
        println!("{}  {}", analysis.content_hash(), path.display());
    }
    Ok(0)
}

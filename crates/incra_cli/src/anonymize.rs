//! `incra anonymize`: produce a shareable fixture from a real analysis.

use incra_analysis::{Analysis, Anonymizer};

use crate::{AnonymizeArgs, GlobalArgs};

/// Runs the `incra anonymize` command.
///
/// Without `--seed`, the seed is derived from the input's content hash so
/// the same input always anonymizes the same way.
pub fn run(
    args: &AnonymizeArgs,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    let mut analysis = Analysis::read_from(&args.input)?;
    let seed = args
        .seed
        .unwrap_or_else(|| analysis.content_hash().seed());
    tracing::debug!(seed, "anonymizing");

    analysis.translate(&mut Anonymizer::new(seed));
    analysis.write_to_path(&args.output, &[])?;

    if !global.quiet {
        eprintln!(
            " Anonymized {} into {}",
            args.input.display(),
            args.output.display()
        );
    }
    Ok(0)
}

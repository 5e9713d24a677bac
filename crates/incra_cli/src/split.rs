//! `incra split`: partition a joint analysis into the configured units.

use incra_analysis::Analysis;

use crate::pipeline::load_required_config;
use crate::{GlobalArgs, SplitArgs};

/// Runs the `incra split` command.
///
/// Unit sources are resolved against the configured build root. Each unit's
/// analysis is written to its configured output, followed by the catch-all
/// analysis when enabled by the configuration or `--catchall`. With `--unit`,
/// only the named units are written; the split itself still covers every
/// configured unit, so the catch-all keeps its meaning.
pub fn run(args: &SplitArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (config_dir, config) = load_required_config(global)?;
    if config.units.is_empty() {
        return Err(format!("no units configured in {}", config_dir.display()).into());
    }
    for name in &args.units {
        config.unit(name)?;
    }
    let selected = |name: &str| args.units.is_empty() || args.units.iter().any(|u| u == name);

    let mut plan = config.split_plan(&config_dir);
    plan.catchall |= args.catchall;
    let outputs = plan.outputs()?;
    let resolver = config.build_root(&config_dir);
    let rebasings = config.rebasings();

    let joint = Analysis::read_from(&args.input)?;
    let parts = joint.split(plan.sources(), plan.catchall, &resolver)?;

    let mut written = 0usize;
    for (index, (part, output)) in parts.iter().zip(&outputs).enumerate() {
        if plan.units.get(index).is_some_and(|unit| !selected(unit.name.as_str())) {
            continue;
        }
        part.write_to_path(output, &rebasings)?;
        written += 1;
        tracing::debug!(
            output = %output.display(),
            sources = part.sources().len(),
            "wrote split"
        );
    }

    if !global.quiet {
        eprintln!(
            "      Split {} into {} analyses, wrote {}",
            args.input.display(),
            parts.len(),
            written
        );
    }
    Ok(0)
}

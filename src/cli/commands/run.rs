//! Replay a scenario file

use std::path::Path;

use tallybox::output::OutputMode;
use tallybox::scenario::Scenario;

/// Replay a scenario and exit non-zero when any step fails.
pub fn run_scenario(path: &Path, mode: OutputMode) -> anyhow::Result<()> {
    let scenario = Scenario::load(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let report = scenario.run(base_dir)?;

    report.render(mode);

    if !report.passed {
        std::process::exit(1);
    }

    Ok(())
}

use anyhow::Result;
use heightmapper::{RunConfig, RunSummary};

/// Print the settings and the planned summary without sending any request.
pub fn run(config: &RunConfig) -> Result<()> {
    let summary = RunSummary::planned(config);
    let on_stdout = config.output_path.is_none();
    super::announce(&summary.settings(), on_stdout);
    super::announce(&summary.to_string(), on_stdout);
    Ok(())
}

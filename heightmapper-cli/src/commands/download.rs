use anyhow::{Context, Result};
use heightmapper::fetch::HttpTransport;
use heightmapper::{run as run_pipeline, RunConfig, RunSummary};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Download and render, drawing progress on `pb`.
///
/// `pb` is shared with the log writer so warnings print above the bar.
pub fn run(config: &RunConfig, pb: &ProgressBar) -> Result<()> {
    let on_stdout = config.output_path.is_none();
    let planned = RunSummary::planned(config);
    super::announce(&planned.settings(), on_stdout);

    let transport =
        HttpTransport::from_config(&config.fetch).context("Failed to create HTTP client")?;

    pb.set_length(planned.planned_batches as u64);
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )?
            .progress_chars("#>-"),
    );

    let output = run_pipeline(config, transport, |progress| {
        pb.set_message(progress.to_string());
        pb.inc(1);
    });
    pb.finish_and_clear();
    let output = output.context("Failed to build heightmap")?;

    output
        .artifact
        .write_to(config.output_path.as_deref())
        .context("Failed to write output")?;

    super::announce(&output.summary.to_string(), on_stdout);
    Ok(())
}

//! Download-and-render pipeline.

use tracing::info;

use crate::config::RunConfig;
use crate::error::Result;
use crate::fetch::{BatchProgress, HeightFetcher, Transport};
use crate::grid::HeightGrid;
use crate::render::Artifact;
use crate::summary::RunSummary;

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub grid: HeightGrid,
    pub artifact: Artifact,
    pub summary: RunSummary,
}

/// Validate `config`, download the grid through `transport` and render it.
///
/// Nothing is sent if the configuration is invalid. The artifact is returned
/// unwritten; see [`Artifact::write_to`].
///
/// # Errors
///
/// - [`HeightmapError::InvalidConfig`](crate::HeightmapError::InvalidConfig)
///   for a rejected configuration
/// - [`HeightmapError::NoValidData`](crate::HeightmapError::NoValidData) if
///   grayscale output is requested and no valid sample was downloaded
pub fn run<T: Transport>(
    config: &RunConfig,
    transport: T,
    on_progress: impl FnMut(&BatchProgress),
) -> Result<RunOutput> {
    config.validate()?;
    let renderer = config.renderer()?;
    let mapper = config.mapper();
    let (width, height) = mapper.dimensions();

    let fetcher = HeightFetcher::new(transport, config.fetch.clone());
    let mut grid = HeightGrid::new(width, height);
    let report = fetcher.fetch(&mapper, &mut grid, on_progress);
    info!(
        valid = grid.valid_count(),
        failed_batches = report.failed_batches,
        "Download finished"
    );

    let artifact = renderer.render(&grid)?;
    let summary = RunSummary::planned(config).with_results(&grid, report);
    Ok(RunOutput {
        grid,
        artifact,
        summary,
    })
}

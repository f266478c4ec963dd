//! Human-readable run summary.
//!
//! The same fields are printed for dry runs and completed runs; values that
//! are only known after downloading show as `n/a` in a dry run.

use std::fmt;
use std::path::PathBuf;

use crate::config::{OutputMode, RunConfig};
use crate::fetch::FetchReport;
use crate::grid::HeightGrid;
use crate::resample::scaled_len;
use crate::traversal::Traversal;

/// Parameters and results of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub traversal: Traversal,
    pub mode: OutputMode,
    pub topo_line_spacing: Option<f32>,
    pub output_path: Option<PathBuf>,
    pub center: (i64, i64),
    pub size: (i64, i64),
    pub step: i64,
    pub scale: f32,
    pub units_per_pixel: f32,
    pub grid_dimensions: (usize, usize),
    pub image_dimensions: Option<(usize, usize)>,
    pub planned_batches: usize,
    /// Smallest and largest valid height, once known.
    pub height_range: Option<(f32, f32)>,
    pub report: Option<FetchReport>,
}

impl RunSummary {
    /// Summary of what `config` will do, before any download.
    pub fn planned(config: &RunConfig) -> Self {
        let (width, height) = config.grid_dimensions();
        let image_dimensions = match config.mode {
            OutputMode::Raw => None,
            OutputMode::Image | OutputMode::Topographic => Some((
                scaled_len(width, config.scale),
                scaled_len(height, config.scale),
            )),
        };
        Self {
            traversal: config.traversal(),
            mode: config.mode,
            topo_line_spacing: config.topo_line_spacing,
            output_path: config.output_path.clone(),
            center: (config.center_x, config.center_y),
            size: (config.size_x, config.size_y),
            step: config.step,
            scale: config.scale,
            units_per_pixel: config.units_per_pixel(),
            grid_dimensions: (width, height),
            image_dimensions,
            planned_batches: config.fetch.plan(width, height).len(),
            height_range: None,
            report: None,
        }
    }

    /// Add the results of a completed download.
    pub fn with_results(mut self, grid: &HeightGrid, report: FetchReport) -> Self {
        self.height_range = grid.valid_range().ok();
        self.report = Some(report);
        self
    }

    /// Description of the run settings, printed before downloading.
    pub fn settings(&self) -> String {
        let output = match &self.output_path {
            Some(path) => path.display().to_string(),
            None => "stdout".to_string(),
        };
        let mode = match (self.mode, self.topo_line_spacing) {
            (OutputMode::Topographic, Some(spacing)) => {
                format!("{} with steps of {}", self.mode, spacing)
            }
            _ => self.mode.to_string(),
        };
        format!(
            "Using {} request algorithm\n\
             Output will be saved to {}\n\
             Output is {}\n\
             Size: {}, {}\n\
             Additional scaling afterwards: {}\n\
             Units per height-point: {}\n",
            self.traversal,
            output,
            mode,
            self.size.0,
            self.size.1,
            self.scale,
            self.step,
        )
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Final Parameters:")?;
        match self.height_range {
            Some((min, max)) => {
                writeln!(f, "Minimum Height: {}", min)?;
                writeln!(f, "Maximum Height: {}", max)?;
            }
            None => {
                writeln!(f, "Minimum Height: n/a")?;
                writeln!(f, "Maximum Height: n/a")?;
            }
        }
        writeln!(f, "Size-X: {}", self.size.0)?;
        writeln!(f, "Size-Y: {}", self.size.1)?;
        writeln!(f, "Center-X: {}", self.center.0)?;
        writeln!(f, "Center-Y: {}", self.center.1)?;
        writeln!(f, "Units per pixel: {}", self.units_per_pixel)?;
        writeln!(
            f,
            "Grid size: {}x{} samples",
            self.grid_dimensions.0, self.grid_dimensions.1
        )?;
        match self.image_dimensions {
            Some((w, h)) => writeln!(f, "Final image size: {}x{} pixels", w, h)?,
            None => writeln!(f, "Final image size: n/a")?,
        }
        match self.report {
            Some(report) => writeln!(
                f,
                "Batches: {} sent, {} failed",
                report.batches, report.failed_batches
            ),
            None => writeln!(f, "Batches: {} planned", self.planned_batches),
        }
    }
}

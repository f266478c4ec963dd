//! Run configuration.
//!
//! [`RunConfig`] is the parsed form of the command line. [`RunConfig::validate`]
//! rejects inconsistent settings before any request is sent.

use std::fmt;
use std::path::PathBuf;

use crate::color::ColorMap;
use crate::contour::ContourClassifier;
use crate::coords::GridMapper;
use crate::error::{HeightmapError, Result};
use crate::fetch::FetchConfig;
use crate::render::{NumberFormat, Renderer};
use crate::resample::scaled_len;
use crate::traversal::Traversal;

/// Default half extent in GK4 units.
pub const DEFAULT_SIZE: i64 = 5000;

/// Default distance between samples in metres.
pub const DEFAULT_STEP: i64 = 20;

/// Largest grid (and scaled image) accepted, in cells.
pub const MAX_GRID_CELLS: usize = 100_000_000;

/// Kind of output to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Grayscale heightmap PNG.
    #[default]
    Image,
    /// Raw numeric heights as text.
    Raw,
    /// Colored topographic map with contour lines.
    Topographic,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Image => f.write_str("an image"),
            OutputMode::Raw => f.write_str("a list of raw height values"),
            OutputMode::Topographic => f.write_str("a topographical map"),
        }
    }
}

/// Everything needed for one download-and-render run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// GK4 easting of the center.
    pub center_x: i64,
    /// GK4 northing of the center.
    pub center_y: i64,
    /// Half extent east-west.
    pub size_x: i64,
    /// Half extent north-south.
    pub size_y: i64,
    /// Metres between samples.
    pub step: i64,
    /// Scale applied after download.
    pub scale: f32,
    pub mode: OutputMode,
    /// Metres between contour lines; required for topographic output.
    pub topo_line_spacing: Option<f32>,
    pub output_path: Option<PathBuf>,
    /// Number formatting for raw output.
    pub number_format: NumberFormat,
    pub fetch: FetchConfig,
}

impl RunConfig {
    /// Configuration for a grid around `(center_x, center_y)` with defaults
    /// for everything else.
    pub fn new(center_x: i64, center_y: i64) -> Self {
        Self {
            center_x,
            center_y,
            size_x: DEFAULT_SIZE,
            size_y: DEFAULT_SIZE,
            step: DEFAULT_STEP,
            scale: 1.0,
            mode: OutputMode::default(),
            topo_line_spacing: None,
            output_path: None,
            number_format: NumberFormat::default(),
            fetch: FetchConfig::default(),
        }
    }

    pub fn with_size(mut self, size_x: i64, size_y: i64) -> Self {
        self.size_x = size_x;
        self.size_y = size_y;
        self
    }

    pub fn with_step(mut self, step: i64) -> Self {
        self.step = step;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the contour spacing. Does not change the mode.
    pub fn with_topo_line_spacing(mut self, spacing: f32) -> Self {
        self.topo_line_spacing = Some(spacing);
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn with_number_format(mut self, format: NumberFormat) -> Self {
        self.number_format = format;
        self
    }

    pub fn with_fetch(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    /// Mapper between grid positions and GK4 coordinates.
    pub fn mapper(&self) -> GridMapper {
        GridMapper::new(
            self.center_x,
            self.center_y,
            self.size_x,
            self.size_y,
            self.step,
        )
    }

    /// Grid dimensions as `(width, height)`.
    pub fn grid_dimensions(&self) -> (usize, usize) {
        self.mapper().dimensions()
    }

    /// Metres covered by one output pixel.
    pub fn units_per_pixel(&self) -> f32 {
        self.step as f32 / self.scale
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HeightmapError::InvalidConfig`] if:
    /// - raw output is combined with a contour spacing
    /// - topographic output has no (or a non-positive) contour spacing
    /// - an image mode has no output path
    /// - step, sizes, scale or batch size are not positive
    /// - the grid (or the scaled image) would be empty
    /// - the area reaches outside the `i64` coordinate range
    /// - the grid (or the scaled image) exceeds [`MAX_GRID_CELLS`]
    pub fn validate(&self) -> Result<()> {
        if self.mode == OutputMode::Raw && self.topo_line_spacing.is_some() {
            return Err(HeightmapError::invalid_config(
                "raw mode is incompatible with topographical mode",
            ));
        }
        if self.mode == OutputMode::Topographic {
            match self.topo_line_spacing {
                None => {
                    return Err(HeightmapError::invalid_config(
                        "topographical mode requires a line spacing",
                    ))
                }
                Some(spacing) if ContourClassifier::new(spacing).is_none() => {
                    return Err(HeightmapError::invalid_config(format!(
                        "invalid topographical line spacing {}",
                        spacing
                    )))
                }
                Some(_) => {}
            }
        }
        if self.mode != OutputMode::Raw && self.output_path.is_none() {
            return Err(HeightmapError::invalid_config(
                "an output file is required unless raw output is selected",
            ));
        }
        if self.step <= 0 {
            return Err(HeightmapError::invalid_config(format!(
                "units per sample must be positive, got {}",
                self.step
            )));
        }
        if self.size_x <= 0 || self.size_y <= 0 {
            return Err(HeightmapError::invalid_config(format!(
                "size must be positive, got {},{}",
                self.size_x, self.size_y
            )));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(HeightmapError::invalid_config(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }
        if self.fetch.max_batch_size == 0 {
            return Err(HeightmapError::invalid_config(
                "batch size must be at least 1",
            ));
        }

        let mapper = self.mapper();
        if mapper.x.bounds().is_none() || mapper.y.bounds().is_none() {
            return Err(HeightmapError::invalid_config(format!(
                "size {},{} around {},{} is outside the coordinate range",
                self.size_x, self.size_y, self.center_x, self.center_y
            )));
        }

        let (width, height) = mapper.dimensions();
        if width == 0 || height == 0 {
            return Err(HeightmapError::invalid_config(format!(
                "size {},{} with {} units per sample gives an empty grid",
                self.size_x, self.size_y, self.step
            )));
        }
        if self.mode != OutputMode::Raw
            && (scaled_len(width, self.scale) == 0 || scaled_len(height, self.scale) == 0)
        {
            return Err(HeightmapError::invalid_config(format!(
                "scale {} shrinks the {}x{} grid to nothing",
                self.scale, width, height
            )));
        }
        check_cell_count("grid", width, height)?;
        if self.mode != OutputMode::Raw {
            check_cell_count(
                "scaled image",
                scaled_len(width, self.scale),
                scaled_len(height, self.scale),
            )?;
        }
        Ok(())
    }

    /// The renderer for the configured mode.
    ///
    /// Call [`validate`](Self::validate) first; an invalid contour spacing is
    /// reported here as well.
    pub fn renderer(&self) -> Result<Renderer> {
        match self.mode {
            OutputMode::Raw => Ok(Renderer::Raw {
                format: self.number_format,
            }),
            OutputMode::Image => Ok(Renderer::Grayscale { scale: self.scale }),
            OutputMode::Topographic => {
                let contours = self
                    .topo_line_spacing
                    .and_then(ContourClassifier::new)
                    .ok_or_else(|| {
                        HeightmapError::invalid_config("topographical mode requires a line spacing")
                    })?;
                Ok(Renderer::Topographic {
                    scale: self.scale,
                    contours,
                    colors: ColorMap::default(),
                })
            }
        }
    }

    /// Traversal used for downloading.
    pub fn traversal(&self) -> Traversal {
        self.fetch.traversal
    }
}

fn check_cell_count(what: &str, width: usize, height: usize) -> Result<()> {
    match width.checked_mul(height) {
        Some(cells) if cells <= MAX_GRID_CELLS => Ok(()),
        _ => Err(HeightmapError::invalid_config(format!(
            "{} of {}x{} exceeds the limit of {} cells",
            what, width, height, MAX_GRID_CELLS
        ))),
    }
}

//! Output renderers.
//!
//! A [`Renderer`] turns a [`HeightGrid`] into an [`Artifact`]: either text
//! (raw mode) or an RGB image. Grid row `y = 0` is the southern edge, so
//! image renderers flip it to the bottom row of the picture.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgb, RgbImage};
use tracing::info;

use crate::color::{ColorMap, LINE_COLOR};
use crate::contour::ContourClassifier;
use crate::error::{HeightmapError, Result};
use crate::grid::HeightGrid;
use crate::resample::{resample, scaled_len};

/// How raw heights are written as text.
///
/// Formatting never depends on the process locale; the decimal separator is
/// always `.`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberFormat {
    /// Shortest representation that reads back to the same value.
    #[default]
    Shortest,
    /// Fixed number of decimal places.
    Fixed(usize),
}

impl NumberFormat {
    fn write(&self, out: &mut String, value: f32) {
        // Writing to a String cannot fail
        let _ = match self {
            NumberFormat::Shortest => write!(out, "{}", value),
            NumberFormat::Fixed(places) => write!(out, "{:.*}", places, value),
        };
    }
}

/// The result of rendering, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    Text(String),
    Image(RgbImage),
}

impl Artifact {
    /// Write the artifact to `path`, or text to stdout when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Images require a path; writing one without a path is an
    /// [`HeightmapError::InvalidConfig`].
    pub fn write_to(&self, path: Option<&Path>) -> Result<()> {
        match (self, path) {
            (Artifact::Text(text), Some(path)) => std::fs::write(path, text)?,
            (Artifact::Text(text), None) => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(text.as_bytes())?;
                stdout.flush()?;
            }
            (Artifact::Image(img), Some(path)) => {
                img.save_with_format(path, ImageFormat::Png)?;
            }
            (Artifact::Image(_), None) => {
                return Err(HeightmapError::invalid_config(
                    "an output file is required for image output",
                ))
            }
        }
        if let Some(path) = path {
            info!("Output written to {}", path.display());
        }
        Ok(())
    }

    /// Pixel dimensions of an image artifact.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            Artifact::Image(img) => Some(img.dimensions()),
            Artifact::Text(_) => None,
        }
    }
}

/// The output strategies.
#[derive(Debug, Clone, PartialEq)]
pub enum Renderer {
    /// Whitespace-separated heights, northernmost row first.
    Raw { format: NumberFormat },
    /// Heights normalized to gray levels; the finished image is resized by
    /// `scale`.
    Grayscale { scale: f32 },
    /// Colored map with contour lines; the grid is resampled by `scale`
    /// before classification.
    Topographic {
        scale: f32,
        contours: ContourClassifier,
        colors: ColorMap,
    },
}

impl Renderer {
    /// Render `grid`.
    ///
    /// # Errors
    ///
    /// The grayscale renderer fails with [`HeightmapError::NoValidData`] if
    /// the grid has no sample above the no-data threshold.
    pub fn render(&self, grid: &HeightGrid) -> Result<Artifact> {
        match self {
            Renderer::Raw { format } => Ok(Artifact::Text(render_raw(grid, *format))),
            Renderer::Grayscale { scale } => render_grayscale(grid, *scale).map(Artifact::Image),
            Renderer::Topographic {
                scale,
                contours,
                colors,
            } => Ok(Artifact::Image(render_topographic(
                grid, *scale, contours, colors,
            ))),
        }
    }

    /// Dimensions of the rendered output for a `width × height` grid, or
    /// `None` for text output.
    pub fn output_dimensions(&self, width: usize, height: usize) -> Option<(usize, usize)> {
        match self {
            Renderer::Raw { .. } => None,
            Renderer::Grayscale { scale } | Renderer::Topographic { scale, .. } => {
                Some((scaled_len(width, *scale), scaled_len(height, *scale)))
            }
        }
    }
}

/// Heights as text: rows from the highest `y` down to 0, columns ascending.
pub fn render_raw(grid: &HeightGrid, format: NumberFormat) -> String {
    let mut out = String::with_capacity(grid.width() * grid.height() * 8);
    for y in (0..grid.height()).rev() {
        for x in 0..grid.width() {
            if x != 0 {
                out.push(' ');
            }
            format.write(&mut out, grid.at(x, y));
        }
        out.push('\n');
    }
    out
}

/// Map `value` from `[min, max]` to a gray level.
fn gray_level(value: f32, min: f32, max: f32) -> u8 {
    let span = max - min;
    if span <= 0.0 {
        return 0;
    }
    ((value - min) * 255.0 / span).clamp(0.0, 255.0) as u8
}

/// Grayscale heightmap normalized over the valid height range.
pub fn render_grayscale(grid: &HeightGrid, scale: f32) -> Result<RgbImage> {
    let (min, max) = grid.valid_range()?;
    let (w, h) = (grid.width() as u32, grid.height() as u32);

    let img = RgbImage::from_fn(w, h, |px, py| {
        let level = gray_level(grid.at(px as usize, (h - py - 1) as usize), min, max);
        Rgb([level, level, level])
    });

    if scale == 1.0 {
        return Ok(img);
    }
    let sw = scaled_len(grid.width(), scale).max(1) as u32;
    let sh = scaled_len(grid.height(), scale).max(1) as u32;
    Ok(imageops::resize(&img, sw, sh, FilterType::CatmullRom))
}

/// Topographic map: contour lines over height-colored fill.
///
/// The last row and column of the resampled grid have no cell of their own
/// and stay black, as do heights outside the color table.
pub fn render_topographic(
    grid: &HeightGrid,
    scale: f32,
    contours: &ContourClassifier,
    colors: &ColorMap,
) -> RgbImage {
    let scaled = resample(grid, scale);
    let (w, h) = (scaled.width(), scaled.height());
    let mut img = RgbImage::new(w as u32, h as u32);

    for x in 0..w.saturating_sub(1) {
        for y in 0..h.saturating_sub(1) {
            let corners = [
                scaled.at(x, y),
                scaled.at(x + 1, y),
                scaled.at(x, y + 1),
                scaled.at(x + 1, y + 1),
            ];
            let color = if contours.is_boundary(corners) {
                LINE_COLOR
            } else {
                match colors.color_for(corners[0]) {
                    Some(color) => color,
                    None => continue,
                }
            };
            img.put_pixel(x as u32, (h - y - 1) as u32, color);
        }
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_grid() -> HeightGrid {
        // x across, y up: (0,0)=400 (1,0)=500 (0,1)=600 (1,1)=700
        HeightGrid::from_fn(2, 2, |x, y| 400.0 + x as f32 * 100.0 + y as f32 * 200.0)
    }

    #[test]
    fn test_raw_row_order() {
        let text = render_raw(&sample_grid(), NumberFormat::Shortest);
        assert_eq!(text, "600 700\n400 500\n");
    }

    #[test]
    fn test_raw_number_format() {
        let grid = HeightGrid::from_fn(2, 1, |x, _| if x == 0 { 512.3 } else { 1024.875 });
        assert_eq!(render_raw(&grid, NumberFormat::Shortest), "512.3 1024.875\n");
        assert_eq!(render_raw(&grid, NumberFormat::Fixed(1)), "512.3 1024.9\n");
        assert_eq!(render_raw(&grid, NumberFormat::Fixed(0)), "512 1025\n");
    }

    #[test]
    fn test_grayscale_normalization_and_flip() {
        let img = render_grayscale(&sample_grid(), 1.0).unwrap();
        assert_eq!(img.dimensions(), (2, 2));
        // Bottom-left pixel is the lowest sample, top-right the highest
        assert_eq!(img.get_pixel(0, 1), &Rgb([0, 0, 0]));
        assert_eq!(img.get_pixel(1, 0), &Rgb([255, 255, 255]));
        // 500 and 600 are a third and two thirds up the range
        assert_eq!(img.get_pixel(1, 1), &Rgb([85, 85, 85]));
        assert_eq!(img.get_pixel(0, 0), &Rgb([170, 170, 170]));
    }

    #[test]
    fn test_grayscale_no_data_is_black() {
        let mut grid = sample_grid();
        grid.set(0, 0, 0.0);
        let img = render_grayscale(&grid, 1.0).unwrap();
        assert_eq!(img.get_pixel(0, 1), &Rgb([0, 0, 0]));
        assert_eq!(img.get_pixel(1, 1), &Rgb([0, 0, 0]));
        assert_eq!(img.get_pixel(1, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_grayscale_requires_valid_data() {
        let grid = HeightGrid::new(3, 3);
        assert!(matches!(
            render_grayscale(&grid, 1.0),
            Err(HeightmapError::NoValidData)
        ));
    }

    #[test]
    fn test_grayscale_resizes_image() {
        let img = render_grayscale(&sample_grid(), 2.5).unwrap();
        assert_eq!(img.dimensions(), (5, 5));
    }

    #[test]
    fn test_topographic_fill_and_lines() {
        let grid = HeightGrid::from_fn(3, 3, |x, _| if x == 2 { 290.0 } else { 275.0 });
        let contours = ContourClassifier::new(10.0).unwrap();
        let img = render_topographic(&grid, 1.0, &contours, &ColorMap::default());
        assert_eq!(img.dimensions(), (3, 3));

        // Column 0 cells are flat at 275: fill color
        assert_eq!(img.get_pixel(0, 2), &Rgb([205, 255, 160]));
        assert_eq!(img.get_pixel(0, 1), &Rgb([205, 255, 160]));
        // Column 1 cells span 275..290: contour line
        assert_eq!(img.get_pixel(1, 2), &LINE_COLOR);
        // Last column and top row are never painted
        assert_eq!(img.get_pixel(2, 1), &Rgb([0, 0, 0]));
        assert_eq!(img.get_pixel(0, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_topographic_resamples_grid() {
        let grid = HeightGrid::from_fn(4, 4, |_, _| 500.0);
        let contours = ContourClassifier::new(25.0).unwrap();
        let img = render_topographic(&grid, 2.0, &contours, &ColorMap::default());
        assert_eq!(img.dimensions(), (8, 8));
        let expected = ColorMap::default().color_for(500.0).unwrap();
        assert_eq!(img.get_pixel(3, 4), &expected);
    }

    #[test]
    fn test_renderer_output_dimensions() {
        let raw = Renderer::Raw {
            format: NumberFormat::Shortest,
        };
        assert_eq!(raw.output_dimensions(10, 10), None);
        let gray = Renderer::Grayscale { scale: 1.5 };
        assert_eq!(gray.output_dimensions(10, 7), Some((15, 11)));
    }

    #[test]
    fn test_write_image_requires_path() {
        let artifact = Renderer::Grayscale { scale: 1.0 }
            .render(&sample_grid())
            .unwrap();
        assert!(matches!(
            artifact.write_to(None),
            Err(HeightmapError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_write_artifacts() {
        let dir = TempDir::new().unwrap();

        let png = dir.path().join("map.png");
        let artifact = Renderer::Grayscale { scale: 1.0 }
            .render(&sample_grid())
            .unwrap();
        artifact.write_to(Some(&png)).unwrap();
        let loaded = image::open(&png).unwrap().to_rgb8();
        assert_eq!(Artifact::Image(loaded), artifact);

        let txt = dir.path().join("heights.txt");
        Renderer::Raw {
            format: NumberFormat::Shortest,
        }
        .render(&sample_grid())
        .unwrap()
        .write_to(Some(&txt))
        .unwrap();
        assert_eq!(std::fs::read_to_string(&txt).unwrap(), "600 700\n400 500\n");
    }
}

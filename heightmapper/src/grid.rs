//! Dense elevation grid.
//!
//! This module provides [`HeightGrid`], the 2-D array of samples that the
//! fetcher fills and the renderers consume.

use crate::error::{HeightmapError, Result};

/// Samples at or below this height are treated as "no data".
///
/// The profile service answers with 0 for points outside its coverage area.
/// No point inside the covered area lies at sea level, so anything up to one
/// metre is considered a placeholder rather than terrain.
pub const NO_DATA_THRESHOLD: f32 = 1.0;

/// A cell index in a [`HeightGrid`].
///
/// `x` grows eastwards, `y` grows northwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPosition {
    pub x: usize,
    pub y: usize,
}

impl GridPosition {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// A `width × height` grid of elevation samples in metres.
///
/// Cells start at 0. Storage is column-major so a column is contiguous.
///
/// # Example
///
/// ```
/// use heightmapper::HeightGrid;
///
/// let mut grid = HeightGrid::new(3, 2);
/// grid.set(1, 1, 512.5);
/// assert_eq!(grid.get(1, 1), Some(512.5));
/// assert_eq!(grid.get(3, 0), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HeightGrid {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl HeightGrid {
    /// Allocate a zero-filled grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            values: vec![0.0; width * height],
        }
    }

    /// Build a grid from a function of `(x, y)`.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut values = Vec::with_capacity(width * height);
        for x in 0..width {
            for y in 0..height {
                values.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            values,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `true` if `(x, y)` lies inside the grid.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Get the sample at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        self.contains(x, y).then(|| self.values[x * self.height + y])
    }

    /// Get the sample at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the grid.
    pub fn at(&self, x: usize, y: usize) -> f32 {
        assert!(
            self.contains(x, y),
            "({}, {}) outside {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        self.values[x * self.height + y]
    }

    /// Write a sample. Returns `false` (and writes nothing) outside the grid.
    pub fn set(&mut self, x: usize, y: usize, value: f32) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        self.values[x * self.height + y] = value;
        true
    }

    /// All samples in storage order.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Smallest and largest sample above [`NO_DATA_THRESHOLD`].
    ///
    /// # Errors
    ///
    /// Returns [`HeightmapError::NoValidData`] if no sample is above the
    /// threshold.
    pub fn valid_range(&self) -> Result<(f32, f32)> {
        self.values
            .iter()
            .copied()
            .filter(|&v| v > NO_DATA_THRESHOLD)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((min, max)) => Some((min.min(v), max.max(v))),
            })
            .ok_or(HeightmapError::NoValidData)
    }

    /// Number of samples above [`NO_DATA_THRESHOLD`].
    pub fn valid_count(&self) -> usize {
        self.values
            .iter()
            .filter(|&&v| v > NO_DATA_THRESHOLD)
            .count()
    }
}

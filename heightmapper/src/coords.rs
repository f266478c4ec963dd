//! Mapping between grid indices and GK4 coordinates.
//!
//! The grid is laid out around a center point. Along each axis, sample `i`
//! sits at `i * step + (center - half_extent)`, so index 0 is the western
//! (or southern) edge and the axis holds `half_extent * 2 / step` samples.

use crate::grid::GridPosition;

/// Convert an axis index to a real-world coordinate.
///
/// # Examples
///
/// ```
/// use heightmapper::coords::index_to_coordinate;
///
/// assert_eq!(index_to_coordinate(0, 4_468_000, 5000, 20), 4_463_000);
/// assert_eq!(index_to_coordinate(3, 4_468_000, 5000, 20), 4_463_060);
/// ```
pub fn index_to_coordinate(index: usize, center: i64, half_extent: i64, step: i64) -> i64 {
    index as i64 * step + (center - half_extent)
}

/// One axis of the sampling grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisMapping {
    /// Center coordinate of the axis.
    pub center: i64,
    /// Distance from the center to the first sample.
    pub half_extent: i64,
    /// Distance between neighbouring samples.
    pub step: i64,
}

impl AxisMapping {
    pub fn new(center: i64, half_extent: i64, step: i64) -> Self {
        Self {
            center,
            half_extent,
            step,
        }
    }

    /// Number of samples along this axis.
    ///
    /// Returns 0 for a non-positive step or extent, and saturates at
    /// `usize::MAX` for extents too large to count.
    pub fn samples(&self) -> usize {
        if self.step <= 0 || self.half_extent <= 0 {
            return 0;
        }
        let samples = i128::from(self.half_extent) * 2 / i128::from(self.step);
        usize::try_from(samples).unwrap_or(usize::MAX)
    }

    /// Western (southern) and eastern (northern) edge of the axis, or `None`
    /// if either does not fit in an `i64`.
    pub fn bounds(&self) -> Option<(i64, i64)> {
        Some((
            self.center.checked_sub(self.half_extent)?,
            self.center.checked_add(self.half_extent)?,
        ))
    }

    /// Coordinate of the sample at `index`.
    pub fn index_to_coordinate(&self, index: usize) -> i64 {
        index_to_coordinate(index, self.center, self.half_extent, self.step)
    }

    /// Index of the sample sitting exactly at `coordinate`, if any.
    pub fn coordinate_to_index(&self, coordinate: i64) -> Option<usize> {
        if self.step <= 0 {
            return None;
        }
        let offset = coordinate - (self.center - self.half_extent);
        if offset < 0 || offset % self.step != 0 {
            return None;
        }
        let index = (offset / self.step) as usize;
        (index < self.samples()).then_some(index)
    }
}

/// Maps grid positions to (easting, northing) pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridMapper {
    pub x: AxisMapping,
    pub y: AxisMapping,
}

impl GridMapper {
    /// Create a mapper for a grid centered on `(center_x, center_y)` with the
    /// same step on both axes.
    pub fn new(center_x: i64, center_y: i64, size_x: i64, size_y: i64, step: i64) -> Self {
        Self {
            x: AxisMapping::new(center_x, size_x, step),
            y: AxisMapping::new(center_y, size_y, step),
        }
    }

    /// Grid dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.x.samples(), self.y.samples())
    }

    /// Real-world coordinate of a grid position.
    pub fn to_coordinate(&self, pos: GridPosition) -> (i64, i64) {
        (
            self.x.index_to_coordinate(pos.x),
            self.y.index_to_coordinate(pos.y),
        )
    }

    /// Grid position of a real-world coordinate, if it lies on a sample.
    pub fn to_position(&self, easting: i64, northing: i64) -> Option<GridPosition> {
        let x = self.x.coordinate_to_index(easting)?;
        let y = self.y.coordinate_to_index(northing)?;
        Some(GridPosition::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_to_coordinate() {
        assert_eq!(index_to_coordinate(0, 1000, 100, 10), 900);
        assert_eq!(index_to_coordinate(10, 1000, 100, 10), 1000);
        assert_eq!(index_to_coordinate(19, 1000, 100, 10), 1090);
    }

    #[test]
    fn test_axis_samples() {
        assert_eq!(AxisMapping::new(0, 5000, 20).samples(), 500);
        // Integer division drops the remainder
        assert_eq!(AxisMapping::new(0, 25, 20).samples(), 2);
        assert_eq!(AxisMapping::new(0, 5000, 0).samples(), 0);
        assert_eq!(AxisMapping::new(0, -5, 1).samples(), 0);
    }

    #[test]
    fn test_huge_axis_does_not_overflow() {
        assert_eq!(
            AxisMapping::new(0, i64::MAX, 1).samples(),
            (i64::MAX as u64 * 2) as usize
        );
        assert_eq!(AxisMapping::new(0, i64::MAX, i64::MAX).samples(), 2);
        assert_eq!(AxisMapping::new(0, i64::MAX, 1).bounds(), Some((-i64::MAX, i64::MAX)));
        assert_eq!(AxisMapping::new(1, i64::MAX, 1).bounds(), None);
        assert_eq!(AxisMapping::new(1000, 100, 10).bounds(), Some((900, 1100)));
    }

    #[test]
    fn test_coordinate_round_trip() {
        let axis = AxisMapping::new(4_468_000, 500, 20);
        for index in 0..axis.samples() {
            let coord = axis.index_to_coordinate(index);
            assert_eq!(axis.coordinate_to_index(coord), Some(index));
        }
    }

    #[test]
    fn test_coordinate_off_grid() {
        let axis = AxisMapping::new(1000, 100, 10);
        assert_eq!(axis.coordinate_to_index(905), None);
        assert_eq!(axis.coordinate_to_index(890), None);
        assert_eq!(axis.coordinate_to_index(1100), None);
    }

    #[test]
    fn test_grid_mapper() {
        let mapper = GridMapper::new(4_468_000, 5_333_000, 100, 60, 20);
        assert_eq!(mapper.dimensions(), (10, 6));
        assert_eq!(
            mapper.to_coordinate(GridPosition::new(0, 0)),
            (4_467_900, 5_332_940)
        );
        assert_eq!(
            mapper.to_coordinate(GridPosition::new(2, 5)),
            (4_467_940, 5_333_040)
        );
        assert_eq!(
            mapper.to_position(4_467_940, 5_333_040),
            Some(GridPosition::new(2, 5))
        );
    }
}

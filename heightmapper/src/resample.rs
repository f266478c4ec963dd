//! Bilinear upscaling of height grids.

use crate::grid::HeightGrid;

/// Size of an axis of `len` samples after scaling by `scale`.
pub fn scaled_len(len: usize, scale: f32) -> usize {
    (len as f32 * scale).round().max(0.0) as usize
}

/// Resample `source` by `scale` using bilinear interpolation.
///
/// The result is `round(W * scale) × round(H * scale)`. Destination cell
/// `(dx, dy)` samples the source at `(dx / scale, dy / scale)`. The top-left
/// neighbour is clamped to `W - 2` / `H - 2`, so points beyond the last
/// sample are extrapolated from the last cell.
///
/// A scale of exactly 1 returns a copy of `source`.
///
/// # Example
///
/// ```
/// use heightmapper::{resample::resample, HeightGrid};
///
/// let grid = HeightGrid::from_fn(2, 2, |x, _| x as f32 * 10.0);
/// let scaled = resample(&grid, 2.0);
/// assert_eq!((scaled.width(), scaled.height()), (4, 4));
/// assert_eq!(scaled.at(1, 0), 5.0);
/// ```
pub fn resample(source: &HeightGrid, scale: f32) -> HeightGrid {
    if scale == 1.0 {
        return source.clone();
    }

    let (sw, sh) = (source.width(), source.height());
    let dw = scaled_len(sw, scale);
    let dh = scaled_len(sh, scale);
    if sw == 0 || sh == 0 {
        return HeightGrid::new(dw, dh);
    }

    HeightGrid::from_fn(dw, dh, |dx, dy| {
        let fx = dx as f32 / scale;
        let fy = dy as f32 / scale;
        let (x0, x1) = neighbours(fx, sw);
        let (y0, y1) = neighbours(fy, sh);
        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;

        let a = source.at(x0, y0);
        let b = source.at(x0, y1);
        let c = source.at(x1, y0);
        let d = source.at(x1, y1);

        (1.0 - tx) * ((1.0 - ty) * a + ty * b) + tx * ((1.0 - ty) * c + ty * d)
    })
}

/// Lower and upper sample index around `f` on an axis of `len` samples.
fn neighbours(f: f32, len: usize) -> (usize, usize) {
    let lo = (f.floor() as usize).min(len.saturating_sub(2));
    let hi = (lo + 1).min(len - 1);
    (lo, hi)
}

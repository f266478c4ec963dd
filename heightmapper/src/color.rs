//! Height-to-color mapping for topographic maps.
//!
//! A [`ColorMap`] is a table of anchors sorted by threshold. A height is
//! colored by interpolating linearly between the two anchors around it.

use image::Rgb;

/// Color of contour lines.
pub const LINE_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// A height threshold and the color at that height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorAnchor {
    pub threshold: f32,
    pub color: Rgb<u8>,
}

impl ColorAnchor {
    pub const fn new(threshold: f32, r: u8, g: u8, b: u8) -> Self {
        Self {
            threshold,
            color: Rgb([r, g, b]),
        }
    }
}

/// Default anchors, from deep sentinel to glacier white.
pub const DEFAULT_ANCHORS: [ColorAnchor; 9] = [
    ColorAnchor::new(-1000.0, 0, 0, 0),
    ColorAnchor::new(0.0, 120, 170, 255),
    ColorAnchor::new(200.0, 240, 255, 200),
    ColorAnchor::new(350.0, 170, 255, 120),
    ColorAnchor::new(450.0, 170, 200, 50),
    ColorAnchor::new(600.0, 140, 160, 50),
    ColorAnchor::new(1000.0, 255, 200, 120),
    ColorAnchor::new(2000.0, 255, 240, 200),
    ColorAnchor::new(10000.0, 255, 255, 255),
];

/// Piecewise-linear height-to-color table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    anchors: Vec<ColorAnchor>,
}

impl Default for ColorMap {
    fn default() -> Self {
        Self {
            anchors: DEFAULT_ANCHORS.to_vec(),
        }
    }
}

impl ColorMap {
    /// Build a map from anchors.
    ///
    /// Returns `None` if there are fewer than two anchors or the thresholds
    /// are not strictly increasing.
    pub fn new(anchors: Vec<ColorAnchor>) -> Option<Self> {
        let increasing = anchors.windows(2).all(|w| w[0].threshold < w[1].threshold);
        (anchors.len() >= 2 && increasing).then_some(Self { anchors })
    }

    pub fn anchors(&self) -> &[ColorAnchor] {
        &self.anchors
    }

    /// Color for `height`, or `None` outside the table.
    pub fn color_for(&self, height: f32) -> Option<Rgb<u8>> {
        let upper = match self.anchors.iter().position(|a| a.threshold > height) {
            Some(0) => return None,
            Some(i) => i,
            None => {
                // Only the top anchor itself is still inside the table
                let top = self.anchors.last()?;
                return (height == top.threshold).then_some(top.color);
            }
        };
        let lo = &self.anchors[upper - 1];
        let hi = &self.anchors[upper];
        let t = ((height - lo.threshold) / (hi.threshold - lo.threshold)).clamp(0.0, 1.0);
        Some(lerp_rgb(lo.color, hi.color, t))
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Per-channel linear interpolation, truncated towards zero.
pub fn lerp_rgb(a: Rgb<u8>, b: Rgb<u8>, t: f32) -> Rgb<u8> {
    Rgb([
        lerp(a[0] as f32, b[0] as f32, t) as u8,
        lerp(a[1] as f32, b[1] as f32, t) as u8,
        lerp(a[2] as f32, b[2] as f32, t) as u8,
    ])
}

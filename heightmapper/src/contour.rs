//! Contour line detection.
//!
//! Heights are split into bands of `spacing` metres. A cell whose four
//! corners do not all fall into the same band is crossed by a contour line.

/// Band index of `height` for lines every `spacing` metres.
pub fn band(height: f32, spacing: f32) -> i64 {
    (height / spacing).floor() as i64
}

/// Classifies grid cells as contour line or fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourClassifier {
    spacing: f32,
}

impl ContourClassifier {
    /// Create a classifier with lines every `spacing` metres.
    ///
    /// Returns `None` unless `spacing` is positive and finite.
    pub fn new(spacing: f32) -> Option<Self> {
        (spacing.is_finite() && spacing > 0.0).then_some(Self { spacing })
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Returns `true` if the cell with these corner heights is on a line.
    pub fn is_boundary(&self, corners: [f32; 4]) -> bool {
        let first = band(corners[0], self.spacing);
        corners[1..].iter().any(|&h| band(h, self.spacing) != first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band() {
        assert_eq!(band(0.0, 10.0), 0);
        assert_eq!(band(9.99, 10.0), 0);
        assert_eq!(band(10.0, 10.0), 1);
        assert_eq!(band(512.0, 22.5), 22);
        assert_eq!(band(-0.5, 10.0), -1);
    }

    #[test]
    fn test_equal_corners_never_boundary() {
        let classifier = ContourClassifier::new(10.0).unwrap();
        for h in [-15.0, 0.0, 10.0, 349.9, 1234.5] {
            assert!(!classifier.is_boundary([h; 4]));
        }
    }

    #[test]
    fn test_same_band_is_not_boundary() {
        let classifier = ContourClassifier::new(25.0).unwrap();
        assert!(!classifier.is_boundary([500.0, 501.0, 510.0, 524.9]));
    }

    #[test]
    fn test_single_differing_corner_is_boundary() {
        let classifier = ContourClassifier::new(10.0).unwrap();
        for i in 0..4 {
            let mut corners = [100.0; 4];
            corners[i] = 150.0;
            assert!(classifier.is_boundary(corners), "corner {}", i);
        }
    }

    #[test]
    fn test_invalid_spacing() {
        assert!(ContourClassifier::new(0.0).is_none());
        assert!(ContourClassifier::new(-5.0).is_none());
        assert!(ContourClassifier::new(f32::NAN).is_none());
        assert_eq!(ContourClassifier::new(22.5).unwrap().spacing(), 22.5);
    }
}

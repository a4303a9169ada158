use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// An affine transformation `(a, b, c, d)` mapping `(x, y)` to
/// `(scale * (a * x + b), scale * (c * y + d))`.
///
/// [`Transformation::untransform`] is the exact inverse as long as `a` and `c`
/// are non-zero. Degenerate coefficients are not guarded against; the result
/// of untransforming with `a == 0` or `c == 0` is unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Transformation {
    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    /// The identity-like transformation used by planar CRSs with a flipped y axis
    pub const fn flip_y() -> Self {
        Self::new(1.0, 0.0, -1.0, 0.0)
    }

    /// Applies the transformation at the given scale
    ///
    /// A scale of `None` or exactly `0.0` is treated as `1.0`. A zero scale
    /// could also mean "collapse to the origin", so this may be a latent bug;
    /// callers should not rely on either reading.
    pub fn transform(&self, point: &Point, scale: Option<f64>) -> Point {
        let scale = effective_scale(scale);
        Point::new(
            scale * (self.a * point.x + self.b),
            scale * (self.c * point.y + self.d),
        )
    }

    /// Reverse of [`Transformation::transform`], with the same scale rules
    pub fn untransform(&self, point: &Point, scale: Option<f64>) -> Point {
        let scale = effective_scale(scale);
        Point::new(
            (point.x / scale - self.b) / self.a,
            (point.y / scale - self.d) / self.c,
        )
    }
}

impl Default for Transformation {
    fn default() -> Self {
        Self::new(1.0, 0.0, 1.0, 0.0)
    }
}

impl From<[f64; 4]> for Transformation {
    fn from([a, b, c, d]: [f64; 4]) -> Self {
        Self::new(a, b, c, d)
    }
}

fn effective_scale(scale: Option<f64>) -> f64 {
    match scale {
        Some(s) if s != 0.0 => s,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform() {
        let t = Transformation::new(1.0, 2.0, 3.0, 4.0);
        let p = t.transform(&Point::new(10.0, 20.0), Some(2.0));
        assert_eq!(p, Point::new(24.0, 128.0));
    }

    #[test]
    fn test_untransform_is_inverse() {
        let t = Transformation::new(0.5, 0.5, -0.5, 0.5);
        let original = Point::new(123.25, -45.5);
        for scale in [None, Some(1.0), Some(256.0), Some(1024.0)] {
            let back = t.untransform(&t.transform(&original, scale), scale);
            assert!((back.x - original.x).abs() < 1e-9);
            assert!((back.y - original.y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_scale_means_one() {
        let t = Transformation::new(2.0, 1.0, 2.0, 1.0);
        let p = Point::new(3.0, 4.0);
        assert_eq!(t.transform(&p, Some(0.0)), t.transform(&p, None));
        assert_eq!(t.transform(&p, Some(0.0)), Point::new(7.0, 9.0));
    }
}

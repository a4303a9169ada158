use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Represents an axis-aligned rectangle in pixel coordinates
///
/// Once non-empty, `min.x <= max.x` and `min.y <= max.y` always hold. An empty
/// bounds (see [`Bounds::empty`]) has no meaningful corners until the first
/// [`Bounds::extend`]; [`Bounds::is_valid`] reports `false` for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Creates the bounds covering two corner points, in any order
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    /// Creates the smallest bounds covering all points (empty for an empty slice)
    pub fn from_points(points: &[Point]) -> Self {
        let mut bounds = Self::empty();
        for point in points {
            bounds.extend(point);
        }
        bounds
    }

    /// Creates empty bounds (invalid bounds that can be extended)
    pub fn empty() -> Self {
        Self {
            min: Point::new(f64::INFINITY, f64::INFINITY),
            max: Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Extends the bounds to include a point
    pub fn extend(&mut self, point: &Point) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// Extends the bounds to include another bounds
    pub fn extend_bounds(&mut self, other: &Bounds) {
        if !other.is_valid() {
            return;
        }
        self.extend(&other.min);
        self.extend(&other.max);
    }

    /// Gets the width of the bounds
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Gets the height of the bounds
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Gets the size as a Point
    pub fn size(&self) -> Point {
        Point::new(self.width(), self.height())
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.min.x, self.max.y)
    }

    pub fn top_right(&self) -> Point {
        Point::new(self.max.x, self.min.y)
    }

    pub fn top_left(&self) -> Point {
        self.min
    }

    pub fn bottom_right(&self) -> Point {
        self.max
    }

    /// Checks if the bounds contain a point (edges included)
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Checks if the bounds fully contain another bounds
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        other.min.x >= self.min.x
            && other.max.x <= self.max.x
            && other.min.y >= self.min.y
            && other.max.y <= self.max.y
    }

    /// Checks if the bounds intersect with another bounds (touching counts)
    pub fn intersects(&self, other: &Bounds) -> bool {
        other.max.x >= self.min.x
            && other.min.x <= self.max.x
            && other.max.y >= self.min.y
            && other.min.y <= self.max.y
    }

    /// Checks if the bounds share an area with another bounds (touching does not count)
    pub fn overlaps(&self, other: &Bounds) -> bool {
        other.max.x > self.min.x
            && other.min.x < self.max.x
            && other.max.y > self.min.y
            && other.min.y < self.max.y
    }

    /// Gets the intersection of two bounds
    pub fn intersection(&self, other: &Bounds) -> Option<Bounds> {
        if !self.intersects(other) {
            return None;
        }

        Some(Bounds::new(
            Point::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            Point::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        ))
    }

    /// Returns bounds grown by `buffer_ratio` of the current size on each side
    /// (negative ratios shrink)
    pub fn pad(&self, buffer_ratio: f64) -> Bounds {
        let height_buffer = (self.min.y - self.max.y).abs() * buffer_ratio;
        let width_buffer = (self.min.x - self.max.x).abs() * buffer_ratio;

        Bounds::new(
            Point::new(self.min.x - width_buffer, self.min.y - height_buffer),
            Point::new(self.max.x + width_buffer, self.max.y + height_buffer),
        )
    }

    /// Returns a new bounds expanded by the given amount of pixels on each side
    pub fn padded(&self, amount: f64) -> Bounds {
        let offset = Point::new(amount, amount);
        Bounds {
            min: self.min.subtract(&offset),
            max: self.max.add(&offset),
        }
    }

    /// Checks if the bounds are valid (min <= max)
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    /// Exact corner comparison
    pub fn equals(&self, other: &Bounds) -> bool {
        self.min == other.min && self.max == other.max
    }

    /// Gets the area of the bounds
    pub fn area(&self) -> f64 {
        if !self.is_valid() {
            0.0
        } else {
            self.width() * self.height()
        }
    }

    /// Returns a new bounds that extends this bounds with another bounds
    pub fn extend_with(&self, other: &Bounds) -> Bounds {
        if !self.is_valid() {
            return *other;
        }
        let mut result = *self;
        result.extend_bounds(other);
        result
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_creation() {
        let bounds = Bounds::new(Point::new(10.0, 10.0), Point::new(40.0, 60.0));
        assert_eq!(bounds.min, Point::new(10.0, 10.0));
        assert_eq!(bounds.max, Point::new(40.0, 60.0));
        assert_eq!(bounds.size(), Point::new(30.0, 50.0));
        assert_eq!(bounds.center(), Point::new(25.0, 35.0));
    }

    #[test]
    fn test_bounds_corner_order_normalised() {
        let bounds = Bounds::new(Point::new(40.0, 10.0), Point::new(10.0, 60.0));
        assert_eq!(bounds.min, Point::new(10.0, 10.0));
        assert_eq!(bounds.max, Point::new(40.0, 60.0));
        assert_eq!(bounds.bottom_left(), Point::new(10.0, 60.0));
        assert_eq!(bounds.top_right(), Point::new(40.0, 10.0));
    }

    #[test]
    fn test_empty_bounds_extend() {
        let mut bounds = Bounds::empty();
        assert!(!bounds.is_valid());
        assert_eq!(bounds.area(), 0.0);

        bounds.extend(&Point::new(5.0, 7.0));
        assert!(bounds.is_valid());
        assert_eq!(bounds.min, Point::new(5.0, 7.0));
        assert_eq!(bounds.max, Point::new(5.0, 7.0));

        bounds.extend_bounds(&Bounds::empty());
        assert_eq!(bounds.max, Point::new(5.0, 7.0));
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = Bounds::from_coords(10.0, 20.0, 30.0, 40.0);
        assert!(bounds.contains(&Point::new(15.0, 25.0)));
        assert!(bounds.contains(&Point::new(10.0, 40.0)));
        assert!(!bounds.contains(&Point::new(5.0, 25.0)));
        assert!(bounds.contains_bounds(&Bounds::from_coords(12.0, 22.0, 28.0, 38.0)));
    }

    #[test]
    fn test_bounds_intersection() {
        let bounds1 = Bounds::from_coords(0.0, 0.0, 10.0, 10.0);
        let bounds2 = Bounds::from_coords(5.0, 5.0, 15.0, 15.0);

        let intersection = bounds1.intersection(&bounds2).unwrap();
        assert_eq!(intersection.min, Point::new(5.0, 5.0));
        assert_eq!(intersection.max, Point::new(10.0, 10.0));
    }

    #[test]
    fn test_bounds_touching() {
        let bounds1 = Bounds::from_coords(0.0, 0.0, 5.0, 5.0);
        let bounds2 = Bounds::from_coords(5.0, 0.0, 10.0, 5.0);

        assert!(bounds1.intersects(&bounds2));
        assert!(!bounds1.overlaps(&bounds2));
        assert!(Bounds::from_coords(10.0, 10.0, 15.0, 15.0)
            .intersection(&bounds1)
            .is_none());
    }

    #[test]
    fn test_bounds_pad() {
        let bounds = Bounds::from_coords(0.0, 0.0, 10.0, 20.0);
        let padded = bounds.pad(0.1);
        assert_eq!(padded.min, Point::new(-1.0, -2.0));
        assert_eq!(padded.max, Point::new(11.0, 22.0));
        assert_eq!(bounds.padded(3.0).min, Point::new(-3.0, -3.0));
    }
}

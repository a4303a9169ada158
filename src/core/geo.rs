use crate::core::constants::{EARTH_CIRCUMFERENCE, EARTH_MEAN_RADIUS, LAT_LNG_MARGIN};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Represents a geographical coordinate with latitude, longitude and optional altitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<f64>,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng, alt: None }
    }

    /// Creates a coordinate carrying an altitude
    pub fn with_alt(lat: f64, lng: f64, alt: f64) -> Self {
        Self {
            lat,
            lng,
            alt: Some(alt),
        }
    }

    /// Creates a coordinate, rejecting NaN components
    pub fn try_new(lat: f64, lng: f64) -> Result<Self> {
        if lat.is_nan() || lng.is_nan() {
            return Err(MapError::InvalidCoordinates(format!(
                "Invalid LatLng object: ({}, {})",
                lat, lng
            )));
        }
        Ok(Self::new(lat, lng))
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Returns `true` if both components are within the default margin of error
    pub fn equals(&self, other: &LatLng) -> bool {
        self.equals_within(other, LAT_LNG_MARGIN)
    }

    /// Returns `true` if the largest absolute component difference is at most `margin`
    pub fn equals_within(&self, other: &LatLng, margin: f64) -> bool {
        let max_margin = (self.lat - other.lat)
            .abs()
            .max((self.lng - other.lng).abs());
        max_margin <= margin
    }

    /// Calculates the great-circle distance in meters to another LatLng (haversine)
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        let rad = std::f64::consts::PI / 180.0;
        let lat1 = self.lat * rad;
        let lat2 = other.lat * rad;
        let sin_d_lat = ((other.lat - self.lat) * rad / 2.0).sin();
        let sin_d_lon = ((other.lng - self.lng) * rad / 2.0).sin();
        let a = sin_d_lat * sin_d_lat + lat1.cos() * lat2.cos() * sin_d_lon * sin_d_lon;
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_MEAN_RADIUS * c
    }

    /// Wraps the longitude into `[-180, 180)`
    pub fn wrap(&self) -> LatLng {
        crate::crs::Crs::earth().wrap_lat_lng(self)
    }

    /// Returns a square-ish bounds whose sides are `size_in_meters` long
    pub fn to_bounds(&self, size_in_meters: f64) -> LatLngBounds {
        let lat_accuracy = 180.0 * size_in_meters / EARTH_CIRCUMFERENCE;
        let lng_accuracy = lat_accuracy / (std::f64::consts::PI / 180.0 * self.lat).cos();

        LatLngBounds::new(
            LatLng::new(self.lat - lat_accuracy, self.lng - lng_accuracy),
            LatLng::new(self.lat + lat_accuracy, self.lng + lng_accuracy),
        )
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LatLng({:.6}, {:.6})", self.lat, self.lng)
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// Represents a point in screen or projected coordinates
///
/// Every operation returns a new value; the `*_mut` variants modify in place
/// and are meant for tight loops over projected rings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply_by(&self, num: f64) -> Point {
        Point::new(self.x * num, self.y * num)
    }

    pub fn divide_by(&self, num: f64) -> Point {
        Point::new(self.x / num, self.y / num)
    }

    /// Component-wise multiplication
    pub fn scale_by(&self, scale: &Point) -> Point {
        Point::new(self.x * scale.x, self.y * scale.y)
    }

    /// Component-wise division, the inverse of [`Point::scale_by`]
    pub fn unscale_by(&self, scale: &Point) -> Point {
        Point::new(self.x / scale.x, self.y / scale.y)
    }

    pub fn round(&self) -> Point {
        Point::new(self.x.round(), self.y.round())
    }

    pub fn floor(&self) -> Point {
        Point::new(self.x.floor(), self.y.floor())
    }

    pub fn ceil(&self) -> Point {
        Point::new(self.x.ceil(), self.y.ceil())
    }

    pub fn trunc(&self) -> Point {
        Point::new(self.x.trunc(), self.y.trunc())
    }

    pub fn round_mut(&mut self) {
        self.x = self.x.round();
        self.y = self.y.round();
    }

    pub fn floor_mut(&mut self) {
        self.x = self.x.floor();
        self.y = self.y.floor();
    }

    pub fn ceil_mut(&mut self) {
        self.x = self.x.ceil();
        self.y = self.y.ceil();
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        self.squared_distance_to(other).sqrt()
    }

    pub fn squared_distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Returns `true` if both absolute coordinates are within those of `other`
    pub fn contains(&self, other: &Point) -> bool {
        other.x.abs() <= self.x.abs() && other.y.abs() <= self.y.abs()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        self.multiply_by(rhs)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({}, {})", self.x, self.y)
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    /// Creates bounds from two corners, normalising them so that
    /// `south_west` really is the south-west corner
    pub fn new(corner1: LatLng, corner2: LatLng) -> Self {
        Self {
            south_west: LatLng::new(corner1.lat.min(corner2.lat), corner1.lng.min(corner2.lng)),
            north_east: LatLng::new(corner1.lat.max(corner2.lat), corner1.lng.max(corner2.lng)),
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Creates the smallest bounds covering all points, `None` for an empty slice
    pub fn from_points(points: &[LatLng]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self::new(*first, *first);
        for point in rest {
            bounds.extend(point);
        }
        Some(bounds)
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Checks if the bounds fully contain another bounds
    pub fn contains_bounds(&self, other: &LatLngBounds) -> bool {
        self.contains(&other.south_west) && self.contains(&other.north_east)
    }

    /// Checks if the bounds intersect with another bounds (touching counts)
    pub fn intersects(&self, other: &LatLngBounds) -> bool {
        let lat_intersects =
            other.north_east.lat >= self.south_west.lat && other.south_west.lat <= self.north_east.lat;
        let lng_intersects =
            other.north_east.lng >= self.south_west.lng && other.south_west.lng <= self.north_east.lng;
        lat_intersects && lng_intersects
    }

    /// Checks if the bounds share an area with another bounds (touching does not count)
    pub fn overlaps(&self, other: &LatLngBounds) -> bool {
        let lat_overlaps =
            other.north_east.lat > self.south_west.lat && other.south_west.lat < self.north_east.lat;
        let lng_overlaps =
            other.north_east.lng > self.south_west.lng && other.south_west.lng < self.north_east.lng;
        lat_overlaps && lng_overlaps
    }

    /// Extends the bounds to include a point
    pub fn extend(&mut self, point: &LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Extends the bounds to include another bounds
    pub fn extend_bounds(&mut self, other: &LatLngBounds) {
        self.extend(&other.south_west);
        self.extend(&other.north_east);
    }

    /// Returns bounds grown by `buffer_ratio` of the current height and width on each side
    pub fn pad(&self, buffer_ratio: f64) -> LatLngBounds {
        let height_buffer = (self.south_west.lat - self.north_east.lat).abs() * buffer_ratio;
        let width_buffer = (self.south_west.lng - self.north_east.lng).abs() * buffer_ratio;

        LatLngBounds::new(
            LatLng::new(
                self.south_west.lat - height_buffer,
                self.south_west.lng - width_buffer,
            ),
            LatLng::new(
                self.north_east.lat + height_buffer,
                self.north_east.lng + width_buffer,
            ),
        )
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    pub fn north_west(&self) -> LatLng {
        LatLng::new(self.north(), self.west())
    }

    pub fn south_east(&self) -> LatLng {
        LatLng::new(self.south(), self.east())
    }

    pub fn west(&self) -> f64 {
        self.south_west.lng
    }

    pub fn south(&self) -> f64 {
        self.south_west.lat
    }

    pub fn east(&self) -> f64 {
        self.north_east.lng
    }

    pub fn north(&self) -> f64 {
        self.north_east.lat
    }

    /// Gets the span of the bounds
    pub fn span(&self) -> LatLng {
        LatLng::new(
            self.north_east.lat - self.south_west.lat,
            self.north_east.lng - self.south_west.lng,
        )
    }

    /// Returns the union of this bounds with another bounds
    pub fn union(&self, other: &LatLngBounds) -> LatLngBounds {
        let mut result = *self;
        result.extend_bounds(other);
        result
    }

    /// Compares both corners with the given margin of error
    pub fn equals(&self, other: &LatLngBounds, margin: Option<f64>) -> bool {
        let margin = margin.unwrap_or(LAT_LNG_MARGIN);
        self.south_west.equals_within(&other.south_west, margin)
            && self.north_east.equals_within(&other.north_east, margin)
    }

    /// Checks that no corner is NaN and the corners are ordered
    pub fn is_valid(&self) -> bool {
        !self.south_west.lat.is_nan()
            && !self.south_west.lng.is_nan()
            && self.south_west.lat <= self.north_east.lat
            && self.south_west.lng <= self.north_east.lng
    }

    /// `west,south,east,north`, the format used by bbox query strings
    pub fn to_bbox_string(&self) -> String {
        format!(
            "{},{},{},{}",
            self.west(),
            self.south(),
            self.east(),
            self.north()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_creation() {
        let coord = LatLng::new(40.7128, -74.0060);
        assert_eq!(coord.lat, 40.7128);
        assert_eq!(coord.lng, -74.0060);
        assert!(coord.alt.is_none());
        assert!(coord.is_valid());
        assert!(LatLng::try_new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_lat_lng_equals_margin() {
        let a = LatLng::new(10.0, 20.0);
        assert!(a.equals(&LatLng::new(10.0 + 1e-10, 20.0 - 1e-10)));
        assert!(!a.equals(&LatLng::new(10.0, 20.0 + 1e-6)));
        assert!(a.equals_within(&LatLng::new(10.5, 20.5), 0.5));
    }

    #[test]
    fn test_lat_lng_distance() {
        let nyc = LatLng::new(40.7128, -74.0060);
        let la = LatLng::new(34.0522, -118.2437);
        let distance = nyc.distance_to(&la);

        // Distance should be approximately 3936 km on the mean-radius sphere
        assert!((distance - 3_936_000.0).abs() < 10_000.0);
    }

    #[test]
    fn test_lat_lng_wrap() {
        let wrapped = LatLng::new(0.0, 190.0).wrap();
        assert!((wrapped.lng + 170.0).abs() < 1e-9);
        assert_eq!(LatLng::new(0.0, 180.0).wrap().lng, -180.0);
    }

    #[test]
    fn test_point_ops() {
        let p = Point::new(1.5, -2.5);
        assert_eq!((&p).add(&Point::new(1.0, 1.0)), Point::new(2.5, -1.5));
        assert_eq!(p.subtract(&Point::new(0.5, 0.5)), Point::new(1.0, -3.0));
        assert_eq!(p.multiply_by(2.0), Point::new(3.0, -5.0));
        assert_eq!(p.floor(), Point::new(1.0, -3.0));
        assert_eq!(p.ceil(), Point::new(2.0, -2.0));
        assert_eq!(p.trunc(), Point::new(1.0, -2.0));
        assert_eq!(Point::new(3.0, 4.0).distance_to(&Point::default()), 5.0);

        let mut q = p;
        q.floor_mut();
        assert_eq!(q, Point::new(1.0, -3.0));
        // the original value is untouched
        assert_eq!(p, Point::new(1.5, -2.5));
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = LatLngBounds::from_coords(40.0, -75.0, 41.0, -73.0);
        let point_inside = LatLng::new(40.5, -74.0);
        let point_outside = LatLng::new(42.0, -74.0);

        assert!(bounds.contains(&point_inside));
        assert!(!bounds.contains(&point_outside));
    }

    #[test]
    fn test_bounds_pad_and_overlaps() {
        let bounds = LatLngBounds::from_coords(0.0, 0.0, 10.0, 20.0);
        let padded = bounds.pad(0.5);
        assert_eq!(padded.south_west, LatLng::new(-5.0, -10.0));
        assert_eq!(padded.north_east, LatLng::new(15.0, 30.0));

        let touching = LatLngBounds::from_coords(10.0, 20.0, 11.0, 21.0);
        assert!(bounds.intersects(&touching));
        assert!(!bounds.overlaps(&touching));
    }

    #[test]
    fn test_bounds_from_points() {
        assert!(LatLngBounds::from_points(&[]).is_none());
        let bounds = LatLngBounds::from_points(&[
            LatLng::new(1.0, 5.0),
            LatLng::new(-2.0, 3.0),
            LatLng::new(0.0, 9.0),
        ])
        .unwrap();
        assert_eq!(bounds.to_bbox_string(), "3,-2,9,1");
    }
}

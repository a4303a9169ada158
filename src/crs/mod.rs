//! Coordinate reference systems
//!
//! A [`Crs`] turns geographic coordinates into pixel coordinates at a given
//! zoom level. It composes a [`Projection`] (geographic to planar), a
//! [`Transformation`] (planar to unit pixel space) and a zoom scale function,
//! and adds longitude/latitude wrapping and a distance metric on top.

pub mod projection;

use crate::core::{
    bounds::Bounds,
    constants::{EARTH_MEAN_RADIUS, EARTH_RADIUS, TILE_SIZE},
    geo::{LatLng, LatLngBounds, Point},
    transformation::Transformation,
};
use crate::traits::CoordinateTransform;
use projection::{LonLat, Mercator, Projection, SphericalMercator};
use std::f64::consts::PI;
use std::sync::Arc;

/// How a zoom level maps to a pixel scale factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomScale {
    /// `256 * 2^zoom`: zoom 0 is one 256 px tile wide
    Tiled,
    /// `2^zoom`: one projected unit is one pixel at zoom 0
    Unit,
}

/// Distance metric between two geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistanceMetric {
    /// Great-circle distance on a sphere of the given radius, in metres
    Haversine { radius: f64 },
    /// Planar distance between `(lng, lat)` pairs
    Euclidean,
}

/// A coordinate reference system
///
/// Cloning is cheap; the projection is shared.
#[derive(Debug, Clone)]
pub struct Crs {
    code: Option<&'static str>,
    projection: Arc<dyn Projection>,
    transformation: Transformation,
    zoom_scale: ZoomScale,
    distance: DistanceMetric,
    /// No rectangle bounds the projected plane
    pub infinite: bool,
    /// Longitude wrapping range, half-open `[min, max)`
    pub wrap_lng: Option<(f64, f64)>,
    /// Latitude wrapping range, half-open `[min, max)`
    pub wrap_lat: Option<(f64, f64)>,
}

impl Crs {
    /// Builds a CRS with earth defaults: tiled zoom scale, haversine distance
    /// and longitude wrapping into `[-180, 180)`
    pub fn new(
        code: Option<&'static str>,
        projection: Arc<dyn Projection>,
        transformation: Transformation,
    ) -> Self {
        Self {
            code,
            projection,
            transformation,
            zoom_scale: ZoomScale::Tiled,
            distance: DistanceMetric::Haversine {
                radius: EARTH_MEAN_RADIUS,
            },
            infinite: false,
            wrap_lng: Some((-180.0, 180.0)),
            wrap_lat: None,
        }
    }

    /// Spherical (Web) Mercator, the default CRS of tiled web maps
    pub fn epsg3857() -> Self {
        let scale = 0.5 / (PI * EARTH_RADIUS);
        Self::new(
            Some("EPSG:3857"),
            Arc::new(SphericalMercator),
            Transformation::new(scale, 0.5, -scale, 0.5),
        )
    }

    /// Elliptical Mercator on the WGS84 ellipsoid
    pub fn epsg3395() -> Self {
        let scale = 0.5 / (PI * EARTH_RADIUS);
        Self::new(
            Some("EPSG:3395"),
            Arc::new(Mercator),
            Transformation::new(scale, 0.5, -scale, 0.5),
        )
    }

    /// Equirectangular WGS84; zoom 0 is two tiles wide
    pub fn epsg4326() -> Self {
        Self::new(
            Some("EPSG:4326"),
            Arc::new(LonLat),
            Transformation::new(1.0 / 180.0, 1.0, -1.0 / 180.0, 0.5),
        )
    }

    /// Flat plane where `lng` is x and `lat` is y; no wrapping, no bounds
    pub fn simple() -> Self {
        Self {
            code: None,
            projection: Arc::new(LonLat),
            transformation: Transformation::flip_y(),
            zoom_scale: ZoomScale::Unit,
            distance: DistanceMetric::Euclidean,
            infinite: true,
            wrap_lng: None,
            wrap_lat: None,
        }
    }

    /// The earth CRS used for wrapping and distances outside of any map
    pub fn earth() -> Self {
        Self::epsg3857()
    }

    pub fn with_wrap_lat(mut self, range: Option<(f64, f64)>) -> Self {
        self.wrap_lat = range;
        self
    }

    pub fn with_wrap_lng(mut self, range: Option<(f64, f64)>) -> Self {
        self.wrap_lng = range;
        self
    }

    pub fn code(&self) -> Option<&'static str> {
        self.code
    }

    pub fn projection(&self) -> &dyn Projection {
        self.projection.as_ref()
    }

    pub fn transformation(&self) -> &Transformation {
        &self.transformation
    }

    /// Whether distances are great-circle metres
    pub fn is_earth(&self) -> bool {
        matches!(self.distance, DistanceMetric::Haversine { .. })
    }

    /// Projects geographic coordinates to pixel coordinates at `zoom`
    pub fn lat_lng_to_point(&self, lat_lng: &LatLng, zoom: f64) -> Point {
        let projected = self.projection.project(lat_lng);
        self.transformation
            .transform(&projected, Some(self.scale(zoom)))
    }

    /// Inverse of [`Crs::lat_lng_to_point`]
    pub fn point_to_lat_lng(&self, point: &Point, zoom: f64) -> LatLng {
        let untransformed = self
            .transformation
            .untransform(point, Some(self.scale(zoom)));
        self.projection.unproject(&untransformed)
    }

    pub fn project(&self, lat_lng: &LatLng) -> Point {
        self.projection.project(lat_lng)
    }

    pub fn unproject(&self, point: &Point) -> LatLng {
        self.projection.unproject(point)
    }

    /// Pixel scale factor at `zoom`
    pub fn scale(&self, zoom: f64) -> f64 {
        match self.zoom_scale {
            ZoomScale::Tiled => TILE_SIZE * 2_f64.powf(zoom),
            ZoomScale::Unit => 2_f64.powf(zoom),
        }
    }

    /// Zoom level for a pixel scale factor; inverse of [`Crs::scale`]
    pub fn zoom(&self, scale: f64) -> f64 {
        match self.zoom_scale {
            ZoomScale::Tiled => (scale / TILE_SIZE).log2(),
            ZoomScale::Unit => scale.log2(),
        }
    }

    /// The pixel bounds of the whole projected world at `zoom`, `None` for
    /// infinite CRSs
    pub fn projected_bounds(&self, zoom: f64) -> Option<Bounds> {
        if self.infinite {
            return None;
        }

        let bounds = self.projection.bounds();
        let scale = Some(self.scale(zoom));
        let min = self.transformation.transform(&bounds.min, scale);
        let max = self.transformation.transform(&bounds.max, scale);
        Some(Bounds::new(min, max))
    }

    /// Distance between two coordinates, in metres for earth CRSs and in
    /// projected units for [`Crs::simple`]
    pub fn distance(&self, a: &LatLng, b: &LatLng) -> f64 {
        match self.distance {
            DistanceMetric::Haversine { radius } => {
                let rad = PI / 180.0;
                let lat1 = a.lat * rad;
                let lat2 = b.lat * rad;
                let sin_d_lat = ((b.lat - a.lat) * rad / 2.0).sin();
                let sin_d_lon = ((b.lng - a.lng) * rad / 2.0).sin();
                let h = sin_d_lat * sin_d_lat + lat1.cos() * lat2.cos() * sin_d_lon * sin_d_lon;
                let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
                radius * c
            }
            DistanceMetric::Euclidean => {
                let dx = b.lng - a.lng;
                let dy = b.lat - a.lat;
                (dx * dx + dy * dy).sqrt()
            }
        }
    }

    /// Wraps longitude (and latitude, if configured) into the CRS ranges
    ///
    /// Altitude is carried over untouched.
    pub fn wrap_lat_lng(&self, lat_lng: &LatLng) -> LatLng {
        let lng = match self.wrap_lng {
            Some(range) => wrap_num(lat_lng.lng, range),
            None => lat_lng.lng,
        };
        let lat = match self.wrap_lat {
            Some(range) => wrap_num(lat_lng.lat, range),
            None => lat_lng.lat,
        };

        LatLng {
            lat,
            lng,
            alt: lat_lng.alt,
        }
    }

    /// Shifts `bounds` so its center is wrapped; the size is preserved
    pub fn wrap_lat_lng_bounds(&self, bounds: &LatLngBounds) -> LatLngBounds {
        let center = bounds.center();
        let wrapped = self.wrap_lat_lng(&center);
        let lat_shift = center.lat - wrapped.lat;
        let lng_shift = center.lng - wrapped.lng;

        if lat_shift == 0.0 && lng_shift == 0.0 {
            return *bounds;
        }

        let sw = bounds.south_west;
        let ne = bounds.north_east;
        LatLngBounds::new(
            LatLng::new(sw.lat - lat_shift, sw.lng - lng_shift),
            LatLng::new(ne.lat - lat_shift, ne.lng - lng_shift),
        )
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::epsg3857()
    }
}

impl CoordinateTransform for Crs {
    fn lat_lng_to_point(&self, lat_lng: &LatLng, zoom: f64) -> Point {
        Crs::lat_lng_to_point(self, lat_lng, zoom)
    }

    fn point_to_lat_lng(&self, point: &Point, zoom: f64) -> LatLng {
        Crs::point_to_lat_lng(self, point, zoom)
    }

    fn scale(&self, zoom: f64) -> f64 {
        Crs::scale(self, zoom)
    }

    fn zoom(&self, scale: f64) -> f64 {
        Crs::zoom(self, scale)
    }
}

/// Floor-modulo wrap of `x` into the half-open range `[min, max)`
///
/// Values already in range come back unchanged. Rounding in the modulo can
/// land exactly on `max`; that result is folded back to `min`.
pub fn wrap_num(x: f64, (min, max): (f64, f64)) -> f64 {
    if x >= min && x < max {
        return x;
    }

    let wrapped = (x - min).rem_euclid(max - min) + min;
    if wrapped >= max {
        min
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_and_zoom() {
        let crs = Crs::epsg3857();
        assert_eq!(crs.scale(0.0), 256.0);
        assert_eq!(crs.scale(3.0), 2048.0);
        assert!((crs.zoom(2048.0) - 3.0).abs() < 1e-12);

        let simple = Crs::simple();
        assert_eq!(simple.scale(0.0), 1.0);
        assert_eq!(simple.scale(2.0), 4.0);
        assert!((simple.zoom(4.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_lat_lng_to_point_origin() {
        let crs = Crs::epsg3857();
        let p = crs.lat_lng_to_point(&LatLng::new(0.0, 0.0), 0.0);
        assert!((p.x - 128.0).abs() < 1e-9);
        assert!((p.y - 128.0).abs() < 1e-9);

        let corner = crs.lat_lng_to_point(&LatLng::new(85.0511287798, -180.0), 0.0);
        assert!(corner.x.abs() < 1e-6);
        assert!(corner.y.abs() < 1e-3);
    }

    #[test]
    fn test_point_to_lat_lng_mirrors() {
        for crs in [Crs::epsg3857(), Crs::epsg3395(), Crs::epsg4326(), Crs::simple()] {
            let lat_lng = LatLng::new(48.85, 2.35);
            let back = crs.point_to_lat_lng(&crs.lat_lng_to_point(&lat_lng, 5.0), 5.0);
            assert!(back.equals_within(&lat_lng, 1e-6), "{:?}", crs.code());
        }
    }

    #[test]
    fn test_epsg4326_world_is_two_tiles_wide() {
        let bounds = Crs::epsg4326().projected_bounds(0.0).unwrap();
        assert_eq!(bounds.size(), Point::new(512.0, 256.0));
    }

    #[test]
    fn test_projected_bounds_none_for_infinite() {
        assert!(Crs::simple().projected_bounds(0.0).is_none());
        let bounds = Crs::epsg3857().projected_bounds(1.0).unwrap();
        assert!((bounds.width() - 512.0).abs() < 1e-6);
    }

    #[test]
    fn test_wrap_num_half_open() {
        assert_eq!(wrap_num(190.0, (-180.0, 180.0)), -170.0);
        assert_eq!(wrap_num(-190.0, (-180.0, 180.0)), 170.0);
        assert_eq!(wrap_num(180.0, (-180.0, 180.0)), -180.0);
        assert_eq!(wrap_num(-180.0, (-180.0, 180.0)), -180.0);
        assert_eq!(wrap_num(540.0, (-180.0, 180.0)), -180.0);
    }

    #[test]
    fn test_wrap_num_keeps_values_near_the_edges() {
        let range = (-180.0, 180.0);
        let below_max = 179.999_999_999_999_97;
        assert_eq!(wrap_num(below_max, range), below_max);

        for x in [-180.000_000_000_000_03, -540.000_000_000_000_1, 539.999_999_999_999_9] {
            let wrapped = wrap_num(x, range);
            assert!((-180.0..180.0).contains(&wrapped), "{} wrapped to {}", x, wrapped);
            assert_eq!(wrap_num(wrapped, range), wrapped);
        }
    }

    #[test]
    fn test_wrap_lat_lng_idempotent() {
        let crs = Crs::epsg3857();
        for lng in [-725.0, -180.0, -0.5, 0.0, 179.9, 180.0, 359.0, 1000.0] {
            let once = crs.wrap_lat_lng(&LatLng::new(10.0, lng));
            let twice = crs.wrap_lat_lng(&once);
            assert_eq!(once, twice);
            assert!(once.lng >= -180.0 && once.lng < 180.0);
        }
    }

    #[test]
    fn test_wrap_lat_lng_keeps_alt_and_respects_ranges() {
        let crs = Crs::epsg4326().with_wrap_lat(Some((-90.0, 90.0)));
        let wrapped = crs.wrap_lat_lng(&LatLng::with_alt(100.0, 200.0, 12.0));
        assert_eq!(wrapped.lat, -80.0);
        assert_eq!(wrapped.lng, -160.0);
        assert_eq!(wrapped.alt, Some(12.0));

        let simple = Crs::simple();
        let untouched = LatLng::new(500.0, 500.0);
        assert_eq!(simple.wrap_lat_lng(&untouched), untouched);
    }

    #[test]
    fn test_wrap_lat_lng_bounds_shifts_center() {
        let crs = Crs::epsg3857();
        let bounds = LatLngBounds::new(LatLng::new(0.0, 190.0), LatLng::new(10.0, 200.0));
        let wrapped = crs.wrap_lat_lng_bounds(&bounds);
        assert!((wrapped.west() + 170.0).abs() < 1e-9);
        assert!((wrapped.east() + 160.0).abs() < 1e-9);
        assert_eq!(wrapped.south(), 0.0);

        let inside = LatLngBounds::new(LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0));
        assert_eq!(crs.wrap_lat_lng_bounds(&inside), inside);
    }

    #[test]
    fn test_distance() {
        let crs = Crs::epsg3857();
        let d = crs.distance(&LatLng::new(0.0, 0.0), &LatLng::new(0.0, 1.0));
        assert!((d - 111_194.9).abs() < 1.0);

        let simple = Crs::simple();
        assert_eq!(
            simple.distance(&LatLng::new(0.0, 0.0), &LatLng::new(3.0, 4.0)),
            5.0
        );
    }
}

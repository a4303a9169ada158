//! Geographic-to-planar projections.
//!
//! A projection is a pure mapping between [`LatLng`] and planar "projected"
//! coordinates. It knows nothing about zoom levels or pixels; that is the job
//! of the [`Crs`](crate::crs::Crs) that wraps it.

use crate::core::{
    bounds::Bounds,
    constants::{
        EARTH_RADIUS, EARTH_RADIUS_MINOR, MAX_LATITUDE, MERCATOR_CONVERGENCE,
        MERCATOR_MAX_ITERATIONS,
    },
    geo::{LatLng, Point},
};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use std::fmt;

/// Geographic <-> planar coordinate mapping
///
/// `unproject(project(p))` must return `p` within floating-point tolerance for
/// every `p` inside the projection's valid domain.
pub trait Projection: fmt::Debug + Send + Sync {
    /// Projects geographic coordinates into planar coordinates
    fn project(&self, lat_lng: &LatLng) -> Point;

    /// Inverse of [`Projection::project`]
    fn unproject(&self, point: &Point) -> LatLng;

    /// The planar extent of the valid domain
    fn bounds(&self) -> Bounds;
}

/// Equirectangular projection: `x = lng`, `y = lat`
///
/// Used by EPSG:4326 and by the planar "simple" CRS.
#[derive(Debug, Clone, Copy, Default)]
pub struct LonLat;

impl Projection for LonLat {
    fn project(&self, lat_lng: &LatLng) -> Point {
        Point::new(lat_lng.lng, lat_lng.lat)
    }

    fn unproject(&self, point: &Point) -> LatLng {
        LatLng::new(point.y, point.x)
    }

    fn bounds(&self) -> Bounds {
        Bounds::from_coords(-180.0, -90.0, 180.0, 90.0)
    }
}

/// Spherical (Web) Mercator, EPSG:3857
///
/// Latitudes are clamped to +-[`MAX_LATITUDE`] before projecting, which is
/// where the square world of tiled web maps ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct SphericalMercator;

impl Projection for SphericalMercator {
    fn project(&self, lat_lng: &LatLng) -> Point {
        let d = PI / 180.0;
        let lat = lat_lng.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let sin = (lat * d).sin();

        Point::new(
            EARTH_RADIUS * lat_lng.lng * d,
            EARTH_RADIUS * ((1.0 + sin) / (1.0 - sin)).ln() / 2.0,
        )
    }

    fn unproject(&self, point: &Point) -> LatLng {
        let d = 180.0 / PI;

        LatLng::new(
            (2.0 * (point.y / EARTH_RADIUS).exp().atan() - FRAC_PI_2) * d,
            point.x * d / EARTH_RADIUS,
        )
    }

    fn bounds(&self) -> Bounds {
        let d = EARTH_RADIUS * PI;
        Bounds::from_coords(-d, -d, d, d)
    }
}

/// Elliptical Mercator on the WGS84 ellipsoid, EPSG:3395
#[derive(Debug, Clone, Copy, Default)]
pub struct Mercator;

impl Mercator {
    fn eccentricity() -> f64 {
        let tmp = EARTH_RADIUS_MINOR / EARTH_RADIUS;
        (1.0 - tmp * tmp).sqrt()
    }
}

impl Projection for Mercator {
    fn project(&self, lat_lng: &LatLng) -> Point {
        let d = PI / 180.0;
        let r = EARTH_RADIUS;
        let e = Self::eccentricity();
        let y = lat_lng.lat * d;
        let con = e * y.sin();

        let ts = (FRAC_PI_4 - y / 2.0).tan() / ((1.0 - con) / (1.0 + con)).powf(e / 2.0);
        let y = -r * ts.max(1e-10).ln();

        Point::new(lat_lng.lng * d * r, y)
    }

    fn unproject(&self, point: &Point) -> LatLng {
        let d = 180.0 / PI;
        let r = EARTH_RADIUS;
        let e = Self::eccentricity();
        let ts = (-point.y / r).exp();
        let mut phi = FRAC_PI_2 - 2.0 * ts.atan();

        let mut dphi: f64 = 0.1;
        let mut i = 0;
        while i < MERCATOR_MAX_ITERATIONS && dphi.abs() > MERCATOR_CONVERGENCE {
            let con = e * phi.sin();
            let con = ((1.0 - con) / (1.0 + con)).powf(e / 2.0);
            dphi = FRAC_PI_2 - 2.0 * (ts * con).atan() - phi;
            phi += dphi;
            i += 1;
        }

        LatLng::new(phi * d, point.x * d / r)
    }

    fn bounds(&self) -> Bounds {
        Bounds::from_coords(
            -20_037_508.342_79,
            -15_496_570.739_72,
            20_037_508.342_79,
            18_764_656.231_38,
        )
    }
}

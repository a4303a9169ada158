use crate::{
    core::{
        bounds::Bounds,
        constants::{DEFAULT_CIRCLE_MARKER_RADIUS, EARTH_MEAN_RADIUS},
        geo::{LatLng, LatLngBounds, Point},
    },
    layers::path::{PathGeometry, PathProperties, PathStyle, VectorPath},
    traits::MapView,
    MapError, Result,
};
use std::f64::consts::PI;

/// A circle with a fixed radius in pixels, whatever the zoom
#[derive(Debug, Clone)]
pub struct CircleMarker {
    properties: PathProperties,
    lat_lng: LatLng,
    radius: f64,
    /// Vertical radius when the projected shape is an ellipse
    radius_y: Option<f64>,
    point: Point,
    empty: bool,
}

impl CircleMarker {
    pub fn new(lat_lng: LatLng) -> Self {
        Self {
            properties: PathProperties::new(PathStyle::filled()),
            lat_lng,
            radius: DEFAULT_CIRCLE_MARKER_RADIUS,
            radius_y: None,
            point: Point::default(),
            empty: false,
        }
    }

    pub fn with_radius(mut self, radius: f64) -> Result<Self> {
        self.set_radius(radius)?;
        Ok(self)
    }

    pub fn with_style(mut self, style: PathStyle) -> Self {
        self.properties.style = style;
        self
    }

    pub fn lat_lng(&self) -> LatLng {
        self.lat_lng
    }

    pub fn set_lat_lng(&mut self, lat_lng: LatLng) {
        self.lat_lng = lat_lng;
    }

    /// Radius in pixels
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f64) -> Result<()> {
        check_radius(radius)?;
        self.radius = radius;
        Ok(())
    }

    /// Center in layer pixels, as of the last projection
    pub fn point(&self) -> Point {
        self.point
    }

    fn update_bounds(&mut self, renderer_tolerance: f64) {
        let r = self.radius;
        let r2 = self.radius_y.unwrap_or(r);
        let w = self.properties.style.click_tolerance(renderer_tolerance);
        let p = Point::new(r + w, r2 + w);

        self.properties.click_tolerance = w;
        self.properties.px_bounds = Some(Bounds::new(self.point - p, self.point + p));
    }
}

impl VectorPath for CircleMarker {
    impl_path_properties!(properties);

    fn project(&mut self, view: &dyn MapView, renderer_tolerance: f64) -> Result<()> {
        self.point = view.lat_lng_to_layer_point(&self.lat_lng);
        self.update_bounds(renderer_tolerance);
        Ok(())
    }

    fn update(&mut self, clip_bounds: &Bounds) -> Result<()> {
        self.empty = self.radius != 0.0
            && !self
                .properties
                .px_bounds
                .map_or(false, |px_bounds| clip_bounds.intersects(&px_bounds));
        Ok(())
    }

    fn geometry(&self) -> PathGeometry<'_> {
        PathGeometry::Circle {
            center: self.point,
            radius: self.radius,
            radius_y: self.radius_y.unwrap_or(self.radius),
            empty: self.empty,
        }
    }

    fn contains_point(&self, point: &Point) -> bool {
        point.distance_to(&self.point) <= self.radius + self.properties.click_tolerance
    }

    fn is_empty(&self) -> bool {
        false
    }
}

/// A circle with a radius in metres (projected units for planar CRSs)
///
/// On earth CRSs the projected shape can be an ellipse, so the pixel radius is
/// derived separately for each axis.
#[derive(Debug, Clone)]
pub struct Circle {
    marker: CircleMarker,
    radius_m: f64,
}

impl Circle {
    pub fn new(lat_lng: LatLng, radius_m: f64) -> Result<Self> {
        check_radius(radius_m)?;
        Ok(Self {
            marker: CircleMarker::new(lat_lng),
            radius_m,
        })
    }

    pub fn with_style(mut self, style: PathStyle) -> Self {
        self.marker.properties.style = style;
        self
    }

    pub fn lat_lng(&self) -> LatLng {
        self.marker.lat_lng
    }

    pub fn set_lat_lng(&mut self, lat_lng: LatLng) {
        self.marker.lat_lng = lat_lng;
    }

    /// Radius in metres
    pub fn radius(&self) -> f64 {
        self.radius_m
    }

    pub fn set_radius(&mut self, radius_m: f64) -> Result<()> {
        check_radius(radius_m)?;
        self.radius_m = radius_m;
        Ok(())
    }

    /// Horizontal and vertical radius in pixels, as of the last projection
    pub fn pixel_radii(&self) -> (f64, f64) {
        let r = self.marker.radius;
        (r, self.marker.radius_y.unwrap_or(r))
    }

    /// Geographic bounds of the projected circle
    pub fn bounds(&self, view: &dyn MapView) -> LatLngBounds {
        let (r, r2) = self.pixel_radii();
        let half = Point::new(r, r2);
        LatLngBounds::new(
            view.layer_point_to_lat_lng(&(self.marker.point - half)),
            view.layer_point_to_lat_lng(&(self.marker.point + half)),
        )
    }

    fn project_earth(&mut self, view: &dyn MapView) {
        let d = PI / 180.0;
        let LatLng { lat, lng, .. } = self.marker.lat_lng;

        let lat_r = (self.radius_m / EARTH_MEAN_RADIUS) / d;
        let top = view.project(&LatLng::new(lat + lat_r, lng), None);
        let bottom = view.project(&LatLng::new(lat - lat_r, lng), None);
        let p = (top + bottom).divide_by(2.0);
        let lat2 = view.unproject(&p, None).lat;

        let mut lng_r = (((lat_r * d).cos() - (lat * d).sin() * (lat2 * d).sin())
            / ((lat * d).cos() * (lat2 * d).cos()))
        .acos()
            / d;
        // Near the poles the formula above degenerates.
        if lng_r.is_nan() || lng_r == 0.0 {
            lng_r = lat_r / (d * lat).cos();
        }

        self.marker.point = p - view.pixel_origin();
        self.marker.radius = if lng_r.is_nan() {
            0.0
        } else {
            p.x - view.project(&LatLng::new(lat2, lng - lng_r), None).x
        };
        self.marker.radius_y = Some(p.y - top.y);
    }

    fn project_planar(&mut self, view: &dyn MapView) {
        let crs = view.crs();
        let lat_lng = self.marker.lat_lng;
        let edge = crs.unproject(&(crs.project(&lat_lng) - Point::new(self.radius_m, 0.0)));

        self.marker.point = view.lat_lng_to_layer_point(&lat_lng);
        self.marker.radius = self.marker.point.x - view.lat_lng_to_layer_point(&edge).x;
        self.marker.radius_y = None;
    }
}

fn check_radius(radius: f64) -> Result<()> {
    if radius.is_nan() {
        return Err(MapError::InvalidRadius(radius));
    }
    Ok(())
}

impl VectorPath for Circle {
    fn properties(&self) -> &PathProperties {
        &self.marker.properties
    }

    fn properties_mut(&mut self) -> &mut PathProperties {
        &mut self.marker.properties
    }

    fn project(&mut self, view: &dyn MapView, renderer_tolerance: f64) -> Result<()> {
        if view.crs().is_earth() {
            self.project_earth(view);
        } else {
            self.project_planar(view);
        }
        self.marker.update_bounds(renderer_tolerance);
        Ok(())
    }

    fn update(&mut self, clip_bounds: &Bounds) -> Result<()> {
        self.marker.update(clip_bounds)
    }

    fn geometry(&self) -> PathGeometry<'_> {
        self.marker.geometry()
    }

    fn contains_point(&self, point: &Point) -> bool {
        self.marker.contains_point(point)
    }

    fn is_empty(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::viewport::Viewport;
    use crate::crs::Crs;

    fn simple_view() -> Viewport {
        Viewport::new(Crs::simple(), LatLng::new(0.0, 0.0), 0.0, Point::new(200.0, 200.0))
    }

    #[test]
    fn test_marker_bounds_and_hit() {
        let mut marker = CircleMarker::new(LatLng::new(0.0, 0.0)).with_radius(5.0).unwrap();
        marker.project(&simple_view(), 0.0).unwrap();
        assert_eq!(marker.point(), Point::new(100.0, 100.0));
        assert_eq!(
            marker.px_bounds(),
            Some(Bounds::from_coords(93.5, 93.5, 106.5, 106.5))
        );
        assert!(marker.contains_point(&Point::new(106.5, 100.0)));
        assert!(!marker.contains_point(&Point::new(105.0, 105.0)));
    }

    #[test]
    fn test_marker_empty_off_surface() {
        let mut marker = CircleMarker::new(LatLng::new(0.0, 500.0));
        marker.project(&simple_view(), 0.0).unwrap();
        marker.update(&Bounds::from_coords(0.0, 0.0, 200.0, 200.0)).unwrap();
        assert!(matches!(marker.geometry(), PathGeometry::Circle { empty: true, .. }));

        let mut zero = CircleMarker::new(LatLng::new(0.0, 500.0)).with_radius(0.0).unwrap();
        zero.project(&simple_view(), 0.0).unwrap();
        zero.update(&Bounds::from_coords(0.0, 0.0, 200.0, 200.0)).unwrap();
        assert!(matches!(zero.geometry(), PathGeometry::Circle { empty: false, .. }));
    }

    #[test]
    fn test_marker_rejects_nan() {
        assert!(matches!(
            CircleMarker::new(LatLng::new(0.0, 0.0)).with_radius(f64::NAN),
            Err(MapError::InvalidRadius(_))
        ));
        let mut marker = CircleMarker::new(LatLng::new(0.0, 0.0));
        assert!(matches!(
            marker.set_radius(f64::NAN),
            Err(MapError::InvalidRadius(_))
        ));
        assert_eq!(marker.radius(), DEFAULT_CIRCLE_MARKER_RADIUS);
        marker.set_radius(4.0).unwrap();
        assert_eq!(marker.radius(), 4.0);
    }

    #[test]
    fn test_circle_rejects_nan() {
        assert!(matches!(
            Circle::new(LatLng::new(0.0, 0.0), f64::NAN),
            Err(MapError::InvalidRadius(_))
        ));
        let mut circle = Circle::new(LatLng::new(0.0, 0.0), 10.0).unwrap();
        assert!(circle.set_radius(f64::NAN).is_err());
        assert_eq!(circle.radius(), 10.0);
    }

    #[test]
    fn test_circle_planar_radius() {
        let mut circle = Circle::new(LatLng::new(0.0, 0.0), 20.0).unwrap();
        circle.project(&simple_view(), 0.0).unwrap();
        assert_eq!(circle.pixel_radii(), (20.0, 20.0));
    }

    #[test]
    fn test_circle_earth_radius_at_equator() {
        let view = Viewport::new(
            Crs::epsg3857(),
            LatLng::new(0.0, 0.0),
            10.0,
            Point::new(800.0, 600.0),
        );
        let mut circle = Circle::new(LatLng::new(0.0, 0.0), 1000.0).unwrap();
        circle.project(&view, 0.0).unwrap();

        // 1 km at zoom 10 on the equator is roughly 6.5 px.
        let (rx, ry) = circle.pixel_radii();
        let expected = 1000.0 / (2.0 * PI * 6_378_137.0) * 256.0 * 1024.0;
        assert!((rx - expected).abs() < 0.05, "rx = {}", rx);
        assert!((ry - expected).abs() < 0.05, "ry = {}", ry);
    }

    #[test]
    fn test_circle_earth_is_taller_towards_poles() {
        let view = Viewport::new(
            Crs::epsg3857(),
            LatLng::new(60.0, 0.0),
            10.0,
            Point::new(800.0, 600.0),
        );
        let mut circle = Circle::new(LatLng::new(60.0, 0.0), 1000.0).unwrap();
        circle.project(&view, 0.0).unwrap();
        let (rx, ry) = circle.pixel_radii();
        assert!(rx > 12.0 && ry > 12.0);
        assert!((rx - ry).abs() < 0.5);
    }
}

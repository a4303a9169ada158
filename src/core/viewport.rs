use crate::core::{
    bounds::Bounds,
    constants::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM},
    geo::{LatLng, LatLngBounds, Point},
};
use crate::crs::Crs;
use crate::traits::MapView;

/// Headless view state: center, zoom and screen dimensions over a [`Crs`]
///
/// Mirrors how an interactive map moves: [`Viewport::pan_by`] shifts the pane
/// and leaves the pixel origin alone, while [`Viewport::set_view`] resets the
/// pane and computes a fresh pixel origin.
#[derive(Debug, Clone)]
pub struct Viewport {
    crs: Crs,
    center: LatLng,
    zoom: f64,
    size: Point,
    pixel_origin: Point,
    pane_position: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(crs: Crs, center: LatLng, zoom: f64, size: Point) -> Self {
        let mut viewport = Self {
            crs,
            center,
            zoom,
            size,
            pixel_origin: Point::default(),
            pane_position: Point::default(),
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
        };
        viewport.reset_pixel_origin();
        viewport
    }

    /// Copies the current state of any view, keeping its pixel origin and pane
    pub fn from_view(view: &dyn MapView) -> Self {
        Self {
            crs: view.crs().clone(),
            center: view.center(),
            zoom: view.zoom(),
            size: view.size(),
            pixel_origin: view.pixel_origin(),
            pane_position: view.pane_position(),
            min_zoom: view.min_zoom(),
            max_zoom: view.max_zoom(),
        }
    }

    /// Moves to a new center and zoom without animation, resetting the pane
    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.center = center;
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        self.pane_position = Point::default();
        self.reset_pixel_origin();
        log::trace!("view reset to {} @ z{}", self.center, self.zoom);
    }

    /// Sets the zoom level around the current center, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        let center = self.center;
        self.set_view(center, zoom);
    }

    /// Pans the view by `offset` pixels; positive x moves the view east
    pub fn pan_by(&mut self, offset: Point) {
        self.pane_position = self.pane_position - offset;
        let center_layer_point = self.container_point_to_layer_point(&self.size.divide_by(2.0));
        self.center = self.layer_point_to_lat_lng(&center_layer_point);
    }

    /// Sets the viewport size, keeping the current center
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
        let center = self.center;
        self.set_view(center, self.zoom);
    }

    /// Sets the zoom limits
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    /// Projected pixel bounds of the visible area
    pub fn pixel_bounds(&self) -> Bounds {
        let top_left = self.project(&self.center, None).subtract(&self.size.divide_by(2.0));
        Bounds::new(top_left, top_left + self.size)
    }

    /// Geographic bounds of the visible area
    pub fn bounds(&self) -> LatLngBounds {
        let pixel_bounds = self.pixel_bounds();
        LatLngBounds::new(
            self.unproject(&pixel_bounds.bottom_left(), None),
            self.unproject(&pixel_bounds.top_right(), None),
        )
    }

    fn reset_pixel_origin(&mut self) {
        self.pixel_origin = self.new_pixel_origin(&self.center, self.zoom);
    }
}

impl MapView for Viewport {
    fn crs(&self) -> &Crs {
        &self.crs
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn center(&self) -> LatLng {
        self.center
    }

    fn size(&self) -> Point {
        self.size
    }

    fn pixel_origin(&self) -> Point {
        self.pixel_origin
    }

    fn pane_position(&self) -> Point {
        self.pane_position
    }

    fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    fn max_zoom(&self) -> f64 {
        self.max_zoom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(
            Crs::epsg3857(),
            LatLng::new(0.0, 0.0),
            2.0,
            Point::new(800.0, 600.0),
        )
    }

    #[test]
    fn test_center_maps_to_view_center() {
        let viewport = viewport();
        assert_eq!(viewport.pixel_origin(), Point::new(112.0, 212.0));
        let layer = viewport.lat_lng_to_layer_point(&LatLng::new(0.0, 0.0));
        assert_eq!(layer, Point::new(400.0, 300.0));
        assert_eq!(viewport.layer_point_to_container_point(&layer), layer);
    }

    #[test]
    fn test_layer_point_round_trip() {
        let viewport = viewport();
        let lat_lng = LatLng::new(20.0, 30.0);
        let layer = viewport.lat_lng_to_layer_point(&lat_lng);
        let back = viewport.layer_point_to_lat_lng(&layer);
        assert!(back.equals_within(&lat_lng, 0.5));
    }

    #[test]
    fn test_pan_keeps_pixel_origin() {
        let mut viewport = viewport();
        let origin = viewport.pixel_origin();
        viewport.pan_by(Point::new(100.0, 0.0));

        assert_eq!(viewport.pixel_origin(), origin);
        assert_eq!(viewport.pane_position(), Point::new(-100.0, 0.0));
        assert!(viewport.center().lng > 0.0);
        assert_eq!(
            viewport.container_point_to_layer_point(&Point::new(400.0, 300.0)),
            Point::new(500.0, 300.0)
        );
    }

    #[test]
    fn test_zoom_scale() {
        let viewport = viewport();
        assert_eq!(viewport.zoom_scale(3.0, None), 2.0);
        assert_eq!(viewport.zoom_scale(0.0, Some(2.0)), 0.25);
    }

    #[test]
    fn test_set_zoom_clamps() {
        let mut viewport = viewport();
        viewport.set_zoom(30.0);
        assert_eq!(viewport.zoom(), 18.0);
        viewport.set_zoom_limits(1.0, 5.0);
        assert_eq!(viewport.zoom(), 5.0);
    }

    #[test]
    fn test_from_view_keeps_zoom_limits() {
        let mut source = viewport();
        source.set_zoom_limits(1.0, 5.0);
        source.pan_by(Point::new(30.0, 0.0));

        let mut copy = Viewport::from_view(&source);
        assert_eq!((copy.min_zoom, copy.max_zoom), (1.0, 5.0));
        assert_eq!(copy.pane_position(), source.pane_position());
        copy.set_zoom(9.0);
        assert_eq!(copy.zoom(), 5.0);
    }

    #[test]
    fn test_bounds_contains_center() {
        let viewport = viewport();
        assert!(viewport.bounds().contains(&LatLng::new(0.0, 0.0)));
    }
}

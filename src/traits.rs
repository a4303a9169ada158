//! Shared trait abstractions
//!
//! [`MapView`] is the seam between the renderer and whatever owns the map
//! state; [`CoordinateTransform`] is the zoom-aware half of a CRS.

use crate::core::{
    bounds::Bounds,
    constants::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM},
    geo::{LatLng, LatLngBounds, Point},
};
use crate::crs::Crs;

/// Zoom-aware coordinate transformation between geographic and pixel space
pub trait CoordinateTransform {
    /// Transform geographic coordinates to pixel coordinates
    fn lat_lng_to_point(&self, lat_lng: &LatLng, zoom: f64) -> Point;

    /// Transform pixel coordinates to geographic coordinates
    fn point_to_lat_lng(&self, point: &Point, zoom: f64) -> LatLng;

    fn scale(&self, zoom: f64) -> f64;

    fn zoom(&self, scale: f64) -> f64;

    /// Get the pixel bounds covering a geographic bounds at a given zoom level
    fn transform_bounds(&self, bounds: &LatLngBounds, zoom: f64) -> Bounds {
        Bounds::new(
            self.lat_lng_to_point(&bounds.south_west, zoom),
            self.lat_lng_to_point(&bounds.north_east, zoom),
        )
    }
}

/// The view state a renderer needs from the map that hosts it
///
/// Three coordinate spaces are involved:
/// * projected pixels: [`Crs::lat_lng_to_point`] at some zoom;
/// * layer points: projected pixels relative to the pixel origin;
/// * container points: layer points shifted by the pane position, i.e. pixels
///   relative to the top-left corner of the visible view.
pub trait MapView {
    fn crs(&self) -> &Crs;

    fn zoom(&self) -> f64;

    fn center(&self) -> LatLng;

    /// View size in pixels
    fn size(&self) -> Point;

    /// Projected pixel position of the layer-space origin
    fn pixel_origin(&self) -> Point;

    fn min_zoom(&self) -> f64 {
        DEFAULT_MIN_ZOOM
    }

    fn max_zoom(&self) -> f64 {
        DEFAULT_MAX_ZOOM
    }

    /// Offset of the layer pane inside the container, changed by panning
    fn pane_position(&self) -> Point {
        Point::default()
    }

    /// Projects to pixel space at `zoom`, defaulting to the current zoom
    fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        self.crs()
            .lat_lng_to_point(lat_lng, zoom.unwrap_or_else(|| self.zoom()))
    }

    fn unproject(&self, point: &Point, zoom: Option<f64>) -> LatLng {
        self.crs()
            .point_to_lat_lng(point, zoom.unwrap_or_else(|| self.zoom()))
    }

    /// Rounded projected point relative to the pixel origin
    fn lat_lng_to_layer_point(&self, lat_lng: &LatLng) -> Point {
        self.project(lat_lng, None).round() - self.pixel_origin()
    }

    fn layer_point_to_lat_lng(&self, point: &Point) -> LatLng {
        self.unproject(&(*point + self.pixel_origin()), None)
    }

    fn container_point_to_layer_point(&self, point: &Point) -> Point {
        *point - self.pane_position()
    }

    fn layer_point_to_container_point(&self, point: &Point) -> Point {
        *point + self.pane_position()
    }

    /// Scale factor between two zoom levels, `from_zoom` defaulting to the
    /// current zoom
    fn zoom_scale(&self, to_zoom: f64, from_zoom: Option<f64>) -> f64 {
        let crs = self.crs();
        let from_zoom = from_zoom.unwrap_or_else(|| self.zoom());
        crs.scale(to_zoom) / crs.scale(from_zoom)
    }

    /// The pixel origin the view would have if centered on `center` at `zoom`
    fn new_pixel_origin(&self, center: &LatLng, zoom: f64) -> Point {
        let view_half = self.size().divide_by(2.0);
        (self.project(center, Some(zoom)) - view_half + self.pane_position()).round()
    }
}

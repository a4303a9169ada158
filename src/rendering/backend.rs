//! The seam between the renderer engine and a drawing surface

use crate::{
    core::{bounds::Bounds, geo::Point},
    layers::path::{PathGeometry, PathStyle, VectorPath},
    rendering::arena::PathId,
};

/// A drawing surface the renderer pushes path geometry into
///
/// Two families exist. Immediate-mode surfaces (canvas) keep no per-path
/// state: the engine accumulates dirty regions and repaints them on the next
/// frame, calling the `update_*` methods between [`begin_redraw`] and
/// [`end_redraw`]. Retained surfaces (SVG) keep one element per path which the
/// engine updates in place whenever the path changes.
///
/// [`begin_redraw`]: RenderBackend::begin_redraw
/// [`end_redraw`]: RenderBackend::end_redraw
pub trait RenderBackend {
    const IMMEDIATE: bool;

    /// Called once when a path is added, before it is first drawn
    fn init_path(&mut self, id: PathId, path: &dyn VectorPath);

    /// Makes the path part of the surface, on top of everything else
    fn add_path(&mut self, id: PathId);

    fn remove_path(&mut self, id: PathId);

    fn update_style(&mut self, id: PathId, style: &PathStyle);

    fn bring_to_front(&mut self, id: PathId);

    fn bring_to_back(&mut self, id: PathId);

    fn update_poly(&mut self, id: PathId, parts: &[Vec<Point>], closed: bool, style: &PathStyle);

    fn update_circle(
        &mut self,
        id: PathId,
        center: Point,
        radius: f64,
        radius_y: f64,
        empty: bool,
        style: &PathStyle,
    );

    /// Resizes and repositions the surface to cover `bounds` (layer pixels),
    /// clearing any zoom transform
    fn update_surface(&mut self, bounds: &Bounds);

    /// Applies a temporary scale-and-offset transform during a zoom animation
    fn set_transform(&mut self, offset: Point, scale: f64);

    /// Starts a repaint of `region`, or of the whole surface if `None`
    fn begin_redraw(&mut self, _region: Option<&Bounds>) {}

    fn end_redraw(&mut self) {}

    /// The renderer was removed from its map
    fn detach(&mut self);
}

/// Surfaces that can't rely on the platform for per-shape pointer events
///
/// The engine answers pointer queries for these itself, walking its paths from
/// the top down.
pub trait HitTestSurface: RenderBackend {}

/// Pushes a path's current geometry to the backend
pub fn draw_path<B: RenderBackend + ?Sized>(backend: &mut B, id: PathId, path: &dyn VectorPath) {
    match path.geometry() {
        PathGeometry::Poly { parts, closed } => backend.update_poly(id, parts, closed, path.style()),
        PathGeometry::Circle {
            center,
            radius,
            radius_y,
            empty,
        } => backend.update_circle(id, center, radius, radius_y, empty, path.style()),
    }
}

//! The incremental renderer
//!
//! [`Renderer`] owns the paths, their paint order and everything needed to
//! repaint as little as possible: projected pixel bounds, a dirty region and a
//! single pending frame request. The backend only ever sees draw calls.

use crate::{
    core::{
        bounds::Bounds,
        config::{RendererOptions, RendererProfile},
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    input::{
        events::{PathEvent, PointerEvent},
        hover::HoverTracker,
    },
    layers::path::{PathStyle, VectorPath},
    prelude::HashSet,
    rendering::{
        arena::Arena,
        backend::{draw_path, HitTestSurface, RenderBackend},
        dirty::DirtyRegion,
        draw_order::DrawOrder,
        frame::{FrameScheduler, ManualFrameScheduler},
    },
    spatial::index::PathIndex,
    traits::MapView,
    MapError, Result,
};
use instant::Instant;
use std::any::type_name;
use std::time::Duration;

pub use crate::rendering::arena::PathId;

/// What the renderer knows about the view it is attached to
#[derive(Debug, Clone)]
struct Attachment {
    /// Latest view state, refreshed on every notification
    view: Viewport,
    /// Surface bounds in layer pixels, as of the last settle
    bounds: Bounds,
    /// Center and zoom of the last settle; the zoom transform is relative to them
    center: LatLng,
    zoom: f64,
    /// Zoom and pixel origin the paths were last projected at
    projected_at: (f64, Point),
}

#[derive(Debug)]
enum RendererState {
    Detached,
    Attached(Attachment),
}

/// Draws vector paths onto a backend surface, repainting incrementally
///
/// The host forwards view notifications (`attach`, `on_move_end`, ...) and
/// delivers requested animation frames through [`Renderer::on_animation_frame`].
/// Mutations never paint synchronously on immediate-mode backends: they
/// extend the dirty region and request a frame.
#[derive(Debug)]
pub struct Renderer<B: RenderBackend> {
    backend: B,
    options: RendererOptions,
    paths: Arena<Box<dyn VectorPath>>,
    order: DrawOrder,
    index: PathIndex,
    dirty: DirtyRegion,
    frames: Box<dyn FrameScheduler>,
    hover: HoverTracker,
    animating_zoom: bool,
    state: RendererState,
}

impl<B: RenderBackend> Renderer<B> {
    pub fn new(backend: B) -> Self {
        Self::with_options(backend, RendererOptions::default())
    }

    pub fn with_profile(backend: B, profile: &RendererProfile) -> Self {
        Self::with_options(backend, profile.resolve())
    }

    pub fn with_options(backend: B, options: RendererOptions) -> Self {
        let throttle = Duration::from_millis(options.hover_throttle_ms);
        Self {
            backend,
            options,
            paths: Arena::new(),
            order: DrawOrder::new(),
            index: PathIndex::new(),
            dirty: DirtyRegion::new(),
            frames: Box::new(ManualFrameScheduler::new()),
            hover: HoverTracker::new(throttle),
            animating_zoom: false,
            state: RendererState::Detached,
        }
    }

    /// Replaces the frame scheduler; any pending request is dropped
    pub fn with_scheduler(mut self, frames: Box<dyn FrameScheduler>) -> Self {
        self.frames = frames;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn options(&self) -> &RendererOptions {
        &self.options
    }

    /// Changes options; when attached, paths are reprojected and redrawn
    pub fn set_options(&mut self, options: RendererOptions) -> Result<()> {
        self.hover
            .set_throttle(Duration::from_millis(options.hover_throttle_ms));
        self.options = options;

        if let Some(view) = self.view().cloned() {
            self.settle(&view, true)?;
        }
        Ok(())
    }

    pub fn frames(&self) -> &dyn FrameScheduler {
        self.frames.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.state, RendererState::Attached(_))
    }

    /// Surface bounds in layer pixels
    pub fn bounds(&self) -> Option<Bounds> {
        self.attachment().map(|attachment| attachment.bounds)
    }

    /// The renderer's own zoom, which lags the view's during a zoom animation
    pub fn zoom(&self) -> Option<f64> {
        self.attachment().map(|attachment| attachment.zoom)
    }

    pub fn center(&self) -> Option<LatLng> {
        self.attachment().map(|attachment| attachment.center)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains(&self, id: PathId) -> bool {
        self.paths.contains(id)
    }

    /// Paths bottom to top
    pub fn draw_order(&self) -> impl Iterator<Item = PathId> + '_ {
        self.order.iter()
    }

    pub fn path(&self, id: PathId) -> Option<&dyn VectorPath> {
        self.paths.get(id).map(|path| &**path)
    }

    /// The path as its concrete shape type
    pub fn path_as<T: VectorPath + 'static>(&self, id: PathId) -> Option<&T> {
        self.path(id)?.as_any().downcast_ref::<T>()
    }

    /// Pixel bounds as of the last projection
    pub fn px_bounds(&self, id: PathId) -> Option<Bounds> {
        self.path(id)?.px_bounds()
    }

    /// Region waiting for the next frame
    pub fn dirty_region(&self) -> Option<Bounds> {
        self.dirty.bounds()
    }

    pub fn hovered(&self) -> Option<PathId> {
        self.hover.hovered()
    }

    // --- view notifications ------------------------------------------------------------------

    /// Attaches to a view: sizes the surface, projects every path and paints
    pub fn attach(&mut self, view: &dyn MapView) -> Result<()> {
        let view = Viewport::from_view(view);
        let bounds = surface_bounds(&view, self.options.padding);
        self.state = RendererState::Attached(Attachment {
            bounds,
            center: view.center(),
            zoom: view.zoom(),
            projected_at: (view.zoom(), view.pixel_origin()),
            view,
        });
        log::debug!("renderer attached, surface {:?}", bounds);

        self.settle_current(true)
    }

    pub fn detach(&mut self) {
        if !self.is_attached() {
            return;
        }

        self.frames.cancel_frame();
        self.backend.detach();
        self.dirty.clear();
        self.hover.reset();
        self.animating_zoom = false;
        self.state = RendererState::Detached;
        log::debug!("renderer detached");
    }

    /// The view jumped without animation; pixel origin and zoom may both differ
    pub fn on_view_reset(&mut self, view: &dyn MapView) -> Result<()> {
        if !self.is_attached() {
            return Ok(());
        }
        self.settle(&Viewport::from_view(view), true)
    }

    /// Zoom changed mid-animation: transforms the surface toward the view's zoom
    pub fn on_zoom(&mut self, view: &dyn MapView) {
        self.update_transform(view, view.center(), view.zoom());
    }

    /// A zoom animation toward `center` and `zoom` started
    pub fn on_zoom_anim(&mut self, view: &dyn MapView, center: LatLng, zoom: f64) {
        if self.is_attached() {
            self.animating_zoom = true;
        }
        self.update_transform(view, center, zoom);
    }

    /// Zoom settled: reprojects every path at the new zoom
    pub fn on_zoom_end(&mut self, view: &dyn MapView) -> Result<()> {
        self.animating_zoom = false;
        let Some(attachment) = self.attachment_mut() else {
            return Ok(());
        };

        let view = Viewport::from_view(view);
        attachment.projected_at = (view.zoom(), view.pixel_origin());
        attachment.view = view.clone();
        self.project_all(&view)
    }

    /// The view is moving; clip bounds follow only in continuous mode
    pub fn on_move(&mut self, view: &dyn MapView) -> Result<()> {
        let Some(attachment) = self.attachment_mut() else {
            return Ok(());
        };
        attachment.view = Viewport::from_view(view);

        if self.options.continuous {
            self.on_move_end(view)?;
        }
        Ok(())
    }

    /// The view settled: refits the surface and re-clips every path
    ///
    /// Paths are reprojected only if the zoom or pixel origin changed since
    /// they were last projected.
    pub fn on_move_end(&mut self, view: &dyn MapView) -> Result<()> {
        let Some(attachment) = self.attachment() else {
            return Ok(());
        };

        let stale = attachment.projected_at != (view.zoom(), view.pixel_origin());
        if stale {
            log::debug!("view moved to z{} without a zoom end, reprojecting", view.zoom());
        }
        self.settle(&Viewport::from_view(view), stale)
    }

    /// Paints the dirty region if a frame was requested
    ///
    /// Returns whether anything was drawn.
    pub fn on_animation_frame(&mut self) -> bool {
        if !self.frames.take_frame() || !self.is_attached() {
            return false;
        }

        let region = self.dirty.take();
        self.redraw(region);
        true
    }

    // --- path mutations ----------------------------------------------------------------------

    /// Adds a path on top of all others
    pub fn add_path<P: VectorPath + 'static>(&mut self, path: P) -> Result<PathId> {
        self.add_boxed(Box::new(path))
    }

    pub fn add_boxed(&mut self, mut path: Box<dyn VectorPath>) -> Result<PathId> {
        if let Some(attachment) = self.attachment() {
            path.project(&attachment.view, self.options.tolerance)?;
            path.update(&attachment.bounds)?;
        }

        let id = self.paths.insert(path);
        self.order.push(id);

        if let Some(path) = self.paths.get(id) {
            self.backend.init_path(id, &**path);
            self.index.update(id, path.px_bounds());
        }
        self.backend.add_path(id);
        log::trace!("added {}", id);

        self.repaint_path(id, None);
        Ok(id)
    }

    /// Removes a path, returning it; the area it covered is repainted
    pub fn remove_path(&mut self, id: PathId) -> Result<Box<dyn VectorPath>> {
        let path = self.paths.remove(id).ok_or_else(|| unknown_path(id))?;

        self.order.remove(id);
        self.index.remove(id);
        self.hover.forget(id);
        self.backend.remove_path(id);
        log::trace!("removed {}", id);

        if B::IMMEDIATE && self.is_attached() {
            if let Some(bounds) = path.px_bounds() {
                self.dirty
                    .extend_path(&bounds, dirty_padding(path.style()));
                self.frames.request_frame();
            }
        }
        Ok(path)
    }

    pub fn set_style(&mut self, id: PathId, style: PathStyle) -> Result<()> {
        let path = self.paths.get_mut(id).ok_or_else(|| unknown_path(id))?;
        let old = dirty_area(&**path);

        path.set_style(style);
        self.backend.update_style(id, path.style());
        self.refresh_path(id, old)
    }

    /// Edits a path through its concrete type, then reprojects and repaints it
    ///
    /// ```ignore
    /// renderer.edit_path(id, |line: &mut Polyline| line.add_lat_lng(LatLng::new(1.0, 2.0)))?;
    /// ```
    pub fn edit_path<T, F, R>(&mut self, id: PathId, f: F) -> Result<R>
    where
        T: VectorPath + 'static,
        F: FnOnce(&mut T) -> R,
    {
        let path = self.paths.get_mut(id).ok_or_else(|| unknown_path(id))?;
        let old = dirty_area(&**path);

        let shape = path.as_any_mut().downcast_mut::<T>().ok_or_else(|| {
            MapError::UnknownPath(format!("{} is not a {}", id, type_name::<T>()))
        })?;
        let result = f(shape);

        self.backend.update_style(id, path.style());
        self.refresh_path(id, old)?;
        Ok(result)
    }

    pub fn bring_to_front(&mut self, id: PathId) -> Result<()> {
        if !self.paths.contains(id) {
            return Err(unknown_path(id));
        }
        if self.order.bring_to_front(id) {
            self.backend.bring_to_front(id);
            self.repaint_path(id, None);
        }
        Ok(())
    }

    pub fn bring_to_back(&mut self, id: PathId) -> Result<()> {
        if !self.paths.contains(id) {
            return Err(unknown_path(id));
        }
        if self.order.bring_to_back(id) {
            self.backend.bring_to_back(id);
            self.repaint_path(id, None);
        }
        Ok(())
    }

    // --- internals ---------------------------------------------------------------------------

    fn attachment(&self) -> Option<&Attachment> {
        match &self.state {
            RendererState::Attached(attachment) => Some(attachment),
            RendererState::Detached => None,
        }
    }

    fn attachment_mut(&mut self) -> Option<&mut Attachment> {
        match &mut self.state {
            RendererState::Attached(attachment) => Some(attachment),
            RendererState::Detached => None,
        }
    }

    fn view(&self) -> Option<&Viewport> {
        self.attachment().map(|attachment| &attachment.view)
    }

    fn settle_current(&mut self, reproject: bool) -> Result<()> {
        match self.view().cloned() {
            Some(view) => self.settle(&view, reproject),
            None => Ok(()),
        }
    }

    /// Refits the surface to `view`, optionally reprojects, then re-clips and
    /// repaints every path
    fn settle(&mut self, view: &Viewport, reproject: bool) -> Result<()> {
        let padding = self.options.padding;
        let Some(attachment) = self.attachment_mut() else {
            return Ok(());
        };

        let bounds = surface_bounds(view, padding);
        attachment.bounds = bounds;
        attachment.center = view.center();
        attachment.zoom = view.zoom();
        attachment.view = view.clone();
        if reproject {
            attachment.projected_at = (view.zoom(), view.pixel_origin());
        }

        self.backend.update_surface(&bounds);
        if reproject {
            self.project_all(view)?;
        }
        self.update_all(&bounds)
    }

    fn project_all(&mut self, view: &dyn MapView) -> Result<()> {
        let tolerance = self.options.tolerance;
        for (id, path) in self.paths.iter_mut() {
            path.project(view, tolerance)?;
            self.index.update(id, path.px_bounds());
        }
        log::trace!("projected {} paths at z{}", self.paths.len(), view.zoom());
        Ok(())
    }

    fn update_all(&mut self, bounds: &Bounds) -> Result<()> {
        for (_, path) in self.paths.iter_mut() {
            path.update(bounds)?;
        }

        if B::IMMEDIATE {
            // A full repaint covers whatever was pending.
            self.frames.cancel_frame();
            self.dirty.clear();
            self.redraw(None);
        } else {
            for id in self.order.iter() {
                if let Some(path) = self.paths.get(id) {
                    draw_path(&mut self.backend, id, &**path);
                }
            }
        }
        Ok(())
    }

    /// Reprojects one path after an edit and repaints its old and new area
    fn refresh_path(&mut self, id: PathId, old: Option<(Bounds, f64)>) -> Result<()> {
        let tolerance = self.options.tolerance;
        if let RendererState::Attached(attachment) = &self.state {
            let path = self.paths.get_mut(id).ok_or_else(|| unknown_path(id))?;
            path.project(&attachment.view, tolerance)?;
            path.update(&attachment.bounds)?;
            self.index.update(id, path.px_bounds());
        }

        self.repaint_path(id, old);
        Ok(())
    }

    /// Immediate mode: marks the path's old and current area dirty and asks
    /// for a frame. Retained mode: pushes the geometry now.
    fn repaint_path(&mut self, id: PathId, old: Option<(Bounds, f64)>) {
        if !self.is_attached() {
            return;
        }
        let Some(path) = self.paths.get(id) else {
            return;
        };

        if B::IMMEDIATE {
            if let Some((bounds, padding)) = old {
                self.dirty.extend_path(&bounds, padding);
            }
            if let Some((bounds, padding)) = dirty_area(&**path) {
                self.dirty.extend_path(&bounds, padding);
            }
            self.frames.request_frame();
        } else {
            draw_path(&mut self.backend, id, &**path);
        }
    }

    /// Clears and repaints `region`, or the whole surface
    fn redraw(&mut self, region: Option<Bounds>) {
        #[cfg(feature = "debug")]
        log::trace!("redraw {:?}", region);
        self.backend.begin_redraw(region.as_ref());

        for id in self.order.iter() {
            let Some(path) = self.paths.get(id) else {
                continue;
            };
            let visible = match (&region, path.px_bounds()) {
                (None, _) => true,
                (Some(region), Some(px_bounds)) => px_bounds.intersects(region),
                (Some(_), None) => false,
            };
            if visible {
                draw_path(&mut self.backend, id, &**path);
            }
        }

        self.backend.end_redraw();
    }

    fn update_transform(&mut self, view: &dyn MapView, center: LatLng, zoom: f64) {
        let Some(attachment) = self.attachment() else {
            return;
        };

        let scale = view.zoom_scale(zoom, Some(attachment.zoom));
        let view_half = view.size() * (0.5 + self.options.padding);
        let current_center = view.project(&attachment.center, Some(zoom));
        let offset =
            view_half * -scale + current_center - view.new_pixel_origin(&center, zoom);

        self.backend.set_transform(offset, scale);
    }
}

impl<B: HitTestSurface> Renderer<B> {
    /// Topmost interactive path containing a layer point
    pub fn hit_test(&self, layer_point: &Point) -> Option<PathId> {
        let candidates: HashSet<PathId> = self.index.at_point(layer_point).into_iter().collect();
        if candidates.is_empty() {
            return None;
        }

        self.order.iter_rev().find(|id| {
            candidates.contains(id)
                && self.paths.get(*id).map_or(false, |path| {
                    path.style().interactive && path.contains_point(layer_point)
                })
        })
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<PathEvent> {
        self.handle_pointer_at(event, Instant::now())
    }

    /// Resolves pointer input to path events, as of `now`
    pub fn handle_pointer_at(&mut self, event: PointerEvent, now: Instant) -> Vec<PathEvent> {
        let mut events = Vec::new();
        let Some(view) = self.view() else {
            return events;
        };

        match event {
            PointerEvent::Click { container_point } => {
                let layer_point = view.container_point_to_layer_point(&container_point);
                if let Some(id) = self.hit_test(&layer_point) {
                    events.push(PathEvent::Click(id));
                }
            }
            PointerEvent::Move { container_point } => {
                if self.animating_zoom {
                    return events;
                }
                let layer_point = view.container_point_to_layer_point(&container_point);
                if self.hover.should_test(now) {
                    let candidate = self.hit_test(&layer_point);
                    self.hover.update(candidate, &mut events);
                }
            }
            PointerEvent::Out => self.hover.mouse_out(&mut events),
        }

        events
    }
}

/// Surface bounds for `view`: the view grown by `padding` of its size per side
pub fn surface_bounds(view: &dyn MapView, padding: f64) -> Bounds {
    let size = view.size();
    let min = view
        .container_point_to_layer_point(&(size * -padding))
        .round();
    Bounds::new(min, (min + size * (1.0 + padding * 2.0)).round())
}

/// Pixels a path's bounds are grown by before being marked dirty
fn dirty_padding(style: &PathStyle) -> f64 {
    style.weight / 2.0 + 1.0
}

fn dirty_area(path: &dyn VectorPath) -> Option<(Bounds, f64)> {
    path.px_bounds()
        .map(|bounds| (bounds, dirty_padding(path.style())))
}

fn unknown_path(id: PathId) -> MapError {
    MapError::UnknownPath(id.to_string())
}

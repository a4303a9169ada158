use crate::{
    core::{bounds::Bounds, geo::Point},
    layers::path::{Color, FillRule, LineCap, LineJoin, PathStyle, VectorPath},
    rendering::{
        arena::PathId,
        backend::{HitTestSurface, RenderBackend},
    },
};
use fxhash::FxHashMap;
use serde::Serialize;

/// One 2D-context call, in layer pixels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    /// Clears a region, or the whole surface when `None`
    Clear(Option<Bounds>),
    Save,
    Restore,
    /// Restricts drawing to a region until the matching `Restore`
    Clip(Bounds),
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    ClosePath,
    /// Full ellipse with horizontal radius `radius`, vertical radius `radius * scale_y`
    Arc {
        center: Point,
        radius: f64,
        scale_y: f64,
    },
    Fill {
        color: Color,
        opacity: f64,
        rule: FillRule,
    },
    Stroke {
        color: Color,
        opacity: f64,
        width: f64,
        cap: LineCap,
        join: LineJoin,
        dash: Vec<f64>,
    },
}

/// Size, placement and transform of the canvas element
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasSurface {
    /// Layer-pixel position of the top-left corner
    pub position: Point,
    /// Backing-store size in device pixels
    pub width: f64,
    pub height: f64,
    /// Zoom animation transform: offset and scale
    pub transform: Option<(Point, f64)>,
}

/// Immediate-mode backend recording the calls a 2D canvas context would get
///
/// Nothing is retained per path except its parsed dash pattern; every repaint
/// is a fresh list of [`DrawCommand`]s.
#[derive(Debug)]
pub struct CanvasBackend {
    pixel_ratio: f64,
    surface: Option<CanvasSurface>,
    dash_patterns: FxHashMap<PathId, Vec<f64>>,
    commands: Vec<DrawCommand>,
    drawing: bool,
    frames: u64,
}

impl CanvasBackend {
    pub fn new() -> Self {
        Self::with_pixel_ratio(1.0)
    }

    /// Backing store scaled for high-density displays
    pub fn with_pixel_ratio(pixel_ratio: f64) -> Self {
        Self {
            pixel_ratio,
            surface: None,
            dash_patterns: FxHashMap::default(),
            commands: Vec::new(),
            drawing: false,
            frames: 0,
        }
    }

    pub fn surface(&self) -> Option<&CanvasSurface> {
        self.surface.as_ref()
    }

    /// Commands of the last repaint
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of repaints so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn fill_stroke(&mut self, id: PathId, style: &PathStyle) {
        if style.fill {
            self.commands.push(DrawCommand::Fill {
                color: style.effective_fill_color(),
                opacity: style.fill_opacity,
                rule: style.fill_rule,
            });
        }

        if style.stroke && style.weight != 0.0 {
            self.commands.push(DrawCommand::Stroke {
                color: style.color,
                opacity: style.opacity,
                width: style.weight,
                cap: style.line_cap,
                join: style.line_join,
                dash: self.dash_patterns.get(&id).cloned().unwrap_or_default(),
            });
        }
    }

    fn update_dash_pattern(&mut self, id: PathId, style: &PathStyle) {
        match style.dash_pattern() {
            Some(pattern) => {
                self.dash_patterns.insert(id, pattern);
            }
            None => {
                self.dash_patterns.remove(&id);
            }
        }
    }
}

impl Default for CanvasBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for CanvasBackend {
    const IMMEDIATE: bool = true;

    fn init_path(&mut self, id: PathId, path: &dyn VectorPath) {
        self.update_dash_pattern(id, path.style());
    }

    fn add_path(&mut self, _id: PathId) {}

    fn remove_path(&mut self, id: PathId) {
        self.dash_patterns.remove(&id);
    }

    fn update_style(&mut self, id: PathId, style: &PathStyle) {
        self.update_dash_pattern(id, style);
    }

    // Paint order lives in the engine; the next repaint picks it up.
    fn bring_to_front(&mut self, _id: PathId) {}

    fn bring_to_back(&mut self, _id: PathId) {}

    fn update_poly(&mut self, id: PathId, parts: &[Vec<Point>], closed: bool, style: &PathStyle) {
        if !self.drawing || parts.is_empty() {
            return;
        }

        self.commands.push(DrawCommand::BeginPath);
        for part in parts {
            for (i, point) in part.iter().enumerate() {
                self.commands.push(if i == 0 {
                    DrawCommand::MoveTo(*point)
                } else {
                    DrawCommand::LineTo(*point)
                });
            }
            if closed {
                self.commands.push(DrawCommand::ClosePath);
            }
        }

        self.fill_stroke(id, style);
    }

    fn update_circle(
        &mut self,
        id: PathId,
        center: Point,
        radius: f64,
        radius_y: f64,
        empty: bool,
        style: &PathStyle,
    ) {
        if !self.drawing || empty {
            return;
        }

        let r = radius.round().max(1.0);
        let scale_y = radius_y.round().max(1.0) / r;

        self.commands.push(DrawCommand::BeginPath);
        self.commands.push(DrawCommand::Arc {
            center,
            radius: r,
            scale_y,
        });
        self.fill_stroke(id, style);
    }

    fn update_surface(&mut self, bounds: &Bounds) {
        let size = bounds.size();
        self.surface = Some(CanvasSurface {
            position: bounds.min,
            width: size.x * self.pixel_ratio,
            height: size.y * self.pixel_ratio,
            transform: None,
        });
    }

    fn set_transform(&mut self, offset: Point, scale: f64) {
        if let Some(surface) = self.surface.as_mut() {
            surface.transform = Some((offset, scale));
        }
    }

    fn begin_redraw(&mut self, region: Option<&Bounds>) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(region.copied()));
        self.commands.push(DrawCommand::Save);
        if let Some(region) = region {
            self.commands.push(DrawCommand::Clip(*region));
        }
        self.drawing = true;
    }

    fn end_redraw(&mut self) {
        self.drawing = false;
        self.commands.push(DrawCommand::Restore);
        self.frames += 1;
    }

    fn detach(&mut self) {
        self.surface = None;
        self.commands.clear();
        self.drawing = false;
    }
}

impl HitTestSurface for CanvasBackend {}

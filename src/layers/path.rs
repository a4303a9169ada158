use crate::{
    core::{bounds::Bounds, geo::Point},
    traits::MapView,
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

/// RGBA color, written as `#rrggbb` (or `#rrggbbaa` when translucent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa`
    pub fn from_hex(hex: &str) -> Result<Self> {
        let invalid = || MapError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.is_ascii() {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            3 => {
                let expand = |i: usize| channel(&digits[i..=i].repeat(2));
                Ok(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 | 8 => {
                let a = if digits.len() == 8 {
                    channel(&digits[6..8])?
                } else {
                    255
                };
                Ok(Self::new(
                    channel(&digits[0..2])?,
                    channel(&digits[2..4])?,
                    channel(&digits[4..6])?,
                    a,
                ))
            }
            _ => Err(invalid()),
        }
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0x33, 0x88, 0xff)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

impl LineCap {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

impl LineJoin {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineJoin::Miter => "miter",
            LineJoin::Round => "round",
            LineJoin::Bevel => "bevel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillRule {
    EvenOdd,
    NonZero,
}

impl FillRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            FillRule::EvenOdd => "evenodd",
            FillRule::NonZero => "nonzero",
        }
    }
}

/// Stroke and fill options shared by every vector path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathStyle {
    /// Draw the outline
    pub stroke: bool,
    pub color: Color,
    /// Stroke width in pixels
    pub weight: f64,
    pub opacity: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    /// Dash pattern, e.g. `"5, 10"`
    pub dash_array: Option<String>,
    pub dash_offset: Option<String>,
    pub fill: bool,
    /// Falls back to `color`
    pub fill_color: Option<Color>,
    pub fill_opacity: f64,
    pub fill_rule: FillRule,
    /// Receives pointer events
    pub interactive: bool,
    pub class_name: Option<String>,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            stroke: true,
            color: Color::default(),
            weight: 3.0,
            opacity: 1.0,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            dash_array: None,
            dash_offset: None,
            fill: false,
            fill_color: None,
            fill_opacity: 0.2,
            fill_rule: FillRule::EvenOdd,
            interactive: true,
            class_name: None,
        }
    }
}

impl PathStyle {
    /// Default style of area shapes: same as a line, but filled
    pub fn filled() -> Self {
        Self {
            fill: true,
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_dash_array(mut self, dash_array: impl Into<String>) -> Self {
        self.dash_array = Some(dash_array.into());
        self
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn effective_fill_color(&self) -> Color {
        self.fill_color.unwrap_or(self.color)
    }

    /// The dash pattern as numbers; `None` if unset or any entry is not a number
    pub fn dash_pattern(&self) -> Option<Vec<f64>> {
        let dash_array = self.dash_array.as_deref()?;
        dash_array
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<f64>().ok())
            .collect()
    }

    /// Pixel radius around the geometry that still counts as a hit
    pub fn click_tolerance(&self, renderer_tolerance: f64) -> f64 {
        let half_stroke = if self.stroke { self.weight / 2.0 } else { 0.0 };
        half_stroke + renderer_tolerance
    }
}

/// State every vector path carries regardless of its shape
#[derive(Debug, Clone, Default)]
pub struct PathProperties {
    pub style: PathStyle,
    /// Projected bounds grown by the click tolerance; `None` until projected
    pub px_bounds: Option<Bounds>,
    pub click_tolerance: f64,
}

impl PathProperties {
    pub fn new(style: PathStyle) -> Self {
        Self {
            style,
            px_bounds: None,
            click_tolerance: 0.0,
        }
    }
}

/// What a backend needs to draw a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathGeometry<'a> {
    /// Clipped and simplified parts in layer pixels
    Poly { parts: &'a [Vec<Point>], closed: bool },
    /// A (possibly elliptical) circle; `empty` when it is off-surface
    Circle {
        center: Point,
        radius: f64,
        radius_y: f64,
        empty: bool,
    },
}

/// A shape the renderer can project, clip and hit-test
pub trait VectorPath: fmt::Debug {
    fn properties(&self) -> &PathProperties;

    fn properties_mut(&mut self) -> &mut PathProperties;

    fn style(&self) -> &PathStyle {
        &self.properties().style
    }

    fn set_style(&mut self, style: PathStyle) {
        self.properties_mut().style = style;
    }

    fn px_bounds(&self) -> Option<Bounds> {
        self.properties().px_bounds
    }

    /// Recomputes layer points for the view's current zoom and pixel origin
    fn project(&mut self, view: &dyn MapView, renderer_tolerance: f64) -> Result<()>;

    /// Clips (and simplifies) the projected geometry against the surface bounds
    fn update(&mut self, clip_bounds: &Bounds) -> Result<()>;

    fn geometry(&self) -> PathGeometry<'_>;

    /// Hit test in layer pixels
    fn contains_point(&self, point: &Point) -> bool;

    /// No geographic coordinates to draw
    fn is_empty(&self) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

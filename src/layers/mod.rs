//! Vector shapes drawn by a renderer.

#[macro_use]
pub mod macros;

pub mod circle_marker;
pub mod path;
pub mod polygon;
pub mod polyline;

pub use circle_marker::{Circle, CircleMarker};
pub use path::{Color, PathGeometry, PathStyle, VectorPath};
pub use polygon::Polygon;
pub use polyline::{Polyline, PolylineOptions};

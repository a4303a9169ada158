//! Incremental vector rendering
//!
//! [`engine::Renderer`] decides what to repaint and when; a [`RenderBackend`]
//! turns paths into draw calls. [`canvas::CanvasBackend`] repaints dirty
//! regions each frame, [`svg::SvgBackend`] keeps one element per path.

pub mod arena;
pub mod backend;
pub mod canvas;
pub mod dirty;
pub mod draw_order;
pub mod engine;
pub mod frame;
pub mod svg;

// Re-export main types
pub use backend::{HitTestSurface, RenderBackend};
pub use canvas::{CanvasBackend, DrawCommand};
pub use dirty::DirtyRegion;
pub use draw_order::DrawOrder;
pub use engine::{PathId, Renderer};
pub use frame::{FrameScheduler, ManualFrameScheduler};
pub use svg::{SvgBackend, SvgPathElement};

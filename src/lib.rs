//! # mapvec
//!
//! The projection and vector-rendering core of a Leaflet-style web map.
//!
//! The crate covers the coordinate-transform stack (points, bounds, affine
//! transformations, projections and coordinate reference systems), the
//! computational geometry used by vector shapes (simplification, clipping,
//! centroids) and an incremental renderer that turns projected shapes into
//! draw calls while tracking dirty regions and z-order across pans, zooms and
//! edits.
//!
//! The map object itself (center, zoom, pixel origin, gestures, tiles, UI) is
//! an external collaborator, reached through the [`traits::MapView`] trait.
//! [`core::viewport::Viewport`] is a minimal headless implementation of it.

pub mod core;
pub mod crs;
pub mod data;
pub mod geometry;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod spatial;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    bounds::Bounds,
    config::{RendererOptions, RendererProfile},
    geo::{LatLng, LatLngBounds, Point},
    transformation::Transformation,
    viewport::Viewport,
};

pub use crs::{
    projection::{LonLat, Mercator, Projection, SphericalMercator},
    Crs,
};

pub use layers::{
    circle_marker::{Circle, CircleMarker},
    path::{PathStyle, VectorPath},
    polygon::Polygon,
    polyline::Polyline,
};

pub use input::{PathEvent, PointerEvent};

pub use rendering::{
    canvas::CanvasBackend,
    engine::{PathId, Renderer},
    svg::SvgBackend,
};

pub use traits::{CoordinateTransform, MapView};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Invalid radius: {0}")]
    InvalidRadius(f64),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Empty coordinates: {0}")]
    EmptyCoordinates(String),

    #[error("Unknown path: {0}")]
    UnknownPath(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error type alias for convenience
pub type Error = MapError;

//! Prelude module for common mapvec types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use mapvec::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    config::{RendererOptions, RendererProfile},
    geo::{LatLng, LatLngBounds, Point},
    transformation::Transformation,
    viewport::Viewport,
};

pub use crate::crs::{
    projection::{LonLat, Mercator, Projection, SphericalMercator},
    Crs,
};

pub use crate::layers::{
    circle_marker::{Circle, CircleMarker},
    path::{Color, FillRule, LineCap, LineJoin, PathGeometry, PathStyle, VectorPath},
    polygon::Polygon,
    polyline::{Polyline, PolylineOptions},
};

pub use crate::rendering::{
    backend::{HitTestSurface, RenderBackend},
    canvas::{CanvasBackend, DrawCommand},
    engine::{PathId, Renderer},
    frame::{FrameScheduler, ManualFrameScheduler},
    svg::{SvgBackend, SvgPathElement},
};

pub use crate::input::{
    events::{PathEvent, PointerEvent},
    hover::HoverTracker,
};

pub use crate::traits::{CoordinateTransform, MapView};

pub use crate::{Error as MapError, Result};

pub use std::{sync::Arc, time::Duration};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet, FxHasher};

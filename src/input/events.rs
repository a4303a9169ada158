use crate::{core::geo::Point, rendering::arena::PathId};
use serde::{Deserialize, Serialize};

/// Pointer input delivered to a renderer's surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Pointer moved to a position relative to the map container
    Move { container_point: Point },
    Click { container_point: Point },
    /// Pointer left the surface
    Out,
}

/// Events emitted for individual paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathEvent {
    MouseOver(PathId),
    MouseOut(PathId),
    MouseMove(PathId),
    Click(PathId),
}

impl PathEvent {
    pub fn path(&self) -> PathId {
        match *self {
            PathEvent::MouseOver(id)
            | PathEvent::MouseOut(id)
            | PathEvent::MouseMove(id)
            | PathEvent::Click(id) => id,
        }
    }
}

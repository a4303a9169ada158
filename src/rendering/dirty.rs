use crate::core::{bounds::Bounds, geo::Point};

/// Union of the pixel areas that need repainting before the next frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DirtyRegion {
    bounds: Option<Bounds>,
}

impl DirtyRegion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a path's bounds dirty, grown by `padding` pixels on each side
    pub fn extend_path(&mut self, px_bounds: &Bounds, padding: f64) {
        self.extend(&px_bounds.padded(padding));
    }

    pub fn extend(&mut self, bounds: &Bounds) {
        match self.bounds.as_mut() {
            Some(dirty) => dirty.extend_bounds(bounds),
            None => self.bounds = Some(*bounds),
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// Empties the region, returning it snapped outward to whole pixels
    pub fn take(&mut self) -> Option<Bounds> {
        self.bounds.take().map(|bounds| {
            Bounds::new(
                Point::new(bounds.min.x.floor(), bounds.min.y.floor()),
                Point::new(bounds.max.x.ceil(), bounds.max.y.ceil()),
            )
        })
    }

    pub fn clear(&mut self) {
        self.bounds = None;
    }
}

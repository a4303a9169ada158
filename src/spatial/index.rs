use crate::{
    core::{bounds::Bounds, geo::Point},
    rendering::arena::PathId,
};
use fxhash::FxHashMap;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// A path's pixel bounds as stored in the R-tree
#[derive(Debug, Clone, Copy)]
pub struct IndexedPath {
    pub id: PathId,
    pub bounds: Bounds,
}

impl PartialEq for IndexedPath {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for IndexedPath {}

impl RTreeObject for IndexedPath {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        envelope_of(&self.bounds)
    }
}

impl PointDistance for IndexedPath {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        self.envelope().distance_2(point)
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        self.bounds.contains(&Point::new(point[0], point[1]))
    }
}

fn envelope_of(bounds: &Bounds) -> AABB<[f64; 2]> {
    AABB::from_corners([bounds.min.x, bounds.min.y], [bounds.max.x, bounds.max.y])
}

/// R-tree over the pixel bounds of a renderer's paths
///
/// Used to narrow hit tests and dirty-region redraws to candidate paths; the
/// renderer still decides the paint order.
#[derive(Debug, Default)]
pub struct PathIndex {
    rtree: RTree<IndexedPath>,
    entries: FxHashMap<PathId, Bounds>,
}

impl PathIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the bounds of `id`; `None` drops it from the index
    pub fn update(&mut self, id: PathId, bounds: Option<Bounds>) {
        self.remove(id);
        if let Some(bounds) = bounds {
            self.rtree.insert(IndexedPath { id, bounds });
            self.entries.insert(id, bounds);
        }
    }

    pub fn remove(&mut self, id: PathId) -> bool {
        match self.entries.remove(&id) {
            Some(bounds) => self.rtree.remove(&IndexedPath { id, bounds }).is_some(),
            None => false,
        }
    }

    /// Paths whose bounds contain `point`, in no particular order
    pub fn at_point(&self, point: &Point) -> Vec<PathId> {
        self.rtree
            .locate_all_at_point(&[point.x, point.y])
            .map(|item| item.id)
            .collect()
    }

    /// Paths whose bounds intersect `bounds`, in no particular order
    pub fn query(&self, bounds: &Bounds) -> Vec<PathId> {
        self.rtree
            .locate_in_envelope_intersecting(&envelope_of(bounds))
            .map(|item| item.id)
            .collect()
    }

    pub fn bounds_of(&self, id: PathId) -> Option<Bounds> {
        self.entries.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.rtree = RTree::new();
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::arena::Arena;

    #[test]
    fn test_update_and_query() {
        let mut arena = Arena::new();
        let a = arena.insert(());
        let b = arena.insert(());

        let mut index = PathIndex::new();
        index.update(a, Some(Bounds::from_coords(0.0, 0.0, 10.0, 10.0)));
        index.update(b, Some(Bounds::from_coords(5.0, 5.0, 20.0, 20.0)));
        assert_eq!(index.len(), 2);

        let mut hits = index.at_point(&Point::new(7.0, 7.0));
        hits.sort();
        assert_eq!(hits, vec![a, b]);
        assert_eq!(index.at_point(&Point::new(15.0, 15.0)), vec![b]);
        assert!(index.at_point(&Point::new(30.0, 30.0)).is_empty());

        assert_eq!(
            index.query(&Bounds::from_coords(-5.0, -5.0, 1.0, 1.0)),
            vec![a]
        );
    }

    #[test]
    fn test_update_replaces_and_removes() {
        let mut arena = Arena::new();
        let a = arena.insert(());

        let mut index = PathIndex::new();
        index.update(a, Some(Bounds::from_coords(0.0, 0.0, 10.0, 10.0)));
        index.update(a, Some(Bounds::from_coords(50.0, 50.0, 60.0, 60.0)));
        assert_eq!(index.len(), 1);
        assert!(index.at_point(&Point::new(5.0, 5.0)).is_empty());
        assert_eq!(index.at_point(&Point::new(55.0, 55.0)), vec![a]);

        index.update(a, None);
        assert!(index.is_empty());
        assert!(!index.remove(a));
    }
}

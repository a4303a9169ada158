//! Paint order of a renderer's paths
//!
//! A doubly linked list threaded through a vector indexed by the path's slot,
//! so appending, unlinking and moving to either end are all O(1).

use crate::rendering::arena::PathId;

#[derive(Debug, Clone, Copy)]
struct Link {
    id: PathId,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Paths in paint order: the first is drawn first (bottom), the last on top
#[derive(Debug, Default)]
pub struct DrawOrder {
    links: Vec<Option<Link>>,
    first: Option<usize>,
    last: Option<usize>,
    len: usize,
}

impl DrawOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, id: PathId) -> bool {
        self.slot(id).is_some()
    }

    /// Bottom-most path
    pub fn first(&self) -> Option<PathId> {
        self.first.and_then(|i| self.links[i]).map(|link| link.id)
    }

    /// Top-most path
    pub fn last(&self) -> Option<PathId> {
        self.last.and_then(|i| self.links[i]).map(|link| link.id)
    }

    /// Appends `id` on top; returns `false` if it is already linked
    pub fn push(&mut self, id: PathId) -> bool {
        if self.contains(id) {
            return false;
        }

        let index = id.index();
        if self.links.len() <= index {
            self.links.resize(index + 1, None);
        }

        self.links[index] = Some(Link {
            id,
            prev: self.last,
            next: None,
        });
        self.attach_last(index);
        self.len += 1;
        true
    }

    /// Unlinks `id`; returns `false` if it was not linked
    pub fn remove(&mut self, id: PathId) -> bool {
        let Some(index) = self.slot(id) else {
            return false;
        };

        self.unlink(index);
        self.links[index] = None;
        self.len -= 1;
        true
    }

    /// Moves `id` to the top; returns `false` if it was already there or absent
    pub fn bring_to_front(&mut self, id: PathId) -> bool {
        let Some(index) = self.slot(id) else {
            return false;
        };
        if self.last == Some(index) {
            return false;
        }

        self.unlink(index);
        self.set_links(index, self.last, None);
        self.attach_last(index);
        true
    }

    /// Moves `id` to the bottom; returns `false` if it was already there or absent
    pub fn bring_to_back(&mut self, id: PathId) -> bool {
        let Some(index) = self.slot(id) else {
            return false;
        };
        if self.first == Some(index) {
            return false;
        }

        self.unlink(index);
        self.set_links(index, None, self.first);
        match self.first {
            Some(first) => self.set_prev(first, Some(index)),
            None => self.last = Some(index),
        }
        self.first = Some(index);
        true
    }

    /// Bottom to top
    pub fn iter(&self) -> DrawOrderIter<'_> {
        DrawOrderIter {
            order: self,
            cursor: self.first,
            forward: true,
        }
    }

    /// Top to bottom
    pub fn iter_rev(&self) -> DrawOrderIter<'_> {
        DrawOrderIter {
            order: self,
            cursor: self.last,
            forward: false,
        }
    }

    pub fn clear(&mut self) {
        self.links.clear();
        self.first = None;
        self.last = None;
        self.len = 0;
    }

    fn slot(&self, id: PathId) -> Option<usize> {
        let index = id.index();
        match self.links.get(index) {
            Some(Some(link)) if link.id == id => Some(index),
            _ => None,
        }
    }

    fn attach_last(&mut self, index: usize) {
        match self.last {
            Some(last) => self.set_next(last, Some(index)),
            None => self.first = Some(index),
        }
        self.last = Some(index);
    }

    fn unlink(&mut self, index: usize) {
        let Some(link) = self.links[index] else {
            return;
        };

        match link.prev {
            Some(prev) => self.set_next(prev, link.next),
            None => self.first = link.next,
        }
        match link.next {
            Some(next) => self.set_prev(next, link.prev),
            None => self.last = link.prev,
        }
    }

    fn set_links(&mut self, index: usize, prev: Option<usize>, next: Option<usize>) {
        if let Some(link) = self.links[index].as_mut() {
            link.prev = prev;
            link.next = next;
        }
    }

    fn set_prev(&mut self, index: usize, prev: Option<usize>) {
        if let Some(link) = self.links[index].as_mut() {
            link.prev = prev;
        }
    }

    fn set_next(&mut self, index: usize, next: Option<usize>) {
        if let Some(link) = self.links[index].as_mut() {
            link.next = next;
        }
    }
}

pub struct DrawOrderIter<'a> {
    order: &'a DrawOrder,
    cursor: Option<usize>,
    forward: bool,
}

impl Iterator for DrawOrderIter<'_> {
    type Item = PathId;

    fn next(&mut self) -> Option<PathId> {
        let link = self.order.links[self.cursor?]?;
        self.cursor = if self.forward { link.next } else { link.prev };
        Some(link.id)
    }
}

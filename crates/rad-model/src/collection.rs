//! Identifier-indexed storage: a `Vec` arena plus an id→position map.

use std::collections::HashMap;

use rad_deck::{BoundaryCondition, Element, LoadCase, Material, Node, Property};

/// Entities addressable by an integer identifier.
pub trait Identified {
    fn id(&self) -> i32;
}

macro_rules! identified {
    ($($ty:ty),* $(,)?) => {
        $(impl Identified for $ty {
            fn id(&self) -> i32 {
                self.id
            }
        })*
    };
}

identified!(Node, Element, Material, Property, LoadCase, BoundaryCondition);

/// Insertion-ordered entities with O(1) lookup by id.
///
/// Duplicate ids are stored; the index points at the last one inserted.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
    index: HashMap<i32, usize>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Identified> Collection<T> {
    pub fn push(&mut self, item: T) {
        self.index.insert(item.id(), self.items.len());
        self.items.push(item);
    }

    pub fn get(&self, id: i32) -> Option<&T> {
        self.position(id).map(|pos| &self.items[pos])
    }

    pub fn get_mut(&mut self, id: i32) -> Option<&mut T> {
        self.position(id).map(|pos| &mut self.items[pos])
    }

    /// Storage position of the entity the index resolves `id` to.
    pub fn position(&self, id: i32) -> Option<usize> {
        self.index
            .get(&id)
            .copied()
            .filter(|pos| *pos < self.items.len())
    }

    pub fn contains(&self, id: i32) -> bool {
        self.position(id).is_some()
    }

    /// Removes the entity `id` resolves to and shifts every later position down by one.
    pub fn remove(&mut self, id: i32) -> Option<T> {
        let pos = self.index.remove(&id)?;
        let removed = self.items.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        // a shadowed duplicate becomes the live entity for this id
        if self.items.iter().any(|item| item.id() == id) {
            self.rebuild();
        }
        Some(removed)
    }

    /// Rebuilds the index from storage; the last occurrence of an id wins.
    pub fn rebuild(&mut self) {
        self.index.clear();
        for (pos, item) in self.items.iter().enumerate() {
            self.index.insert(item.id(), pos);
        }
    }

    /// First id that occurs more than once in storage.
    pub fn first_duplicate(&self) -> Option<i32> {
        let mut seen = std::collections::HashSet::with_capacity(self.items.len());
        self.items
            .iter()
            .map(Identified::id)
            .find(|id| !seen.insert(*id))
    }
}

impl<T> Collection<T> {
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn indexed_ids(&self) -> usize {
        self.index.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(ids: &[i32]) -> Collection<Node> {
        let mut c = Collection::default();
        for &id in ids {
            c.push(Node::new(id, id as f64, 0.0, 0.0));
        }
        c
    }

    #[test]
    fn lookup_after_push() {
        let c = nodes(&[10, 20, 30]);
        assert_eq!(c.get(20).map(|n| n.position[0]), Some(20.0));
        assert!(c.get(40).is_none());
        assert_eq!(c.position(30), Some(2));
    }

    #[test]
    fn remove_shifts_later_positions() {
        let mut c = nodes(&[10, 20, 30, 40]);
        let removed = c.remove(20).expect("present");
        assert_eq!(removed.id, 20);
        assert_eq!(c.position(10), Some(0));
        assert_eq!(c.position(30), Some(1));
        assert_eq!(c.position(40), Some(2));
        for id in [10, 30, 40] {
            assert_eq!(c.get(id).map(|n| n.id), Some(id));
        }
        assert!(c.remove(20).is_none());
    }

    #[test]
    fn duplicate_ids_last_write_wins() {
        let mut c = Collection::default();
        c.push(Node::new(1, 0.0, 0.0, 0.0));
        c.push(Node::new(1, 5.0, 0.0, 0.0));
        assert_eq!(c.len(), 2);
        assert_eq!(c.get(1).map(|n| n.position[0]), Some(5.0));
        assert_eq!(c.first_duplicate(), Some(1));

        c.remove(1);
        assert_eq!(c.get(1).map(|n| n.position[0]), Some(0.0));
        assert_eq!(c.first_duplicate(), None);
    }
}

//! The canonical ordered sequence of shapes.

use crate::shapes::{Shape, ShapeId};
use std::collections::HashMap;

/// Arena of shapes in paint order.
///
/// Shapes are only ever appended or replaced in place by [`ShapeStore::push`],
/// so an id keeps its slot for the life of the store. [`ShapeStore::clear`] is the only removal.
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    shapes: Vec<Shape>,
    index: HashMap<ShapeId, usize>,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a snapshot, keeping its order.
    pub fn from_shapes(shapes: impl IntoIterator<Item = Shape>) -> Self {
        let mut store = Self::new();
        for shape in shapes {
            store.push(shape);
        }
        store
    }

    /// Append a shape on top of everything else.
    ///
    /// A shape whose id is already present replaces the existing one in place.
    pub fn push(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        match self.index.get(&id) {
            Some(&slot) => self.shapes[slot] = shape,
            None => {
                self.index.insert(id, self.shapes.len());
                self.shapes.push(shape);
            }
        }
        id
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.index.get(&id).map(|&slot| &self.shapes[slot])
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.index.get(&id).map(|&slot| &mut self.shapes[slot])
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.index.contains_key(&id)
    }

    /// All shapes in paint order, soft-deleted ones included.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Shapes that should be drawn, bottom first.
    pub fn visible(&self) -> impl DoubleEndedIterator<Item = &Shape> {
        self.shapes.iter().filter(|s| !s.is_deleted())
    }

    /// Topmost visible shape matching `predicate`.
    pub fn topmost(&self, mut predicate: impl FnMut(&Shape) -> bool) -> Option<&Shape> {
        self.visible().rev().find(|s| predicate(s))
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
        self.index.clear();
    }

    /// Snapshot of the sequence, for persistence.
    pub fn to_vec(&self) -> Vec<Shape> {
        self.shapes.clone()
    }
}

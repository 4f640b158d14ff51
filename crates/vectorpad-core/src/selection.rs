//! The ordered set of selected shapes.
//!
//! Every mutation goes through the document so that a shape's `SELECT` tag
//! is set exactly while it is in the selection.

use crate::canvas::CanvasDocument;
use crate::shapes::{ShapeId, ShapeTag};

#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: Vec<ShapeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape. Returns `false` if it was already selected or does not exist.
    pub fn add(&mut self, doc: &mut CanvasDocument, id: ShapeId) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        let Some(shape) = doc.get_shape_mut(id) else {
            return false;
        };
        shape.tag_mut().insert(ShapeTag::SELECT);
        self.ids.push(id);
        true
    }

    pub fn remove(&mut self, doc: &mut CanvasDocument, id: ShapeId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&s| s != id);
        if let Some(shape) = doc.get_shape_mut(id) {
            shape.tag_mut().remove(ShapeTag::SELECT);
        }
        self.ids.len() != before
    }

    pub fn clear(&mut self, doc: &mut CanvasDocument) {
        for id in self.ids.drain(..) {
            if let Some(shape) = doc.get_shape_mut(id) {
                shape.tag_mut().remove(ShapeTag::SELECT);
            }
        }
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn first(&self) -> Option<ShapeId> {
        self.ids.first().copied()
    }

    /// The selected shape, if exactly one is selected.
    pub fn single(&self) -> Option<ShapeId> {
        match self.ids.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[ShapeId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.ids.iter().copied()
    }
}

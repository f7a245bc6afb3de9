//! Owning store for the element collection.
//!
//! The store is the only holder of the live collection. Other components
//! read borrowed slices and hand back replacement values.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::model::Element;

/// Element collection in insertion order. Insertion order breaks paint ties
/// within a category: later elements draw on top.
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: Vec<Element>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from decoded elements, dropping any that fail
    /// validation.
    pub fn from_elements(elements: Vec<Element>) -> Self {
        let mut store = Self::new();
        store.replace_all(elements);
        store
    }

    /// Fresh opaque element id.
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(|e| e.id.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Appends an element. An element whose id is already present replaces
    /// the existing one in place.
    pub fn insert(&mut self, element: Element) {
        if let Some(slot) = self.elements.iter_mut().find(|e| e.id == element.id) {
            *slot = element;
        } else {
            self.elements.push(element);
        }
    }

    /// Swaps in a replacement with the same id. Returns the previous value,
    /// or `None` when no element has that id.
    pub fn replace(&mut self, element: Element) -> Option<Element> {
        let slot = self.elements.iter_mut().find(|e| e.id == element.id)?;
        Some(std::mem::replace(slot, element))
    }

    pub fn remove(&mut self, id: &str) -> Option<Element> {
        let index = self.elements.iter().position(|e| e.id == id)?;
        Some(self.elements.remove(index))
    }

    /// Replaces the whole collection. Invalid elements are skipped.
    pub fn replace_all(&mut self, elements: Vec<Element>) {
        let total = elements.len();
        self.elements = elements
            .into_iter()
            .filter(|e| match e.validate() {
                Ok(()) => true,
                Err(err) => {
                    warn!("Dropping element {}: {}", e.id, err);
                    false
                }
            })
            .collect();
        debug!("Store replaced: {} of {} elements kept", self.elements.len(), total);
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }
}

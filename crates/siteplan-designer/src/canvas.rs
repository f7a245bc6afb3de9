//! Canvas state: the element collection, the selection and the viewport.

use crate::element_store::ElementStore;
use crate::geometry::bounds_of_all;
use crate::model::{Bounds, Element};
use crate::selection_manager::SelectionSet;
use crate::viewport::Viewport;

/// Everything an interaction step may read or change.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    pub element_store: ElementStore,
    pub selection: SelectionSet,
    viewport: Viewport,
}

impl Canvas {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            element_store: ElementStore::new(),
            selection: SelectionSet::new(),
            viewport,
        }
    }

    /// Creates a canvas with specified dimensions.
    pub fn with_size(width: f64, height: f64) -> Self {
        Self::new(Viewport::new(width, height))
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn elements(&self) -> &[Element] {
        self.element_store.elements()
    }

    pub fn element_count(&self) -> usize {
        self.element_store.len()
    }

    pub fn get_element(&self, id: &str) -> Option<&Element> {
        self.element_store.get(id)
    }

    /// Selected elements in collection order.
    pub fn selected_elements(&self) -> Vec<&Element> {
        self.element_store
            .elements()
            .iter()
            .filter(|e| self.selection.contains(&e.id))
            .collect()
    }

    /// Combined bounds of the selection, `None` when nothing is selected.
    pub fn selection_bounds(&self) -> Option<Bounds> {
        bounds_of_all(self.selected_elements())
    }

    /// Combined bounds of every element.
    pub fn content_bounds(&self) -> Option<Bounds> {
        bounds_of_all(self.element_store.elements())
    }

    /// Drops selected ids that no longer exist in the store.
    pub(crate) fn prune_selection(&mut self) -> bool {
        let store = &self.element_store;
        self.selection.retain_existing(|id| store.contains(id))
    }
}

use std::collections::BTreeSet;

/// Tracks which elements are selected.
///
/// `SelectionSet` is responsible for:
/// - Replacing the selection with a single clicked element
/// - Toggling membership (modifier+click)
/// - Clearing and select-all
/// - Dropping ids that no longer exist after deletes or plan replacement
///
/// # Selection Model
///
/// The set is unordered in meaning; ids are kept sorted only so snapshots
/// and notifications are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<String>,
}

impl SelectionSet {
    /// Creates an empty selection.
    ///
    /// # Examples
    ///
    /// ```
    /// use siteplan_designer::selection_manager::SelectionSet;
    ///
    /// let mut selection = SelectionSet::new();
    /// assert!(selection.is_empty());
    /// selection.replace("a");
    /// assert_eq!(selection.single(), Some("a"));
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &BTreeSet<String> {
        &self.ids
    }

    /// Selected ids as an owned, sorted list.
    pub fn to_vec(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns the id when exactly one element is selected.
    pub fn single(&self) -> Option<&str> {
        if self.ids.len() == 1 {
            self.ids.iter().next().map(String::as_str)
        } else {
            None
        }
    }

    /// Replaces the selection with just `id`.
    ///
    /// # Returns
    ///
    /// `true` if the selection changed.
    pub fn replace(&mut self, id: &str) -> bool {
        if self.single() == Some(id) {
            return false;
        }
        self.ids.clear();
        self.ids.insert(id.to_string());
        true
    }

    /// Adds `id` if absent, removes it if present.
    ///
    /// # Returns
    ///
    /// `true` if `id` is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    /// Replaces the selection with every id in `ids`.
    pub fn set_all<I, S>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let next: BTreeSet<String> = ids.into_iter().map(Into::into).collect();
        let changed = next != self.ids;
        self.ids = next;
        changed
    }

    /// Clears the selection. Returns `true` if anything was selected.
    pub fn clear(&mut self) -> bool {
        let changed = !self.ids.is_empty();
        self.ids.clear();
        changed
    }

    /// Drops ids for which `exists` returns false.
    pub fn retain_existing<F>(&mut self, exists: F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        let before = self.ids.len();
        self.ids.retain(|id| exists(id));
        before != self.ids.len()
    }
}

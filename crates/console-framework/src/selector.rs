//! # Relation Selectors
//!
//! Edit forms pick foreign records (a shop item's kit, a clan's members) through a relation
//! selector. A selector:
//!
//! 1. loads a bounded candidate list once ([`CandidateSet::load`]);
//! 2. narrows the visible candidates by substring match on the **decimal id** as the user types;
//! 3. tracks its selection independently of that view, reporting every change through a
//!    callback so the enclosing form can copy it into its draft.
//!
//! A failed candidate load leaves an empty list and is logged; the form stays usable.
//!
//! ```rust,ignore
//! let screen = Arc::new(console.screen::<ShopItem>());
//! let draft = screen.clone();
//! let mut kits = MultiRelationSelector::new(console.gateway::<Kit>(), limit, vec![], move |ids| {
//!     draft.update_draft(|d| d.kit_ids = Field::Value(ids.to_vec()));
//! });
//! kits.load().await;
//! kits.set_filter_text("1");
//! kits.toggle_selection(12);
//! ```

use crate::gateway::ResourceGateway;
use crate::resource::{Pagination, Resource, ResourceId};
use tracing::{debug, warn};

/// Ordered, duplicate-free set of ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: Vec<ResourceId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the first occurrence of every id.
    pub fn from_ids(ids: impl IntoIterator<Item = ResourceId>) -> Self {
        let mut set = Self::new();
        for id in ids {
            set.insert(id);
        }
        set
    }

    pub fn contains(&self, id: ResourceId) -> bool {
        self.ids.contains(&id)
    }

    /// Appends `id` if absent. Returns whether it was added.
    pub fn insert(&mut self, id: ResourceId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Removes `id`, keeping the order of the rest. Returns whether it was present.
    pub fn remove(&mut self, id: ResourceId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&existing| existing != id);
        self.ids.len() != before
    }

    /// Removes `id` if present, appends it otherwise. Returns whether it is now selected.
    pub fn toggle(&mut self, id: ResourceId) -> bool {
        if self.remove(id) {
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn ids(&self) -> &[ResourceId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// The foreign records a selector offers, plus the filter over them.
pub struct CandidateSet<T: Resource> {
    gateway: ResourceGateway<T>,
    limit: u32,
    candidates: Vec<T>,
    filter: String,
    loaded: bool,
}

impl<T: Resource> CandidateSet<T> {
    pub fn new(gateway: ResourceGateway<T>, limit: u32) -> Self {
        Self {
            gateway,
            limit,
            candidates: Vec::new(),
            filter: String::new(),
            loaded: false,
        }
    }

    /// Fetches the candidates. Only the first call hits the backend.
    pub async fn load(&mut self) {
        if self.loaded {
            return;
        }
        self.loaded = true;
        match self.gateway.list(Pagination::new(1, self.limit)).await {
            Ok(page) => {
                debug!(collection = T::COLLECTION, count = page.items.len(), "Candidates loaded");
                self.candidates = page.items;
            }
            Err(e) => {
                warn!(collection = T::COLLECTION, error = %e, "Failed to load candidates");
                self.candidates.clear();
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn set_filter_text(&mut self, text: &str) {
        self.filter = text.trim().to_string();
    }

    pub fn filter_text(&self) -> &str {
        &self.filter
    }

    pub fn all(&self) -> &[T] {
        &self.candidates
    }

    /// Candidates whose id, in decimal, contains the filter text.
    pub fn visible(&self) -> Vec<&T> {
        self.candidates
            .iter()
            .filter(|c| self.filter.is_empty() || c.id().to_string().contains(&self.filter))
            .collect()
    }

    pub fn find(&self, id: ResourceId) -> Option<&T> {
        self.candidates.iter().find(|c| c.id() == id)
    }
}

/// A selected id rendered as a removable chip.
#[derive(Debug, Clone, Copy)]
pub struct Chip<'a, T> {
    pub id: ResourceId,
    /// `None` when the id is not among the loaded candidates.
    pub record: Option<&'a T>,
}

/// Selector for a to-many relation.
pub struct MultiRelationSelector<T: Resource> {
    candidates: CandidateSet<T>,
    selection: SelectionSet,
    on_change: Box<dyn FnMut(&[ResourceId]) + Send>,
}

impl<T: Resource> MultiRelationSelector<T> {
    pub fn new<F>(
        gateway: ResourceGateway<T>,
        limit: u32,
        initial: impl IntoIterator<Item = ResourceId>,
        on_change: F,
    ) -> Self
    where
        F: FnMut(&[ResourceId]) + Send + 'static,
    {
        Self {
            candidates: CandidateSet::new(gateway, limit),
            selection: SelectionSet::from_ids(initial),
            on_change: Box::new(on_change),
        }
    }

    pub async fn load(&mut self) {
        self.candidates.load().await;
    }

    pub fn candidates(&self) -> &CandidateSet<T> {
        &self.candidates
    }

    pub fn set_filter_text(&mut self, text: &str) {
        self.candidates.set_filter_text(text);
    }

    pub fn visible_candidates(&self) -> Vec<&T> {
        self.candidates.visible()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn is_selected(&self, id: ResourceId) -> bool {
        self.selection.contains(id)
    }

    fn notify(&mut self) {
        (self.on_change)(self.selection.ids());
    }

    /// Selects `id` if absent, deselects it otherwise.
    pub fn toggle_selection(&mut self, id: ResourceId) -> bool {
        let selected = self.selection.toggle(id);
        self.notify();
        selected
    }

    /// Chip removal: works whether or not the id is currently visible.
    pub fn remove(&mut self, id: ResourceId) {
        if self.selection.remove(id) {
            self.notify();
        }
    }

    pub fn chips(&self) -> Vec<Chip<'_, T>> {
        self.selection
            .ids()
            .iter()
            .map(|&id| Chip {
                id,
                record: self.candidates.find(id),
            })
            .collect()
    }
}

/// Selector for a to-one relation.
pub struct SingleRelationSelector<T: Resource> {
    candidates: CandidateSet<T>,
    selection: Option<ResourceId>,
    on_change: Box<dyn FnMut(Option<ResourceId>) + Send>,
}

impl<T: Resource> SingleRelationSelector<T> {
    pub fn new<F>(
        gateway: ResourceGateway<T>,
        limit: u32,
        initial: Option<ResourceId>,
        on_change: F,
    ) -> Self
    where
        F: FnMut(Option<ResourceId>) + Send + 'static,
    {
        Self {
            candidates: CandidateSet::new(gateway, limit),
            selection: initial,
            on_change: Box::new(on_change),
        }
    }

    pub async fn load(&mut self) {
        self.candidates.load().await;
    }

    pub fn candidates(&self) -> &CandidateSet<T> {
        &self.candidates
    }

    pub fn set_filter_text(&mut self, text: &str) {
        self.candidates.set_filter_text(text);
    }

    pub fn visible_candidates(&self) -> Vec<&T> {
        self.candidates.visible()
    }

    pub fn selection(&self) -> Option<ResourceId> {
        self.selection
    }

    pub fn selected_record(&self) -> Option<&T> {
        self.selection.and_then(|id| self.candidates.find(id))
    }

    /// Replaces the selection; `None` clears it.
    pub fn set_selection(&mut self, id: Option<ResourceId>) {
        self.selection = id;
        (self.on_change)(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_restores_order_and_contents() {
        let mut set = SelectionSet::from_ids([3, 1, 2]);
        assert!(set.toggle(7));
        assert!(!set.toggle(7));
        assert_eq!(set.ids(), &[3, 1, 2]);
    }

    #[test]
    fn removing_keeps_remaining_order() {
        let mut set = SelectionSet::from_ids([3, 1, 2]);
        assert!(!set.toggle(1));
        assert_eq!(set.ids(), &[3, 2]);
        assert!(!set.remove(9));
    }

    #[test]
    fn from_ids_drops_duplicates() {
        let set = SelectionSet::from_ids([5, 5, 6, 5]);
        assert_eq!(set.ids(), &[5, 6]);
        assert_eq!(set.len(), 2);
    }
}

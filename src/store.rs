use tracing::debug;

use crate::types::{ContentItem, SortOrder};

pub(crate) type OnChange = Box<dyn FnMut(&[ContentItem]) + Send>;

/// The authoritative, observable content list.
///
/// Every mutation runs the change listener once, synchronously, with the
/// complete new sequence. The store has no locking; keep it on one task.
pub struct ContentListStore {
    items: Vec<ContentItem>,
    on_change: OnChange,
}

impl ContentListStore {
    pub fn new<F>(on_change: F) -> Self
    where
        F: FnMut(&[ContentItem]) + Send + 'static,
    {
        Self { items: Vec::new(), on_change: Box::new(on_change) }
    }

    /// Discard the current list and adopt `items` in the given order.
    pub fn replace_all(&mut self, items: Vec<ContentItem>) {
        debug!(previous = self.items.len(), new = items.len(), "replacing content list");
        self.items = items;
        self.notify();
    }

    pub fn clear(&mut self) {
        debug!(previous = self.items.len(), "clearing content list");
        self.items.clear();
        self.notify();
    }

    /// Reorder by id. Notifies even when there was nothing to reorder.
    pub fn sort(&mut self, order: SortOrder) {
        debug!(?order, len = self.items.len(), "sorting content list");
        self.items.sort_by(|a, b| order.compare(a, b));
        self.notify();
    }

    /// Read-only view of the current sequence.
    pub fn items(&self) -> &[ContentItem] { &self.items }

    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn is_sorted(&self, order: SortOrder) -> bool { order.is_sorted(&self.items) }

    fn notify(&mut self) {
        (self.on_change)(&self.items)
    }
}

impl Default for ContentListStore {
    fn default() -> Self { Self::new(|_: &[ContentItem]| {}) }
}

impl std::fmt::Debug for ContentListStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentListStore").field("items", &self.items).finish_non_exhaustive()
    }
}

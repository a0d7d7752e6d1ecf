use std::cmp::Ordering;

use serde::Serialize;

/// One record of the content list.
///
/// Items are only built by the wire mapping (see [`crate::mapping`]) and are
/// never mutated afterwards; list updates go through the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentItem {
    id: i32,
    title: String,
    image: String,
}

impl ContentItem {
    pub(crate) fn new(id: i32, title: String, image: String) -> Self {
        Self { id, title, image }
    }

    pub fn id(&self) -> i32 { self.id }
    pub fn title(&self) -> &str { &self.title }

    /// Raw image reference as received; empty when the source had no image.
    pub fn image_ref(&self) -> &str { &self.image }

    /// Image URL, or `None` when the presentation layer should show a placeholder.
    pub fn image_url(&self) -> Option<&str> {
        Some(self.image.as_str()).filter(|s| !s.is_empty())
    }
}

/// Direction of an id sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending { SortOrder::Ascending } else { SortOrder::Descending }
    }

    /// Compare two items by id in this direction. Both sort directions go
    /// through here so they cannot disagree.
    pub fn compare(self, a: &ContentItem, b: &ContentItem) -> Ordering {
        let natural = a.id.cmp(&b.id);
        match self {
            SortOrder::Ascending => natural,
            SortOrder::Descending => natural.reverse(),
        }
    }

    /// Checks every adjacent pair, first and last included.
    pub fn is_sorted(self, items: &[ContentItem]) -> bool {
        items.windows(2).all(|w| self.compare(&w[0], &w[1]) != Ordering::Greater)
    }
}

impl From<bool> for SortOrder {
    fn from(ascending: bool) -> Self { SortOrder::from_ascending(ascending) }
}

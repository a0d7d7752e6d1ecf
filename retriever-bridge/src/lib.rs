//! Flutter bridge for the content-retriever library API.
//! Exposes a thin async wrapper around ContentRetriever suitable for flutter_rust_bridge.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use content_retriever::prelude::*;
use tokio::sync::Mutex;

/// Flat copy of a content item for the Dart side.
#[derive(Debug, Clone)]
pub struct ContentEntry {
    pub id: i32,
    pub title: String,
    /// `None` means the UI should show its placeholder image.
    pub image_url: Option<String>,
}

impl From<&ContentItem> for ContentEntry {
    fn from(item: &ContentItem) -> Self {
        Self { id: item.id(), title: item.title().to_string(), image_url: item.image_url().map(str::to_string) }
    }
}

pub struct RetrieverBridge {
    inner: Mutex<ContentRetriever>,
    // Bumped on every list change; the UI re-renders when it moves.
    revision: Arc<AtomicU64>,
}

impl RetrieverBridge {
    /// Create the retriever. Empty arguments fall back to the stored settings.
    pub fn new(base_address: Option<String>, relative_path: Option<String>) -> Result<Self> {
        let mut settings = Settings::load(None)?;
        if let Some(b) = base_address.filter(|s| !s.is_empty()) { settings.base_address = b; }
        if let Some(p) = relative_path.filter(|s| !s.is_empty()) { settings.relative_path = p; }

        let revision = Arc::new(AtomicU64::new(0));
        let rev = Arc::clone(&revision);
        let retriever = ContentRetriever::new(&settings, move |_: &[ContentItem]| {
            rev.fetch_add(1, Ordering::Relaxed);
        })?;
        Ok(Self { inner: Mutex::new(retriever), revision })
    }

    /// Fetch from the server and replace the list. Returns the new item count,
    /// or an error carrying the status code (`-1` when there is none).
    ///
    /// Results left over from an earlier, dropped call are applied first so
    /// this call always answers with its own fetch.
    pub async fn refresh(&self) -> Result<usize> {
        let mut inner = self.inner.lock().await;
        inner.apply_pending();
        let handle = inner.refresh()?;
        match inner.complete(handle).await {
            FetchEvent::Loaded(count) => Ok(count),
            FetchEvent::Failed(err) => Err(anyhow!("error {}: {}", err.code(), err)),
        }
    }

    pub async fn sort(&self, ascending: bool) {
        self.inner.lock().await.sort(SortOrder::from_ascending(ascending));
    }

    pub async fn clear(&self) { self.inner.lock().await.clear(); }

    pub async fn load_sample(&self) -> Result<usize> {
        Ok(self.inner.lock().await.load_sample()?)
    }

    pub async fn items(&self) -> Vec<ContentEntry> {
        self.inner.lock().await.items().iter().map(ContentEntry::from).collect()
    }

    pub fn revision(&self) -> u64 { self.revision.load(Ordering::Relaxed) }
}

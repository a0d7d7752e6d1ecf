pub mod callback;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod fixture;
pub mod mapping;
pub mod store;
pub mod transport;
pub mod types;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::config::Settings;
    pub use crate::error::FetchError;
    pub use crate::types::{ContentItem, SortOrder};
    pub use crate::{ContentRetriever, FetchEvent};
}

pub use crate::error::FetchError;
pub use crate::types::{ContentItem, SortOrder};

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::callback::{OnContent, OnError};
use crate::config::Settings;
use crate::fetcher::ContentFetcher;
use crate::store::ContentListStore;
use crate::transport::{HttpTransport, Transport};

/// What a completed fetch did to the list, once applied on the owning task.
#[derive(Debug)]
pub enum FetchEvent {
    /// The list was replaced with this many items.
    Loaded(usize),
    /// The fetch failed; the list is unchanged.
    Failed(FetchError),
}

enum Delivery {
    Content(Vec<ContentItem>),
    Error(FetchError),
}

/// Library entry point. Owns the fetcher and the store and carries fetch
/// results from the callback task to whoever owns this value.
///
/// Fetch callbacks never touch the store directly: they queue their result and
/// the owner applies it with [`apply_pending`](Self::apply_pending) or
/// [`next_event`](Self::next_event). When several fetches overlap, the last
/// one delivered wins.
pub struct ContentRetriever {
    fetcher: ContentFetcher,
    store: ContentListStore,
    deliveries: mpsc::UnboundedReceiver<Delivery>,
}

impl ContentRetriever {
    /// Build over HTTP with the given settings. `on_change` runs after every
    /// list mutation with the full new list.
    pub fn new<F>(settings: &Settings, on_change: F) -> Result<Self>
    where
        F: FnMut(&[ContentItem]) + Send + 'static,
    {
        let transport = HttpTransport::new(&settings.user_agent).context("building HTTP client")?;
        Ok(Self::with_transport(settings, Arc::new(transport), on_change))
    }

    pub fn with_transport<F>(settings: &Settings, transport: Arc<dyn Transport>, on_change: F) -> Self
    where
        F: FnMut(&[ContentItem]) + Send + 'static,
    {
        let (tx, deliveries) = mpsc::unbounded_channel();
        let content_tx = tx.clone();
        // A closed channel means the retriever is gone and nobody wants the result.
        let on_content = OnContent::from(move |items: Vec<ContentItem>| {
            let _ = content_tx.send(Delivery::Content(items));
        });
        let on_error = OnError::from(move |err: FetchError| {
            let _ = tx.send(Delivery::Error(err));
        });
        let mut fetcher = ContentFetcher::new(transport, on_content, on_error);
        fetcher.set_base_address(settings.base_address.clone());
        fetcher.set_relative_path(settings.relative_path.clone());
        Self { fetcher, store: ContentListStore::new(on_change), deliveries }
    }

    pub fn fetcher(&self) -> &ContentFetcher { &self.fetcher }
    pub fn fetcher_mut(&mut self) -> &mut ContentFetcher { &mut self.fetcher }
    pub fn store(&self) -> &ContentListStore { &self.store }

    /// Start a fetch. Configuration errors come back here; pass the handle to
    /// [`complete`](Self::complete) to wait for the result of the request.
    pub fn refresh(&self) -> Result<JoinHandle<()>, FetchError> {
        info!(base = self.fetcher.base_address(), path = self.fetcher.relative_path(), "fetching content list");
        self.fetcher.fetch()
    }

    /// Apply every fetch result that has already arrived, without waiting.
    pub fn apply_pending(&mut self) -> Vec<FetchEvent> {
        let mut events = Vec::new();
        while let Ok(delivery) = self.deliveries.try_recv() {
            events.push(self.apply(delivery));
        }
        events
    }

    /// Wait for the fetch behind `handle` to finish and apply what arrived.
    ///
    /// A fetch task that dies before delivering yields
    /// [`FetchError::Aborted`] instead of waiting forever.
    pub async fn complete(&mut self, handle: JoinHandle<()>) -> FetchEvent {
        if let Err(e) = handle.await {
            error!(error = %e, "fetch task ended abnormally");
            return FetchEvent::Failed(FetchError::Aborted(e.to_string()));
        }
        match self.deliveries.try_recv() {
            Ok(delivery) => self.apply(delivery),
            Err(_) => FetchEvent::Failed(FetchError::Aborted("nothing was delivered".into())),
        }
    }

    /// Wait for the next fetch result from any fetch and apply it.
    pub async fn next_event(&mut self) -> Option<FetchEvent> {
        let delivery = self.deliveries.recv().await?;
        Some(self.apply(delivery))
    }

    fn apply(&mut self, delivery: Delivery) -> FetchEvent {
        match delivery {
            Delivery::Content(items) => {
                let count = items.len();
                self.store.replace_all(items);
                debug!(count, "content list applied");
                FetchEvent::Loaded(count)
            }
            Delivery::Error(err) => {
                error!(code = err.code(), error = %err, "could not retrieve data from server");
                FetchEvent::Failed(err)
            }
        }
    }

    pub fn sort(&mut self, order: SortOrder) {
        info!(?order, "sorting content list");
        self.store.sort(order);
    }

    pub fn clear(&mut self) { self.store.clear(); }

    /// Replace the list with the bundled sample data. Returns the item count.
    pub fn load_sample(&mut self) -> Result<usize, FetchError> {
        info!("loading sample content");
        let items = fixture::sample_items()?;
        let count = items.len();
        self.store.replace_all(items);
        Ok(count)
    }

    pub fn items(&self) -> &[ContentItem] { self.store.items() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::transport::TransportResponse;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use url::Url;

    /// Replies with the queued responses in order, then with 404.
    struct ScriptedTransport {
        calls: AtomicUsize,
        replies: Mutex<Vec<TransportResponse>>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<(u16, &str)>) -> Arc<Self> {
            let mut replies: Vec<TransportResponse> = replies
                .into_iter()
                .map(|(status, body)| TransportResponse { status, body: body.to_string() })
                .collect();
            replies.reverse();
            Arc::new(Self { calls: AtomicUsize::new(0), replies: Mutex::new(replies) })
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn get(&self, _url: &Url) -> Result<TransportResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .replies
                .lock()
                .pop()
                .unwrap_or(TransportResponse { status: 404, body: String::new() }))
        }
    }

    const THREE: &str = r#"[
        {"id":"3","title":"C","image":""},
        {"id":"1","title":"A","image":""},
        {"id":"2","title":"B","image":""}
    ]"#;

    fn ids(items: &[ContentItem]) -> Vec<i32> { items.iter().map(ContentItem::id).collect() }

    fn retriever(transport: Arc<dyn Transport>) -> (ContentRetriever, Arc<AtomicUsize>) {
        let renders = Arc::new(AtomicUsize::new(0));
        let r = Arc::clone(&renders);
        let settings = Settings {
            base_address: "http://host/".into(),
            relative_path: "fixture/movies.json".into(),
            ..Settings::default()
        };
        let retriever = ContentRetriever::with_transport(&settings, transport, move |_: &[ContentItem]| {
            r.fetch_add(1, Ordering::SeqCst);
        });
        (retriever, renders)
    }

    #[tokio::test]
    async fn fetch_then_sort() {
        let (mut r, renders) = retriever(ScriptedTransport::new(vec![(200, THREE)]));
        r.refresh().unwrap();
        assert!(matches!(r.next_event().await, Some(FetchEvent::Loaded(3))));
        assert_eq!(ids(r.items()), vec![3, 1, 2]);

        r.sort(SortOrder::Ascending);
        assert_eq!(ids(r.items()), vec![1, 2, 3]);
        r.sort(SortOrder::Descending);
        assert_eq!(ids(r.items()), vec![3, 2, 1]);
        assert_eq!(renders.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn not_found_leaves_store_unchanged() {
        let (mut r, renders) = retriever(ScriptedTransport::new(vec![(200, THREE), (404, "")]));
        r.refresh().unwrap();
        r.next_event().await;
        r.refresh().unwrap();
        match r.next_event().await {
            Some(FetchEvent::Failed(err)) => assert_eq!(err.code(), 404),
            other => panic!("expected a failure, got {other:?}"),
        }
        assert_eq!(ids(r.items()), vec![3, 1, 2]);
        assert_eq!(renders.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn apply_pending_drains_finished_fetches() {
        let (mut r, _) = retriever(ScriptedTransport::new(vec![(200, THREE)]));
        assert!(r.apply_pending().is_empty());
        r.refresh().unwrap().await.unwrap();
        let events = r.apply_pending();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], FetchEvent::Loaded(3)));
        assert!(r.apply_pending().is_empty());
    }

    #[tokio::test]
    async fn missing_configuration_makes_no_request() {
        let transport = ScriptedTransport::new(vec![(200, THREE)]);
        let (mut r, renders) = retriever(transport.clone());
        r.fetcher_mut().set_base_address("");
        assert!(matches!(r.refresh(), Err(FetchError::Configuration(_))));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        assert!(r.apply_pending().is_empty());
        assert_eq!(renders.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn overlapping_fetches_last_delivery_wins() {
        let (mut r, renders) = retriever(ScriptedTransport::new(vec![
            (200, THREE),
            (200, r#"[{"id":"7","title":"G","image":""}]"#),
        ]));
        let first = r.refresh().unwrap();
        let second = r.refresh().unwrap();
        first.await.unwrap();
        second.await.unwrap();

        let events = r.apply_pending();
        assert_eq!(events.len(), 2);
        let counts: Vec<usize> = events
            .iter()
            .map(|e| match e {
                FetchEvent::Loaded(n) => *n,
                other => panic!("expected a load, got {other:?}"),
            })
            .collect();
        let mut sorted = counts.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 3]);
        // Whichever list was delivered second is the one left in the store.
        assert_eq!(r.items().len(), counts[1]);
        assert_eq!(renders.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn complete_applies_the_delivered_result() {
        let (mut r, _) = retriever(ScriptedTransport::new(vec![(200, THREE)]));
        let handle = r.refresh().unwrap();
        assert!(matches!(r.complete(handle).await, FetchEvent::Loaded(3)));
        assert_eq!(ids(r.items()), vec![3, 1, 2]);
    }

    struct PanickingTransport;

    #[async_trait]
    impl Transport for PanickingTransport {
        async fn get(&self, _url: &Url) -> Result<TransportResponse, TransportError> {
            panic!("transport blew up")
        }
    }

    #[tokio::test]
    async fn complete_reports_a_dead_fetch_task() {
        let (mut r, renders) = retriever(Arc::new(PanickingTransport));
        let handle = r.refresh().unwrap();
        match r.complete(handle).await {
            FetchEvent::Failed(err) => {
                assert!(matches!(err, FetchError::Aborted(_)));
                assert_eq!(err.code(), -1);
            }
            other => panic!("expected a failure, got {other:?}"),
        }
        assert!(r.items().is_empty());
        assert_eq!(renders.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn sample_then_clear() {
        let (mut r, renders) = retriever(ScriptedTransport::new(vec![]));
        assert_eq!(r.load_sample().unwrap(), 18);
        r.sort(SortOrder::Ascending);
        assert!(r.store().is_sorted(SortOrder::Ascending));
        r.clear();
        assert!(r.items().is_empty());
        assert_eq!(renders.load(Ordering::SeqCst), 3);
    }
}

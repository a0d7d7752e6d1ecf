//! Completion callbacks registered on a [`ContentFetcher`](crate::fetcher::ContentFetcher).

use parking_lot::Mutex;
use std::sync::Arc;

use crate::error::FetchError;
use crate::types::ContentItem;

pub(crate) type OnContentInner = Box<dyn FnMut(Vec<ContentItem>) + Send>;

/// The callback executed when a fetch produced a content list.
///
/// Runs on the fetch task, not on the thread that owns the store; hand the
/// items over before mutating anything.
///
/// # Usage
/// ```
/// use content_retriever::callback::OnContent;
///
/// let on_content = OnContent::from(|items: Vec<content_retriever::ContentItem>| {
///     println!("received {} items", items.len());
/// });
/// ```
#[derive(Clone)]
pub struct OnContent(pub(crate) Arc<Mutex<OnContentInner>>);

impl<F> From<F> for OnContent
where
    F: FnMut(Vec<ContentItem>) + Send + 'static,
{
    fn from(f: F) -> Self {
        OnContent(Arc::new(Mutex::new(Box::new(f))))
    }
}

impl OnContent {
    pub(crate) fn call(&self, items: Vec<ContentItem>) {
        (self.0.lock())(items)
    }
}

pub(crate) type OnErrorInner = Box<dyn FnMut(FetchError) + Send>;

/// The callback executed when a fetch failed after it was started.
///
/// Use [`FetchError::code`] for the status code, or `-1` when none exists.
#[derive(Clone)]
pub struct OnError(pub(crate) Arc<Mutex<OnErrorInner>>);

impl<F> From<F> for OnError
where
    F: FnMut(FetchError) + Send + 'static,
{
    fn from(f: F) -> Self {
        OnError(Arc::new(Mutex::new(Box::new(f))))
    }
}

impl OnError {
    pub(crate) fn call(&self, err: FetchError) {
        (self.0.lock())(err)
    }
}

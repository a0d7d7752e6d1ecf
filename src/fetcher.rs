use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error};
use url::Url;

use crate::callback::{OnContent, OnError};
use crate::error::FetchError;
use crate::mapping::parse_content_list;
use crate::transport::Transport;
use crate::types::ContentItem;

/// Retrieves the content list from `base_address + relative_path`.
///
/// Outcomes go to the callbacks registered on this instance; two fetchers never
/// share a listener.
pub struct ContentFetcher {
    transport: Arc<dyn Transport>,
    base_address: String,
    relative_path: String,
    on_content: OnContent,
    on_error: OnError,
}

impl ContentFetcher {
    /// Create a fetcher with an empty address. Set both parts before [`fetch`](Self::fetch).
    pub fn new(transport: Arc<dyn Transport>, on_content: OnContent, on_error: OnError) -> Self {
        Self {
            transport,
            base_address: String::new(),
            relative_path: String::new(),
            on_content,
            on_error,
        }
    }

    pub fn set_base_address(&mut self, base: impl Into<String>) { self.base_address = base.into(); }
    pub fn base_address(&self) -> &str { &self.base_address }

    pub fn set_relative_path(&mut self, path: impl Into<String>) { self.relative_path = path.into(); }
    pub fn relative_path(&self) -> &str { &self.relative_path }

    /// The URL a fetch would hit. Exactly one `/` separates the two parts.
    pub fn url(&self) -> Result<Url, FetchError> {
        let base = self.base_address.trim();
        let path = self.relative_path.trim();
        if base.is_empty() || path.is_empty() {
            error!(base, path, "invalid host or path for content fetch");
            return Err(FetchError::Configuration(format!(
                "base address and relative path must both be set (base={base:?}, path={path:?})"
            )));
        }
        let joined = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
        Url::parse(&joined).map_err(|e| FetchError::Configuration(format!("{joined}: {e}")))
    }

    /// Start one GET on the current Tokio runtime and return without waiting.
    ///
    /// Configuration problems, and calling from outside a runtime, are
    /// returned here and nothing is sent. Every other outcome is delivered
    /// once through the registered callbacks. The handle only tells when the
    /// callback has run; dropping it does not cancel the request.
    pub fn fetch(&self) -> Result<JoinHandle<()>, FetchError> {
        let url = self.url()?;
        let runtime = Handle::try_current()?;
        let transport = Arc::clone(&self.transport);
        let on_content = self.on_content.clone();
        let on_error = self.on_error.clone();
        debug!(%url, "fetching content list");
        Ok(runtime.spawn(async move {
            match request(transport.as_ref(), &url).await {
                Ok(items) => on_content.call(items),
                Err(e) => on_error.call(e),
            }
        }))
    }
}

async fn request(transport: &dyn Transport, url: &Url) -> Result<Vec<ContentItem>, FetchError> {
    let resp = match transport.get(url).await {
        Ok(resp) => resp,
        Err(e) => {
            error!(%url, error = %e, "error sending the request to server");
            return Err(e.into());
        }
    };
    match resp.status {
        200 => {
            debug!(%url, "received 200 response from server");
            match parse_content_list(&resp.body) {
                Ok(items) => Ok(items),
                Err(e) => {
                    error!(%url, error = %e, "response body is not a content array");
                    Err(e.into())
                }
            }
        }
        404 => {
            error!(%url, "received 404 from server");
            Err(FetchError::HttpStatus(404))
        }
        status => {
            error!(%url, status, "received unhandled response code from server");
            Err(FetchError::HttpStatus(status))
        }
    }
}

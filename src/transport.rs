use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::error::TransportError;

/// Raw outcome of a GET that reached the server.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// The network seam used by the fetcher.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<TransportResponse, TransportError>;
}

/// [`Transport`] over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse, TransportError> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        let status = resp.status().as_u16();
        // Only a 200 body is ever parsed; a broken body must not hide a known status.
        let body = if status == 200 {
            resp.text().await.map_err(|e| TransportError(e.to_string()))?
        } else {
            resp.text().await.unwrap_or_default()
        };
        debug!(%url, status, bytes = body.len(), "GET completed");
        Ok(TransportResponse { status, body })
    }
}

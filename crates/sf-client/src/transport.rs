//! The transport seam and its reqwest-backed implementation.

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::HttpRequest;
use crate::response::Response;

/// Sends one HTTP request and returns the buffered response.
///
/// Implementations must not retry and must not interpret the status code:
/// any response that arrived is `Ok`, only failures to obtain one are `Err`.
/// Object safe, so clients hold it as `Arc<dyn Transport>` and tests can
/// substitute their own.
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<Response>>;
}

/// Production transport over a single long-lived `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Build a transport from configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .gzip(config.accept_compressed)
            .deflate(config.accept_compressed)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// Build a transport with default configuration.
    pub fn default_transport() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    async fn execute(&self, request: HttpRequest) -> Result<Response> {
        let mut req = self
            .inner
            .request(request.method().to_reqwest(), request.full_url()?);

        if let Some(token) = request.bearer_token() {
            req = req.bearer_auth(token);
        }

        for (name, value) in request.headers() {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body() {
            req = req.body(body.to_bytes()?);
        }

        if self.config.enable_tracing {
            debug!("Sending request");
        }

        let response = Response::from_reqwest(req.send().await?).await?;

        if self.config.enable_tracing {
            let status = response.status();
            let content_length = response.body().len();
            if response.is_success() {
                debug!(status, content_length, "Response received");
            } else {
                info!(status, content_length, "Non-success response");
            }
        }

        Ok(response)
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<Response>> {
        self.execute(request).boxed()
    }
}

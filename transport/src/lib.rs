//! HTTP transport collaborator for loadswarm
//!
//! Wraps a pooled `reqwest` client behind a narrow contract the engine's
//! task closures can capture: issue a request, map the response onto the
//! core's outcome classification. Connection pooling, timeouts, and
//! certificate handling all live here, never inside virtual-user logic.
//! Targets with self-signed certificates are reached by flipping
//! [`HttpConfig::accept_invalid_certs`] at construction time.
//!
//! # Example
//!
//! ```ignore
//! use loadswarm_core::Task;
//! use loadswarm_transport::{HttpClient, HttpConfig};
//!
//! let config = HttpConfig::new("https://localhost:3000")
//!     .with_accept_invalid_certs(true);
//! let client = HttpClient::new(&config)?;
//!
//! let task = Task::new("get_item", 100, move || {
//!     let client = client.clone();
//!     async move { client.get("/items/10", &[]).await }
//! });
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::time::Duration;

use loadswarm_core::ActionError;
use reqwest::{Client, StatusCode};

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL every request path is resolved against.
    pub base_url: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Idle connection timeout.
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host.
    pub pool_max_idle_per_host: usize,

    /// Accept self-signed or otherwise invalid TLS certificates.
    pub accept_invalid_certs: bool,

    /// User agent string.
    pub user_agent: String,
}

impl HttpConfig {
    /// Create a config targeting the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 32,
            accept_invalid_certs: false,
            user_agent: format!("loadswarm/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set a custom request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set a custom connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set a custom idle-pool size.
    pub fn with_pool_max_idle(mut self, max_idle: usize) -> Self {
        self.pool_max_idle_per_host = max_idle;
        self
    }

    /// Accept invalid TLS certificates (self-signed targets).
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}

/// Pooled HTTP client shared by task closures.
///
/// Cheap to clone; clones share the underlying connection pool. Build one
/// per target before constructing tasks, never inside an action.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpConfig,
}

impl HttpClient {
    /// Build a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// The underlying `reqwest` client, for task bodies that need verbs or
    /// headers beyond [`get`](HttpClient::get).
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Issue a GET against `path` (resolved under the base URL) with the
    /// given query parameters, classifying the result.
    ///
    /// # Errors
    ///
    /// 4xx responses map to [`ActionError::Client`], 5xx to
    /// [`ActionError::Server`]; timeouts and connection failures surface as
    /// [`ActionError::Http`].
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<(), ActionError> {
        let mut request = self.client.get(self.url_for(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await?;
        classify_status(response.status())
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Map a response status onto the outcome classification.
pub fn classify_status(status: StatusCode) -> Result<(), ActionError> {
    if status.is_client_error() {
        Err(ActionError::Client(status.as_u16()))
    } else if status.is_server_error() {
        Err(ActionError::Server(status.as_u16()))
    } else {
        Ok(())
    }
}

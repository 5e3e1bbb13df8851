//! Request interceptor for the auto-pilot writing path.
//!
//! Wraps the injected [`Transport`] and observes every call to the
//! configured chat-completion endpoint: the real call proceeds unmodified,
//! but the buffered body is duplicated, decoded, and run through the content
//! extractor so the diagnostic log always records what the upstream actually
//! produced. Non-matching traffic is delegated untouched.
//!
//! Observation never affects the caller: decode or extraction failures are
//! logged and swallowed, while genuine transport failures propagate
//! unchanged. The interceptor adds no retry and no timeout of its own.

use crate::extract::extract;
use crate::transport::{OutboundRequest, RawResponse, Transport};
use crate::Result;
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The one process-wide interceptor, seeded by [`Interceptor::install`].
static INSTALLED: OnceCell<Arc<Interceptor>> = OnceCell::new();

/// Transport decorator that observes chat-completion responses.
pub struct Interceptor {
    /// The original unwrapped primitive. Set at construction, never mutated.
    inner: Arc<dyn Transport>,
    /// Endpoint matched by exact string equality; no prefix/wildcard match.
    endpoint: String,
}

impl Interceptor {
    pub fn new(inner: Arc<dyn Transport>, endpoint: impl Into<String>) -> Self {
        Self {
            inner,
            endpoint: endpoint.into(),
        }
    }

    /// Install the process-wide interceptor exactly once.
    ///
    /// Repeat calls return the instance installed first, so the primitive
    /// can never be double-wrapped. There is no teardown; the installation
    /// lives until process exit.
    pub fn install(inner: Arc<dyn Transport>, endpoint: impl Into<String>) -> Arc<Interceptor> {
        let endpoint = endpoint.into();
        INSTALLED
            .get_or_init(|| {
                info!("Interceptor installed for endpoint {endpoint}");
                Arc::new(Interceptor::new(inner, endpoint))
            })
            .clone()
    }

    /// The installed interceptor, if [`Interceptor::install`] has run.
    pub fn shared() -> Option<Arc<Interceptor>> {
        INSTALLED.get().cloned()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Diagnostic path: decode a duplicate of the response body and log what
    /// the extractor finds. Purely observational — nothing here can change
    /// what the caller receives.
    fn observe(&self, response: &RawResponse) {
        // Explicit duplication before any read; the caller's copy stays
        // untouched.
        let body = response.body.clone();

        match serde_json::from_slice::<serde_json::Value>(&body) {
            Ok(payload) => {
                let content = extract(&payload);
                if content.is_empty() {
                    warn!(
                        status = response.status,
                        "completion response matched no known envelope shape"
                    );
                } else {
                    info!(
                        status = response.status,
                        chars = content.len(),
                        "extracted completion content: {}",
                        preview(&content)
                    );
                }
            }
            Err(e) => {
                warn!(
                    status = response.status,
                    "completion response body is not valid JSON: {e}"
                );
            }
        }
    }
}

/// Truncate extracted content for log lines.
fn preview(content: &str) -> &str {
    match content.char_indices().nth(120) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

#[async_trait]
impl Transport for Interceptor {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse> {
        if request.url != self.endpoint {
            // Pass-through: delegate with all arguments unchanged.
            return self.inner.send(request).await;
        }

        debug!("intercepting completion request to {}", self.endpoint);

        // A transport failure propagates unchanged — no retry, no
        // suppression.
        let response = self.inner.send(request).await?;

        self.observe(&response);

        Ok(response)
    }
}

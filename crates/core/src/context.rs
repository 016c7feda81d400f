//! Per-invocation context passed explicitly into every core operation.

use tracing::Span;
use uuid::Uuid;

/// Carries the request id and the tracing span that all log lines of one
/// invocation are recorded under.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub request_id: Uuid,
    span: Span,
}

impl InvocationContext {
    /// Open a context for one invocation of `function`.
    pub fn new(request_id: Uuid, function: &str) -> Self {
        let span = tracing::info_span!("invocation", %request_id, function);
        Self { request_id, span }
    }

    /// A context with a fresh random request id.
    pub fn detached(function: &str) -> Self {
        Self::new(Uuid::new_v4(), function)
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

//! Per-request correlation id.
//!
//! The [`Trace`](crate::Trace) middleware scopes a fresh [`TraceId`] around
//! each request. Code running inside that scope, such as the error envelope
//! constructors, reads it back with [`TraceId::current`]. The value is
//! task-local, so work handed to `tokio::spawn` must be wrapped in
//! [`TraceId::scope`] again to keep it.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use uuid::Uuid;

/// Response header that carries the id back to the caller.
pub const TRACE_ID_HEADER: &str = "trace-id";

tokio::task_local! {
    static CURRENT: TraceId;
}

/// Random UUID tagging one request's logs and error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The id of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current id.
    ///
    /// ```
    /// use gateway::domain::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let id = TraceId::generate();
    /// assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
    /// # });
    /// ```
    pub fn scope<Fut: Future>(trace_id: Self, fut: Fut) -> impl Future<Output = Fut::Output> {
        CURRENT.scope(trace_id, fut)
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

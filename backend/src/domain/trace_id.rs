//! Request correlation identifier.
//!
//! The HTTP trace middleware scopes a [`TraceId`] around each request in
//! task-local storage. Error rendering and log statements read it back with
//! [`TraceId::current`] so a client-visible `trace-id` header can be matched
//! against server logs.
//!
//! Task-locals do not follow spawned tasks; wrap such work in
//! [`TraceId::scope`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

/// Header carrying the trace identifier on requests and responses.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static TRACE_ID: TraceId;
}

/// Per-request correlation identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reuse a caller-supplied identifier when it parses, otherwise generate
    /// one.
    ///
    /// # Examples
    /// ```
    /// use record_service::domain::TraceId;
    ///
    /// let nil = "00000000-0000-0000-0000-000000000000";
    /// assert_eq!(TraceId::from_header(Some(nil)).to_string(), nil);
    /// assert_ne!(TraceId::from_header(Some("garbage")).to_string(), "garbage");
    /// ```
    pub fn from_header(value: Option<&str>) -> Self {
        value
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_else(Self::generate)
    }

    /// Identifier in scope for the current task, if any.
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` in scope.
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

//! Request correlation id carried in task-local storage.
//!
//! The id is read by error constructors and log statements without being
//! threaded through every signature. Task locals do not follow work onto
//! `spawn_blocking` threads; capture [`TraceId::current`] before handing work
//! off if the blocking side needs it.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static ACTIVE: TraceId;
}

/// Correlation id for one HTTP request.
///
/// # Examples
/// ```
/// use rentease::TraceId;
///
/// let upstream = TraceId::from_upstream(Some("6f1c1c1e-7a4f-4bd6-9d3e-2a4f7b0e1a11"));
/// assert_eq!(upstream.to_string(), "6f1c1c1e-7a4f-4bd6-9d3e-2a4f7b0e1a11");
///
/// // Anything that is not a UUID is replaced by a fresh id.
/// let fresh = TraceId::from_upstream(Some("not-a-uuid"));
/// assert_ne!(fresh.to_string(), "not-a-uuid");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reuse the id supplied by a proxy when it is a UUID, else mint one.
    #[must_use]
    pub fn from_upstream(header: Option<&str>) -> Self {
        header
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_else(Self::generate)
    }

    /// The id of the request currently being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        ACTIVE.try_with(|id| *id).ok()
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Run `fut` with `trace_id` as the active id.
    ///
    /// # Examples
    /// ```
    /// use rentease::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let id = TraceId::from_upstream(None);
    /// let seen = TraceId::scope(id, async { TraceId::current() }).await;
    /// assert_eq!(seen, Some(id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        ACTIVE.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

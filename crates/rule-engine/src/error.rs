use thiserror::Error;

/// Failure fetching rules from the backing store. The engine keeps its
/// last-known-good index when a fetch fails; callers decide whether to
/// retry or alert.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("rule source unavailable: {0}")]
    Unavailable(String),

    #[error("rule source fetch timed out")]
    Timeout,

    #[error("rule source returned malformed data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("rule source error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Failure of a `load()`/`refresh()` cycle.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load compliance rules: {0}")]
    Source(#[from] SourceError),
}

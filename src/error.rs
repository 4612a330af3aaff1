use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// An external feed failed or timed out. Non-fatal: the source
    /// contributes zero candidates for the cycle.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// A cached payload failed to decode or carried a stale schema version.
    /// Treated as a miss; the entry is purged.
    #[error("cache entry corrupt: {0}")]
    CacheCorrupt(String),

    /// The corpus backing an operation is empty or too small. Mapped to the
    /// documented fallback result, never surfaced to callers.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// The affinity store failed to read or write. Propagated, since it
    /// affects personalization correctness.
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

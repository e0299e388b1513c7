//! Errors surfaced by the walker.

use thiserror::Error;

/// Failure of a traversal operation or sequence step.
///
/// Malformed markup is never an error: the parser recovers on its own.
/// The only failure the walker reports is the chunk source's.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The chunk source failed. The walker does not retry; the failure is
    /// handed back unchanged.
    #[error("chunk source failed after {chunks_read} chunk(s): {source}")]
    Source {
        chunks_read: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl WalkError {
    pub(crate) fn from_source<E>(chunks_read: usize, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        WalkError::Source { chunks_read, source: Box::new(error) }
    }

    /// The transport error, for downcasting to the source's own error type.
    pub fn source_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        match self {
            WalkError::Source { source, .. } => source.as_ref(),
        }
    }
}

use async_trait::async_trait;
use thiserror::Error;

use crate::core::stream::StreamDefinition;

/// Error type for stream store operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StoreError {
    /// A stream with this name is already persisted
    #[error("stream already exists: {0}")]
    Duplicate(String),

    /// No stream with this name is persisted
    #[error("no such stream: {0}")]
    NotFound(String),

    /// The underlying storage failed
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for stream store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// StreamStore defines the port (interface) for the durable registry of
/// stream definitions, one unit of storage per stream, addressed by name.
#[async_trait]
pub trait StreamStore: Send + Sync + 'static {
    /// Return all currently persisted streams. An empty store yields an
    /// empty vector, not an error.
    async fn list(&self) -> StoreResult<Vec<StreamDefinition>>;

    /// Persist a new stream. Fails with [`StoreError::Duplicate`] when the
    /// name is taken; a failed write must leave no partial artifact.
    async fn create(&self, def: &StreamDefinition) -> StoreResult<()>;

    /// Remove a stream and its rendered fragment.
    async fn delete(&self, name: &str) -> StoreResult<()>;
}

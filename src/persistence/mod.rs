//! Persistence layer
//!
//! Portfolios are saved per user as a list of event records (a snapshot
//! plus the portfolio write-up). The center node is never persisted. Storage backends implement [`SnapshotStore`];
//! the [`Session`] decides which user is active.

pub mod samples;
pub mod session;
pub mod snapshot;
pub mod store;

pub use samples::sample_events;
pub use session::{LoadSource, Session};
pub use snapshot::{EventSnapshot, PortfolioRecord};
pub use store::{JsonFileStore, MemoryStore, SnapshotStore};

use crate::graph::GraphError;
use thiserror::Error;

/// Persistence errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Saved events could not be restored into the graph
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("No active user")]
    NoActiveUser,
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

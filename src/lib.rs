//! Folio portfolio graph
//!
//! A portfolio of events (achievements and activities) shown as nodes on a
//! pannable, zoomable canvas, with connections derived from shared skill tags
//! and shared mistakes, and similarity-based recommendations relative to a
//! single center node that represents the user.
//!
//! # Architecture
//!
//! - [`graph`]: event entity, the [`GraphStore`] with its center slot,
//!   derived connections and the frame scheduler that coalesces updates
//! - [`canvas`]: world/screen transform, pan and anchored zoom, grid snapping
//! - [`recommend`]: ranking, development directions, per-event insights
//! - [`persistence`]: per-user saved records, storage backends, the session
//! - [`config`]: YAML/JSON configuration with defaults
//!
//! Scoring itself lives in the `folio-similarity` crate.
//!
//! ## Example Usage
//!
//! ```rust
//! use folio::graph::{ConnectionKind, EventInput, GraphStore};
//!
//! let mut store = GraphStore::with_center();
//! let a = store.add_event(&EventInput::new("AI Hackathon").with_tags("#ai, #python")).unwrap();
//! let b = store.add_event(&EventInput::new("ML Course").with_tags("#python")).unwrap();
//!
//! // Connections are materialized once per frame
//! let update = store.flush_frame().unwrap();
//! assert_eq!(update.diff.added.len(), 3);
//! assert!(store
//!     .connections()
//!     .any(|c| c.kind() == ConnectionKind::Tag && c.key.connects(a, b)));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod canvas;
pub mod config;
pub mod graph;
pub mod persistence;
pub mod recommend;

// Re-export main types for convenience
pub use graph::{
    Connection, ConnectionKey, ConnectionKind, Event, EventFilter, EventId, EventInput,
    GraphError, GraphResult, GraphStore,
};

pub use canvas::{CanvasTransform, PanState, Point};

pub use config::{CanvasConfig, ConfigError, ConfigResult, FolioConfig, GraphConfig, RecommendConfig};

pub use persistence::{
    EventSnapshot, JsonFileStore, MemoryStore, PersistenceError, PersistenceResult, PortfolioRecord,
    Session, SnapshotStore,
};

pub use recommend::{
    development_recommendations, recommendations_for, Recommendation, Recommender,
    SimilarityClass,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.3.0");
    }
}

//! Portfolio graph
//!
//! This module implements the event graph:
//! - Events with loosely typed input and coerced defaults
//! - One distinguished center node
//! - Undirected connections derived from shared tags and errors
//! - Non-destructive filtering, selection and node dragging
//! - Frame-coalesced connection maintenance

pub mod connection;
pub mod event;
pub mod frame;
pub mod store;
pub mod tags;
pub mod types;

// Re-export main types
pub use connection::{connection_kind, derive_connections, Connection, ConnectionDiff, EdgeGeometry};
pub use event::{format_date, parse_date, DisplayInfo, Event, EventFilter, EventInput, LooseNumber};
pub use frame::{FramePlan, FrameScheduler};
pub use store::{DragOutcome, FrameUpdate, GraphError, GraphResult, GraphStatistics, GraphStore};
pub use tags::{normalize_tag, parse_tags, TagList};
pub use types::{ConnectionKey, ConnectionKind, EventId};

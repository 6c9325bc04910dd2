//! Derived connections between events
//!
//! Connections are never stored by the user. They are a materialized view
//! over the visible events:
//! - two regular events get a `tag` edge if they share a skill tag, otherwise
//!   an `error` edge if they share an error tag, otherwise nothing;
//! - every regular event gets a `center-connection` edge to the center node.

use super::event::Event;
use super::types::{ConnectionKey, ConnectionKind, EventId};
use crate::canvas::Point;
use crate::config::GraphConfig;
use folio_similarity::{has_common, similarity};
use serde::{Deserialize, Serialize};

/// An undirected, typed edge between two events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub key: ConnectionKey,
    /// First endpoint as derived (the regular event for center edges)
    pub source: EventId,
    pub target: EventId,
}

impl Connection {
    pub fn new(source: EventId, target: EventId, kind: ConnectionKind) -> Self {
        Connection {
            key: ConnectionKey::new(source, target, kind),
            source,
            target,
        }
    }

    pub fn kind(&self) -> ConnectionKind {
        self.key.kind
    }
}

/// Kind of the edge between two regular events, if any.
/// A shared tag wins over a shared error tag.
pub fn connection_kind(a: &Event, b: &Event) -> Option<ConnectionKind> {
    if has_common(&a.tags, &b.tags) {
        Some(ConnectionKind::Tag)
    } else if has_common(&a.errors, &b.errors) {
        Some(ConnectionKind::Error)
    } else {
        None
    }
}

/// Full connection set over `regular` events plus the optional center
pub fn derive_connections<'a, I>(regular: I, center: Option<&Event>) -> Vec<Connection>
where
    I: IntoIterator<Item = &'a Event>,
{
    let regular: Vec<&Event> = regular.into_iter().filter(|e| !e.is_center).collect();
    let mut connections = Vec::new();

    for (i, a) in regular.iter().enumerate() {
        for b in &regular[i + 1..] {
            if let Some(kind) = connection_kind(a, b) {
                connections.push(Connection::new(a.id, b.id, kind));
            }
        }
    }

    if let Some(center) = center {
        for event in &regular {
            connections.push(Connection::new(event.id, center.id, ConnectionKind::Center));
        }
    }

    connections
}

/// Structural change produced by a connection sync
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionDiff {
    pub added: Vec<ConnectionKey>,
    pub removed: Vec<ConnectionKey>,
}

impl ConnectionDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Where to draw one edge, in world coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeGeometry {
    pub key: ConnectionKey,
    /// Center of the source vertex box
    pub start: Point,
    /// Center of the target vertex box
    pub end: Point,
    pub length: f64,
    pub angle_degrees: f64,
    /// Tooltip text
    pub label: String,
}

impl EdgeGeometry {
    /// Geometry from stored positions and the configured vertex size only
    pub fn between(key: ConnectionKey, source: &Event, target: &Event, config: &GraphConfig) -> Self {
        let half = Point::new(config.vertex_width / 2.0, config.vertex_height / 2.0);
        let start = source.position() + half;
        let end = target.position() + half;
        let delta = end - start;

        let label = match key.kind {
            ConnectionKind::Center => "Link to center".to_string(),
            _ => format!("Similarity: {:.2}", similarity(source, target)),
        };

        EdgeGeometry {
            key,
            start,
            end,
            length: delta.x.hypot(delta.y),
            angle_degrees: delta.y.atan2(delta.x).to_degrees(),
            label,
        }
    }
}

//! Core type definitions for the portfolio graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an event, stable for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl EventId {
    /// Identifier reserved for the center ("self") node
    pub const CENTER: EventId = EventId(0);

    pub fn new(id: u64) -> Self {
        EventId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventId({})", self.0)
    }
}

impl From<u64> for EventId {
    fn from(id: u64) -> Self {
        EventId(id)
    }
}

/// Why two events are connected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum ConnectionKind {
    /// The pair shares at least one skill tag
    #[serde(rename = "tag")]
    Tag,
    /// The pair shares no skill tag but at least one error tag
    #[serde(rename = "error")]
    Error,
    /// A regular event linked to the center node
    #[serde(rename = "center-connection")]
    Center,
}

impl ConnectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionKind::Tag => "tag",
            ConnectionKind::Error => "error",
            ConnectionKind::Center => "center-connection",
        }
    }
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Key of a materialized connection: an unordered pair plus the kind.
///
/// The pair is stored sorted, so `new(a, b, k) == new(b, a, k)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ConnectionKey {
    pub low: EventId,
    pub high: EventId,
    pub kind: ConnectionKind,
}

impl ConnectionKey {
    pub fn new(a: EventId, b: EventId, kind: ConnectionKind) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        ConnectionKey { low, high, kind }
    }

    /// True if the key links the two events, in either order
    pub fn connects(&self, a: EventId, b: EventId) -> bool {
        (self.low == a && self.high == b) || (self.low == b && self.high == a)
    }

    pub fn touches(&self, id: EventId) -> bool {
        self.low == id || self.high == id
    }
}

impl fmt::Display for ConnectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.low.0, self.high.0, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_id() {
        let id = EventId::new(42);
        assert_eq!(id.as_u64(), 42);
        assert_eq!(format!("{}", id), "EventId(42)");

        let id2: EventId = 100.into();
        assert_eq!(id2.as_u64(), 100);
        assert!(EventId::CENTER < id);
    }

    #[test]
    fn test_connection_kind_names() {
        assert_eq!(ConnectionKind::Tag.as_str(), "tag");
        assert_eq!(ConnectionKind::Error.to_string(), "error");
        assert_eq!(
            serde_json::to_string(&ConnectionKind::Center).unwrap(),
            "\"center-connection\""
        );
    }

    #[test]
    fn test_connection_key_is_unordered() {
        let a = EventId::new(7);
        let b = EventId::new(3);
        let k1 = ConnectionKey::new(a, b, ConnectionKind::Tag);
        let k2 = ConnectionKey::new(b, a, ConnectionKind::Tag);
        assert_eq!(k1, k2);
        assert_eq!(k1.low, b);
        assert!(k1.connects(a, b));
        assert!(k1.touches(a));
        assert!(!k1.touches(EventId::new(9)));
        assert_eq!(k1.to_string(), "3|7|tag");

        let k3 = ConnectionKey::new(a, b, ConnectionKind::Error);
        assert_ne!(k1, k3);
    }
}

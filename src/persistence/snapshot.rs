//! Persisted event shapes
//!
//! [`EventSnapshot`] is the minimal saved form of an event. [`PortfolioRecord`]
//! adds the portfolio write-up (description, type, result, reflection) on top
//! of it; storage backends keep records, and documents holding bare snapshots
//! still load with empty write-ups.

use crate::graph::{Event, EventId, EventInput, GraphResult, GraphStore, TagList};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One saved event. Only these fields survive a save/load cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSnapshot {
    pub id: EventId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub contacts: String,
    #[serde(default)]
    pub budget: i64,
    /// `YYYY-MM-DD`, absent when the event has no date
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default = "default_participants")]
    pub participants: i64,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

fn default_participants() -> i64 {
    1
}

impl From<&Event> for EventSnapshot {
    fn from(event: &Event) -> Self {
        EventSnapshot {
            id: event.id,
            title: event.title.clone(),
            tags: event.tags.clone(),
            errors: event.errors.clone(),
            contacts: event.contacts.clone(),
            budget: event.budget,
            date: event.date.map(|d| d.format("%Y-%m-%d").to_string()),
            participants: event.participants,
            x: event.x,
            y: event.y,
        }
    }
}

impl EventSnapshot {
    /// Input record that recreates the event, coercing as on creation
    pub fn to_input(&self) -> EventInput {
        EventInput {
            id: Some(self.id),
            title: Some(self.title.clone()),
            tags: Some(TagList::List(self.tags.clone())),
            errors: Some(TagList::List(self.errors.clone())),
            contacts: Some(self.contacts.clone()),
            budget: Some(self.budget.into()),
            date: self.date.clone(),
            participants: Some(self.participants.into()),
            x: Some(self.x),
            y: Some(self.y),
            ..Default::default()
        }
    }
}

/// Saved event together with its portfolio write-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRecord {
    #[serde(flatten)]
    pub snapshot: EventSnapshot,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, alias = "type", skip_serializing_if = "String::is_empty")]
    pub portfolio_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub result: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reflection: String,
}

impl From<&Event> for PortfolioRecord {
    fn from(event: &Event) -> Self {
        PortfolioRecord {
            snapshot: EventSnapshot::from(event),
            description: event.description.clone(),
            portfolio_type: event.portfolio_type.clone(),
            result: event.result.clone(),
            reflection: event.reflection.clone(),
        }
    }
}

impl From<EventSnapshot> for PortfolioRecord {
    fn from(snapshot: EventSnapshot) -> Self {
        PortfolioRecord {
            snapshot,
            description: String::new(),
            portfolio_type: String::new(),
            result: String::new(),
            reflection: String::new(),
        }
    }
}

impl PortfolioRecord {
    /// Input record that recreates the event. An empty type falls back to
    /// the default category.
    pub fn to_input(&self) -> EventInput {
        EventInput {
            description: Some(self.description.clone()),
            portfolio_type: Some(self.portfolio_type.clone()),
            result: Some(self.result.clone()),
            reflection: Some(self.reflection.clone()),
            ..self.snapshot.to_input()
        }
    }
}

impl GraphStore {
    /// Snapshots of every regular event, in insertion order
    pub fn snapshots(&self) -> Vec<EventSnapshot> {
        self.events().map(EventSnapshot::from).collect()
    }

    /// Full records of every regular event, in insertion order
    pub fn records(&self) -> Vec<PortfolioRecord> {
        self.events().map(PortfolioRecord::from).collect()
    }

    /// Swap all regular events for `snapshots`, keeping the center.
    /// Returns the number of events restored; on error nothing changes.
    pub fn replace_events(&mut self, snapshots: &[EventSnapshot]) -> GraphResult<usize> {
        let inputs: Vec<EventInput> = snapshots.iter().map(EventSnapshot::to_input).collect();
        let restored = self.replace_all(&inputs)?;
        info!("Restored {} events from snapshots", restored);
        Ok(restored)
    }

    /// Like [`GraphStore::replace_events`], keeping the portfolio write-ups
    pub fn restore_records(&mut self, records: &[PortfolioRecord]) -> GraphResult<usize> {
        let inputs: Vec<EventInput> = records.iter().map(PortfolioRecord::to_input).collect();
        let restored = self.replace_all(&inputs)?;
        info!("Restored {} events from saved records", restored);
        Ok(restored)
    }
}

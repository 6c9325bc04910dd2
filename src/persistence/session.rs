//! Current-user context
//!
//! Holds which portfolio is active and moves events between a
//! [`GraphStore`] and a [`SnapshotStore`]. There is no authentication.

use super::samples::sample_events;
use super::store::SnapshotStore;
use super::{PersistenceError, PersistenceResult};
use crate::graph::GraphStore;
use tracing::{info, warn};

/// Where a load got its events from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// The user's saved events
    Saved(usize),
    /// Nothing saved yet; the demo records were added
    Samples(usize),
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<String>,
}

impl Session {
    /// Anonymous session
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_user(user: impl Into<String>) -> Self {
        Session {
            user: Some(user.into()),
        }
    }

    pub fn login(&mut self, user: impl Into<String>) {
        let user = user.into();
        info!("Session switched to user {}", user);
        self.user = Some(user);
    }

    pub fn logout(&mut self) {
        self.user = None;
    }

    pub fn user(&self) -> PersistenceResult<&str> {
        self.user.as_deref().ok_or(PersistenceError::NoActiveUser)
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Save the regular events of `graph` for the active user
    pub fn save(&self, graph: &GraphStore, store: &mut dyn SnapshotStore) -> PersistenceResult<usize> {
        let user = self.user()?;
        let records = graph.records();
        store.save(user, &records)?;
        Ok(records.len())
    }

    /// Replace the regular events of `graph` with what the active user saved.
    /// A user with no saved state gets the sample events; an anonymous session
    /// always does. If the saved records cannot be restored, `graph` is left
    /// untouched.
    pub fn load(&self, graph: &mut GraphStore, store: &dyn SnapshotStore) -> PersistenceResult<LoadSource> {
        let saved = match self.user.as_deref() {
            Some(user) => store.load(user)?,
            None => None,
        };

        match saved {
            Some(records) => Ok(LoadSource::Saved(graph.restore_records(&records)?)),
            None => {
                if self.user.is_none() {
                    warn!("No active user, loading sample events");
                }
                let restored = graph.replace_all(&sample_events())?;
                Ok(LoadSource::Samples(restored))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EventInput;
    use crate::persistence::{MemoryStore, PortfolioRecord};

    #[test]
    fn test_save_requires_user() {
        let graph = GraphStore::with_center();
        let mut store = MemoryStore::new();
        let session = Session::new();
        assert!(matches!(
            session.save(&graph, &mut store),
            Err(PersistenceError::NoActiveUser)
        ));
    }

    #[test]
    fn test_save_then_load() {
        let mut graph = GraphStore::with_center();
        graph.add_event(&EventInput::new("a").with_tags("#x")).unwrap();
        graph.add_event(&EventInput::new("b").with_tags("#x")).unwrap();

        let mut store = MemoryStore::new();
        let session = Session::for_user("alice");
        assert_eq!(session.save(&graph, &mut store).unwrap(), 2);

        let mut fresh = GraphStore::with_center();
        assert_eq!(session.load(&mut fresh, &store).unwrap(), LoadSource::Saved(2));
        assert_eq!(fresh.event_count(), 2);
        assert!(fresh.has_center());
    }

    #[test]
    fn test_load_keeps_write_up() {
        let mut graph = GraphStore::with_center();
        let id = graph
            .add_event(
                &EventInput::new("Hack")
                    .with_description("Built a bot")
                    .with_type("competition")
                    .with_result("1st place")
                    .with_reflection("learned"),
            )
            .unwrap();
        let mut store = MemoryStore::new();
        let session = Session::for_user("alice");
        session.save(&graph, &mut store).unwrap();

        let mut fresh = GraphStore::with_center();
        session.load(&mut fresh, &store).unwrap();
        let event = fresh.get_event(id).unwrap();
        assert_eq!(event.description, "Built a bot");
        assert_eq!(event.portfolio_type, "competition");
        assert_eq!(event.result, "1st place");
        assert_eq!(event.reflection, "learned");
    }

    #[test]
    fn test_failed_load_leaves_graph_alone() {
        let mut store = MemoryStore::new();
        let broken: Vec<PortfolioRecord> = serde_json::from_str(r#"[{"id": 5}, {"id": 6}, {"id": 5, "title": "dup"}]"#).unwrap();
        store.save("mallory", &broken).unwrap();

        let mut graph = GraphStore::with_center();
        graph.add_event(&EventInput::new("keep-me")).unwrap();
        let result = Session::for_user("mallory").load(&mut graph, &store);
        assert!(matches!(result, Err(PersistenceError::Graph(_))));

        let titles: Vec<&str> = graph.events().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["keep-me"]);
    }

    #[test]
    fn test_new_user_gets_samples() {
        let store = MemoryStore::new();
        let mut graph = GraphStore::with_center();

        let mut session = Session::new();
        assert_eq!(session.load(&mut graph, &store).unwrap(), LoadSource::Samples(3));

        session.login("new");
        assert_eq!(session.user().unwrap(), "new");
        assert_eq!(session.load(&mut graph, &store).unwrap(), LoadSource::Samples(3));
        assert_eq!(graph.event_count(), 3);

        session.logout();
        assert!(!session.is_logged_in());
    }
}

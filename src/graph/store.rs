//! In-memory portfolio graph
//!
//! Owns the authoritative event collection, the single center slot, the
//! visibility filter, the selection and the materialized connection set.
//! Structural mutations only mark the connection set dirty; the rendering
//! driver calls [`GraphStore::flush_frame`] once per frame.

use super::connection::{derive_connections, Connection, ConnectionDiff, EdgeGeometry};
use super::event::{Event, EventFilter, EventInput};
use super::frame::FrameScheduler;
use super::types::{ConnectionKey, ConnectionKind, EventId};
use crate::canvas::{CanvasTransform, Point};
use crate::config::GraphConfig;
use indexmap::IndexMap;
use rand::Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during graph operations
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Event {0} not found")]
    EventNotFound(EventId),

    #[error("Event {0} already exists")]
    EventAlreadyExists(EventId),

    #[error("The center node cannot be dragged")]
    CenterNotDraggable,

    #[error("Event {0} is hidden by the active filter")]
    EventHidden(EventId),

    #[error("Event id {0} is out of range")]
    EventIdOutOfRange(EventId),

    #[error("No event ids left to allocate")]
    IdSpaceExhausted,
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Output of one flushed frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameUpdate {
    /// Connections created/removed this frame (empty for geometry-only frames)
    pub diff: ConnectionDiff,
    pub geometry: Vec<EdgeGeometry>,
}

/// Result of finishing a node drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOutcome {
    pub id: EventId,
    pub from: Point,
    pub to: Point,
}

impl DragOutcome {
    pub fn moved(&self) -> bool {
        self.from != self.to
    }
}

/// Counts for status displays
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub event_count: usize,
    pub visible_count: usize,
    pub has_center: bool,
    pub tag_connections: usize,
    pub error_connections: usize,
    pub center_connections: usize,
}

#[derive(Debug, Clone, Copy)]
struct NodeDrag {
    id: EventId,
    /// Pointer position minus node position, in world units
    grab_offset: Point,
    start: Point,
}

/// In-memory graph storage
#[derive(Debug)]
pub struct GraphStore {
    /// Regular events in insertion order
    events: IndexMap<EventId, Event>,

    /// The single "self" node
    center: Option<Event>,

    /// Regular events hidden by the active filter
    hidden: FxHashSet<EventId>,

    active_filter: Option<EventFilter>,

    selected: Option<EventId>,

    /// Materialized view, valid as of the last sync
    connections: IndexMap<ConnectionKey, Connection>,

    frames: FrameScheduler,

    drag: Option<NodeDrag>,

    config: GraphConfig,

    next_event_id: u64,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore {
    /// Create an empty graph (no center)
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        GraphStore {
            events: IndexMap::new(),
            center: None,
            hidden: FxHashSet::default(),
            active_filter: None,
            selected: None,
            connections: IndexMap::new(),
            frames: FrameScheduler::new(),
            drag: None,
            config,
            next_event_id: 1,
        }
    }

    /// Empty graph holding the default center node
    pub fn with_center() -> Self {
        let mut store = Self::new();
        store.ensure_center();
        store
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Next free id. `next_event_id` never wraps, so the center id is
    /// never handed out.
    fn allocate_id(&mut self) -> GraphResult<EventId> {
        while self.events.contains_key(&EventId::new(self.next_event_id)) {
            self.next_event_id = self
                .next_event_id
                .checked_add(1)
                .ok_or(GraphError::IdSpaceExhausted)?;
        }
        let id = EventId::new(self.next_event_id);
        self.next_event_id = self
            .next_event_id
            .checked_add(1)
            .ok_or(GraphError::IdSpaceExhausted)?;
        Ok(id)
    }

    /// Add an event. A record flagged `isCenter` installs (or replaces) the
    /// center instead.
    pub fn add_event(&mut self, input: &EventInput) -> GraphResult<EventId> {
        if input.is_center() {
            return Ok(self.set_center(input));
        }

        let id = match input.id {
            Some(id) if id == EventId::CENTER || self.events.contains_key(&id) => {
                return Err(GraphError::EventAlreadyExists(id));
            }
            Some(id) => {
                let after = id
                    .as_u64()
                    .checked_add(1)
                    .ok_or(GraphError::EventIdOutOfRange(id))?;
                self.next_event_id = self.next_event_id.max(after);
                id
            }
            None => self.allocate_id()?,
        };

        let event = Event::create(id, input);
        self.refresh_visibility(&event);
        info!("Added event {} ({})", id, event.title);
        self.events.insert(id, event);
        self.frames.invalidate();
        Ok(id)
    }

    /// Add an event; records without a position are placed at random in the
    /// canvas placement band around the center.
    pub fn add_event_placed<R: Rng + ?Sized>(
        &mut self,
        input: &EventInput,
        canvas: &CanvasTransform,
        rng: &mut R,
    ) -> GraphResult<EventId> {
        if input.is_center() || input.has_position() {
            return self.add_event(input);
        }
        let origin = self.center.as_ref().map(Event::position).unwrap_or(Point::ORIGIN);
        let position = canvas.random_placement(rng, origin);

        let mut placed = input.clone();
        placed.x = Some(position.x);
        placed.y = Some(position.y);
        self.add_event(&placed)
    }

    /// Install the center node from a record, replacing any previous one
    pub fn set_center(&mut self, input: &EventInput) -> EventId {
        let mut center = Event::create(EventId::CENTER, input);
        center.is_center = true;
        self.install_center(center)
    }

    fn install_center(&mut self, center: Event) -> EventId {
        if self.center.is_some() {
            warn!("Replacing existing center node");
        } else {
            info!("Installed center node ({})", center.title);
        }
        self.center = Some(center);
        self.frames.invalidate();
        EventId::CENTER
    }

    /// Install the default center unless one exists
    pub fn ensure_center(&mut self) -> EventId {
        if self.center.is_none() {
            self.install_center(Event::center());
        }
        EventId::CENTER
    }

    pub fn center(&self) -> Option<&Event> {
        self.center.as_ref()
    }

    pub fn center_id(&self) -> Option<EventId> {
        self.center.as_ref().map(|c| c.id)
    }

    pub fn has_center(&self) -> bool {
        self.center.is_some()
    }

    /// Remove a regular event. Unknown ids and the center yield `false`.
    pub fn remove_event(&mut self, id: EventId) -> bool {
        if id == EventId::CENTER {
            warn!("Refusing to remove the center node");
            return false;
        }
        let Some(event) = self.events.shift_remove(&id) else {
            debug!("Remove ignored, event {} not found", id);
            return false;
        };

        self.hidden.remove(&id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.drag.is_some_and(|d| d.id == id) {
            self.drag = None;
        }
        info!("Removed event {} ({})", id, event.title);
        self.frames.invalidate();
        true
    }

    /// Merge a partial record into an event (center included).
    /// Unknown ids yield `false`.
    pub fn update_event(&mut self, id: EventId, input: &EventInput) -> bool {
        if id == EventId::CENTER {
            let Some(center) = self.center.as_mut() else {
                return false;
            };
            center.update(input);
        } else {
            let Some(event) = self.events.get_mut(&id) else {
                debug!("Update ignored, event {} not found", id);
                return false;
            };
            event.update(input);
            let visible = self
                .active_filter
                .as_ref()
                .map_or(true, |filter| event.matches_filter(filter));
            self.set_hidden(id, !visible);
        }

        debug!("Updated event {}", id);
        self.frames.invalidate();
        true
    }

    /// Store a new world position. Membership is unaffected, so only a
    /// geometry frame is requested.
    pub fn move_event(&mut self, id: EventId, position: Point) -> bool {
        let Some(event) = self.get_event_mut(id) else {
            return false;
        };
        event.move_to(position);
        self.frames.request_frame();
        true
    }

    /// Drop every regular event, keeping the center
    pub fn clear_events(&mut self) {
        let count = self.events.len();
        self.events.clear();
        self.hidden.clear();
        self.selected = None;
        self.drag = None;
        self.next_event_id = 1;
        info!("Cleared {} events", count);
        self.frames.invalidate();
    }

    /// Swap every regular event for `inputs`, keeping the center and the
    /// active filter. All-or-nothing: on error the graph is left as it was.
    pub fn replace_all(&mut self, inputs: &[EventInput]) -> GraphResult<usize> {
        let mut staged = GraphStore::with_config(self.config.clone());
        staged.active_filter = self.active_filter.clone();
        for input in inputs {
            staged.add_event(input)?;
        }

        if let Some(center) = staged.center.take() {
            self.install_center(center);
        }
        let count = staged.events.len();
        self.events = staged.events;
        self.hidden = staged.hidden;
        self.next_event_id = staged.next_event_id;
        self.selected = None;
        self.drag = None;
        info!("Replaced regular events with {} records", count);
        self.frames.invalidate();
        Ok(count)
    }

    /// Look up any event, the center included
    pub fn get_event(&self, id: EventId) -> Option<&Event> {
        if id == EventId::CENTER {
            return self.center.as_ref();
        }
        self.events.get(&id)
    }

    fn get_event_mut(&mut self, id: EventId) -> Option<&mut Event> {
        if id == EventId::CENTER {
            return self.center.as_mut();
        }
        self.events.get_mut(&id)
    }

    /// Regular events in insertion order
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    // ---- filtering ----

    fn refresh_visibility(&mut self, event: &Event) {
        let visible = self
            .active_filter
            .as_ref()
            .map_or(true, |filter| event.matches_filter(filter));
        self.set_hidden(event.id, !visible);
    }

    fn set_hidden(&mut self, id: EventId, hidden: bool) {
        if hidden {
            self.hidden.insert(id);
        } else {
            self.hidden.remove(&id);
        }
    }

    /// Hide regular events that fail `filter`; data is kept. An empty filter
    /// clears filtering. Returns the number of visible regular events.
    pub fn apply_filter(&mut self, filter: EventFilter) -> usize {
        self.active_filter = if filter.is_empty() { None } else { Some(filter) };

        self.hidden = match &self.active_filter {
            Some(filter) => self
                .events
                .values()
                .filter(|e| !e.matches_filter(filter))
                .map(|e| e.id)
                .collect(),
            None => FxHashSet::default(),
        };

        let visible = self.events.len() - self.hidden.len();
        info!("Filter applied: {} of {} events visible", visible, self.events.len());
        self.frames.invalidate();
        visible
    }

    pub fn clear_filter(&mut self) -> usize {
        self.apply_filter(EventFilter::default())
    }

    pub fn active_filter(&self) -> Option<&EventFilter> {
        self.active_filter.as_ref()
    }

    /// The center is always visible; unknown ids are not
    pub fn is_visible(&self, id: EventId) -> bool {
        if id == EventId::CENTER {
            return self.center.is_some();
        }
        self.events.contains_key(&id) && !self.hidden.contains(&id)
    }

    pub fn visible_events(&self) -> impl Iterator<Item = &Event> {
        self.events.values().filter(|e| !self.hidden.contains(&e.id))
    }

    // ---- selection ----

    /// Select a regular event, replacing any prior selection
    pub fn select_event(&mut self, id: EventId) -> bool {
        if !self.events.contains_key(&id) {
            return false;
        }
        self.selected = Some(id);
        debug!("Selected event {}", id);
        true
    }

    /// Also what a click on empty canvas space does
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<EventId> {
        self.selected
    }

    pub fn selected_event(&self) -> Option<&Event> {
        self.selected.and_then(|id| self.events.get(&id))
    }

    // ---- connections ----

    /// Fresh connection set over visible regular events and the center
    pub fn derive_connections(&self) -> Vec<Connection> {
        derive_connections(self.visible_events(), self.center.as_ref())
    }

    /// Bring the materialized set in line with the derived one
    pub fn sync_connections(&mut self) -> ConnectionDiff {
        let desired: IndexMap<ConnectionKey, Connection> = self
            .derive_connections()
            .into_iter()
            .map(|c| (c.key, c))
            .collect();

        let removed: Vec<ConnectionKey> = self
            .connections
            .keys()
            .filter(|key| !desired.contains_key(*key))
            .copied()
            .collect();
        let added: Vec<ConnectionKey> = desired
            .keys()
            .filter(|key| !self.connections.contains_key(*key))
            .copied()
            .collect();

        self.connections = desired;
        self.frames.membership_synced();

        if !added.is_empty() || !removed.is_empty() {
            debug!(
                "Connections synced: +{} -{} (total {})",
                added.len(),
                removed.len(),
                self.connections.len()
            );
        }
        ConnectionDiff { added, removed }
    }

    /// Materialized connections as of the last sync
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn has_connection(&self, key: &ConnectionKey) -> bool {
        self.connections.contains_key(key)
    }

    /// Geometry of every materialized connection, from world positions
    pub fn connection_geometry(&self) -> Vec<EdgeGeometry> {
        self.connections
            .values()
            .filter_map(|c| {
                let source = self.get_event(c.source)?;
                let target = self.get_event(c.target)?;
                Some(EdgeGeometry::between(c.key, source, target, &self.config))
            })
            .collect()
    }

    pub fn is_frame_pending(&self) -> bool {
        self.frames.is_frame_pending()
    }

    /// Run the pending frame: rebuild membership if dirty, then lay out all
    /// edges. `None` when no frame was requested.
    pub fn flush_frame(&mut self) -> Option<FrameUpdate> {
        let plan = self.frames.begin_frame()?;
        let diff = if plan.rebuild_membership {
            self.sync_connections()
        } else {
            ConnectionDiff::default()
        };
        Some(FrameUpdate {
            diff,
            geometry: self.connection_geometry(),
        })
    }

    // ---- node dragging ----

    /// Start dragging a visible regular event grabbed at `screen`
    pub fn begin_node_drag(
        &mut self,
        id: EventId,
        screen: Point,
        canvas: &CanvasTransform,
    ) -> GraphResult<()> {
        if id == EventId::CENTER {
            return Err(GraphError::CenterNotDraggable);
        }
        let event = self.events.get(&id).ok_or(GraphError::EventNotFound(id))?;
        if self.hidden.contains(&id) {
            return Err(GraphError::EventHidden(id));
        }

        let start = event.position();
        self.drag = Some(NodeDrag {
            id,
            grab_offset: canvas.screen_to_world(screen) - start,
            start,
        });
        debug!("Drag started for event {}", id);
        Ok(())
    }

    /// Move the dragged node under the pointer, snapped to the grid.
    /// Returns the new world position, or `None` without an active drag.
    pub fn drag_node_to(&mut self, screen: Point, canvas: &CanvasTransform) -> Option<Point> {
        let drag = self.drag?;
        let position = canvas.snap_to_grid(canvas.screen_to_world(screen) - drag.grab_offset);
        self.events.get_mut(&drag.id)?.move_to(position);
        self.frames.request_frame();
        Some(position)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn end_node_drag(&mut self) -> Option<DragOutcome> {
        let drag = self.drag.take()?;
        let to = self.events.get(&drag.id)?.position();
        Some(DragOutcome {
            id: drag.id,
            from: drag.start,
            to,
        })
    }

    pub fn statistics(&self) -> GraphStatistics {
        let mut stats = GraphStatistics {
            event_count: self.events.len(),
            visible_count: self.events.len() - self.hidden.len(),
            has_center: self.center.is_some(),
            ..Default::default()
        };
        for connection in self.connections.values() {
            match connection.kind() {
                ConnectionKind::Tag => stats.tag_connections += 1,
                ConnectionKind::Error => stats.error_connections += 1,
                ConnectionKind::Center => stats.center_connections += 1,
            }
        }
        stats
    }
}

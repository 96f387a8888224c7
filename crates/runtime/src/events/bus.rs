//! Topic-based event bus implementation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{BoardEvent, CombatEvent, MatchEvent, TurnEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Turn rotation and countdowns
    Turn,
    /// Fights, their timers and results
    Combat,
    /// Moves, doors and respawns
    Board,
    /// Abandonment and match end
    Match,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Turn, Topic::Combat, Topic::Board, Topic::Match];

    const fn index(self) -> usize {
        match self {
            Topic::Turn => 0,
            Topic::Combat => 1,
            Topic::Board => 2,
            Topic::Match => 3,
        }
    }
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Event {
    Turn(TurnEvent),
    Combat(CombatEvent),
    Board(BoardEvent),
    Match(MatchEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Turn(_) => Topic::Turn,
            Event::Combat(_) => Topic::Combat,
            Event::Board(_) => Topic::Board,
            Event::Match(_) => Topic::Match,
        }
    }

    /// Access code of the match that produced the event.
    pub fn match_id(&self) -> &str {
        match self {
            Event::Turn(event) => event.match_id(),
            Event::Combat(event) => event.match_id(),
            Event::Board(event) => event.match_id(),
            Event::Match(event) => event.match_id(),
        }
    }
}

impl From<TurnEvent> for Event {
    fn from(event: TurnEvent) -> Self {
        Event::Turn(event)
    }
}

impl From<CombatEvent> for Event {
    fn from(event: CombatEvent) -> Self {
        Event::Combat(event)
    }
}

impl From<BoardEvent> for Event {
    fn from(event: BoardEvent) -> Self {
        Event::Board(event)
    }
}

impl From<MatchEvent> for Event {
    fn from(event: MatchEvent) -> Self {
        Event::Match(event)
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Every match worker publishes into the same bus;
/// filter on [`Event::match_id`] to follow a single match.
#[derive(Clone, Debug)]
pub struct EventBus {
    channels: Arc<[broadcast::Sender<Event>; 4]>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Topic::ALL.map(|_| broadcast::channel(capacity.max(1)).0);
        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();
        if self.channels[topic.index()].send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels[topic.index()].subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    pub fn subscribe_all(&self) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        self.subscribe_multiple(&Topic::ALL)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

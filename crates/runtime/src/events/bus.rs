//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{CacheEvent, SessionEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Session lifecycle, rounds, and evaluations
    Session,
    /// Offline cache install, activation, and serving
    Cache,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Session(SessionEvent),
    Cache(CacheEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Session(_) => Topic::Session,
            Event::Cache(_) => Topic::Cache,
        }
    }
}

impl From<SessionEvent> for Event {
    fn from(event: SessionEvent) -> Self {
        Event::Session(event)
    }
}

impl From<CacheEvent> for Event {
    fn from(event: CacheEvent) -> Self {
        Event::Cache(event)
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Cloning shares the underlying channels.
#[derive(Clone)]
pub struct EventBus {
    session: broadcast::Sender<Event>,
    cache: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            session: broadcast::channel(capacity).0,
            cache: broadcast::channel(capacity).0,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Session => &self.session,
            Topic::Cache => &self.cache,
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use game_core::{GameKind, SessionId};

    use super::*;

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut sessions = bus.subscribe(Topic::Session);
        let mut cache = bus.subscribe(Topic::Cache);

        bus.publish(SessionEvent::Started {
            id: SessionId(1),
            kind: GameKind::Letters,
        });

        assert_eq!(sessions.recv().await.unwrap().topic(), Topic::Session);
        assert!(cache.try_recv().is_err());
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish(CacheEvent::InstallStarted {
            cache_name: "treehouse-games-v16-superwhy".into(),
            urls: 7,
        });
    }
}

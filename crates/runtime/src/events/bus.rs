//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::broadcast;

use fight_core::{EventFamily, FightEvent, FightId};

/// Topics for event routing, one per event family.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Joins, placement, start, end and cancellation
    Lifecycle,
    /// Turn start, skip and end
    Turn,
    /// Action start and termination
    Action,
    /// Life, points, buffs, states and positions
    Mutation,
}

impl From<EventFamily> for Topic {
    fn from(family: EventFamily) -> Self {
        match family {
            EventFamily::Lifecycle => Topic::Lifecycle,
            EventFamily::Turn => Topic::Turn,
            EventFamily::Action => Topic::Action,
            EventFamily::Mutation => Topic::Mutation,
        }
    }
}

/// A fight event tagged with the fight that emitted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub fight: FightId,
    pub event: FightEvent,
}

impl Event {
    pub fn topic(&self) -> Topic {
        self.event.family().into()
    }
}

/// Topic-based event bus
///
/// Shared by every fight of a service. Delivery is best-effort: slow
/// subscribers lag and publishing without subscribers is not an error.
#[derive(Clone)]
pub struct EventBus {
    lifecycle: broadcast::Sender<Event>,
    turn: broadcast::Sender<Event>,
    action: broadcast::Sender<Event>,
    mutation: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lifecycle: broadcast::channel(capacity).0,
            turn: broadcast::channel(capacity).0,
            action: broadcast::channel(capacity).0,
            mutation: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Lifecycle => &self.lifecycle,
            Topic::Turn => &self.turn,
            Topic::Action => &self.action,
            Topic::Mutation => &self.mutation,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_reach_their_topic_only() {
        let bus = EventBus::with_capacity(8);
        let mut turns = bus.subscribe(Topic::Turn);
        let mut lifecycle = bus.subscribe(Topic::Lifecycle);

        bus.publish(Event {
            fight: FightId(1),
            event: FightEvent::FightCancelled,
        });

        assert_eq!(lifecycle.recv().await.unwrap().event, FightEvent::FightCancelled);
        assert!(matches!(
            turns.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }
}

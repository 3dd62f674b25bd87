use bevy_ecs::entity::Entity;

use super::components::EventDescriptor;

/// Semantic notification produced for a sensor entity that was touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionEvent {
    pub entity: Entity,
    pub event: EventDescriptor,
}

/// Sink for the game-level events the bridge emits during the update stage.
pub trait EventPublisher {
    fn post(&mut self, entity: Entity, event: EventDescriptor);
}

/// Publisher that keeps every event in order of publication.
#[derive(Debug, Default, Clone)]
pub struct EventBuffer {
    events: Vec<CollisionEvent>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[CollisionEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, CollisionEvent> {
        self.events.drain(..)
    }
}

impl EventPublisher for EventBuffer {
    fn post(&mut self, entity: Entity, event: EventDescriptor) {
        self.events.push(CollisionEvent { entity, event });
    }
}

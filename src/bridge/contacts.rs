//! Deferred contact pipeline.
//!
//! The scene raises contact callbacks while it steps, possibly on a worker
//! thread. [`ContactEventAdapter`] only records one [`PendingContact`] per
//! body side. The frame thread later drains the queue with
//! [`notify_collisions`] and publishes sensor events against the world.

use std::sync::Arc;

use bevy_ecs::world::World;
use parking_lot::Mutex;

use super::{
    backref::{BackReference, SharedBackReferences},
    components::CollisionSensor,
    events::EventPublisher,
};
use crate::{
    core::types::Transform,
    scene::events::{ContactPairHeader, SimulationEventCallback, TriggerPair},
    utils::allocator::BodyHandle,
};

/// One side of a confirmed contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingContact {
    pub body: BodyHandle,
    /// `None` for bodies the lifecycle manager did not create.
    pub back_reference: Option<BackReference>,
}

/// Append-only buffer shared by the event adapter and the drain.
#[derive(Debug, Default, Clone)]
pub struct ContactQueue {
    inner: Arc<Mutex<Vec<PendingContact>>>,
}

impl ContactQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, contact: PendingContact) {
        self.inner.lock().push(contact);
    }

    /// Takes every pending record, leaving the queue empty.
    pub fn drain(&self) -> Vec<PendingContact> {
        std::mem::take(&mut *self.inner.lock())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

/// Scene callback that turns touch reports into pending contacts.
pub struct ContactEventAdapter {
    queue: ContactQueue,
    back_references: SharedBackReferences,
}

impl ContactEventAdapter {
    pub fn new(queue: ContactQueue, back_references: SharedBackReferences) -> Self {
        Self {
            queue,
            back_references,
        }
    }
}

impl SimulationEventCallback for ContactEventAdapter {
    fn on_contact(&self, header: &ContactPairHeader) {
        let table = self.back_references.read();
        for body in header.actors {
            self.queue.push(PendingContact {
                body,
                back_reference: table.get(body),
            });
        }
    }

    fn on_trigger(&self, pairs: &[TriggerPair]) {
        for pair in pairs {
            log::debug!(
                "Trigger {:?}: {:?} / {:?}",
                pair.status,
                pair.trigger_actor,
                pair.other_actor
            );
        }
    }

    fn on_sleep(&self, actors: &[BodyHandle]) {
        log::debug!("{} bodies fell asleep", actors.len());
    }

    fn on_wake(&self, actors: &[BodyHandle]) {
        log::debug!("{} bodies woke up", actors.len());
    }

    fn on_advance(&self, poses: &[(BodyHandle, Transform)]) {
        log::trace!("Advance reported {} poses", poses.len());
    }
}

/// Drains the queue and publishes `on_collision` for every touched sensor
/// entity. Returns the number of events published.
pub fn notify_collisions(
    queue: &ContactQueue,
    world: &World,
    publisher: &mut dyn EventPublisher,
) -> usize {
    let mut published = 0;
    for contact in queue.drain() {
        let Some(back_reference) = contact.back_reference else {
            log::trace!("Dropping contact on unbound body {:?}", contact.body);
            continue;
        };
        match world.get::<CollisionSensor>(back_reference.entity) {
            Some(sensor) => {
                publisher.post(back_reference.entity, sensor.on_collision);
                published += 1;
            }
            None => {
                if world.get_entity(back_reference.entity).is_err() {
                    log::debug!("Dropping contact for despawned {:?}", back_reference.entity);
                }
            }
        }
    }
    published
}

//! Glue between a `bevy_ecs` world and the simulation scene.

pub mod backref;
pub mod components;
pub mod contacts;
pub mod events;
pub mod lifecycle;
pub mod module;
pub mod stepper;
pub mod sync;

pub use backref::{BackReference, BackReferenceTable, SharedBackReferences};
pub use components::{
    CollisionSensor, DynamicBinding, DynamicBody, EventDescriptor, Position, StaticBinding,
    StaticBody,
};
pub use contacts::{notify_collisions, ContactEventAdapter, ContactQueue, PendingContact};
pub use events::{CollisionEvent, EventBuffer, EventPublisher};
pub use lifecycle::{descriptors, BodyLifecycle, ShapeSet};
pub use module::{FrameReport, PhysicsModule};
pub use stepper::SimulationStepper;
pub use sync::{pull_dynamic_transforms, push_transforms};

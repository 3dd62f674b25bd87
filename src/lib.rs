//! Particle Bridge – rigid-body physics for `bevy_ecs` worlds.
//!
//! The crate binds entities carrying [`StaticBody`], [`DynamicBody`] or
//! [`CollisionSensor`] components to bodies in an in-crate simulation scene,
//! keeps positions and masses in sync every frame, filters body pairs through
//! a bit-packed collision filter, and turns contacts on sensor entities into
//! game events.
//!
//! ```no_run
//! use bevy_ecs::world::World;
//! use particle_bridge::{
//!     CollisionSensor, DynamicBody, EventBuffer, EventDescriptor, PhysicsModule, Position,
//!     SceneConfig,
//! };
//!
//! let mut module = PhysicsModule::load(SceneConfig::default())?;
//! let mut world = World::new();
//! world.spawn((
//!     Position::new(0.0, 2.0, 0.0),
//!     DynamicBody::new(1.0),
//!     CollisionSensor::new(EventDescriptor::from_name("crate_landed")),
//! ));
//!
//! let mut events = EventBuffer::new();
//! module.run_frame(&mut world, &mut events);
//! # Ok::<(), particle_bridge::BridgeError>(())
//! ```

pub mod bridge;
pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod filter;
pub mod scene;
pub mod utils;

pub use glam::{Quat, Vec3};

pub use bridge::{
    BackReference, BackReferenceTable, CollisionEvent, CollisionSensor, DynamicBinding,
    DynamicBody, EventBuffer, EventDescriptor, EventPublisher, FrameReport, PhysicsModule,
    Position, StaticBinding, StaticBody,
};
pub use config::{BroadPhaseKind, MaterialConfig, SceneConfig};
pub use core::{
    rigidbody::{ActorKind, RigidActor},
    shape::{Shape, ShapeGeometry},
    types::{Material, Transform},
};
pub use error::{BridgeError, ConfigError, Result};
pub use filter::{
    contact_report_filter_shader, Capabilities, FilterData, FilterDescriptor,
    FilterObjectAttributes, PairFilter, PairFlags,
};
pub use scene::{
    CpuDispatcher, SceneDesc, SimulationEventCallback, SimulationScene, TriggerPair, TriggerStatus,
};
pub use utils::allocator::{BodyHandle, ShapeHandle};

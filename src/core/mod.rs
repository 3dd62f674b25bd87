//! Core types describing simulated actors, shapes, and shared data.

pub mod types;
pub mod rigidbody;
pub mod shape;

pub use types::{
    InertiaTensorExt, MassProperties, Material, MaterialPairProperties, Transform, Velocity,
};
pub use rigidbody::{ActorKind, RigidActor};
pub use shape::{Shape, ShapeBuilder, ShapeGeometry};

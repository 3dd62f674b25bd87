//! Collision detection modules: broad-phase candidate search and narrow-phase contacts.

pub mod broadphase;
pub mod narrowphase;

pub use broadphase::{BroadPhase, BroadPhaseProxy, SpatialGrid};
pub use narrowphase::{ContactPoint, NarrowPhase, SATAlgorithm};

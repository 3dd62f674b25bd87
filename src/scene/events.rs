//! Event subscription contract between the scene and its owner.
//!
//! All callbacks run during [`super::SimulationScene::advance`], on a
//! dispatcher worker thread when the scene has one.

use crate::{
    collision::narrowphase::ContactPoint,
    core::types::Transform,
    filter::PairFlags,
    utils::allocator::{BodyHandle, ShapeHandle},
};

/// Shape-level detail of a contact report.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactPair {
    pub shapes: [ShapeHandle; 2],
    /// Which notifications fired for this pair.
    pub events: PairFlags,
    pub contact: ContactPoint,
}

/// Contact report for one pair of actors.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactPairHeader {
    pub actors: [BodyHandle; 2],
    pub pairs: Vec<ContactPair>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerStatus {
    Found,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerPair {
    pub trigger_actor: BodyHandle,
    pub trigger_shape: ShapeHandle,
    pub other_actor: BodyHandle,
    pub other_shape: ShapeHandle,
    pub status: TriggerStatus,
}

/// Callbacks the scene raises while stepping.
pub trait SimulationEventCallback: Send + Sync {
    /// A pair requesting touch notification started touching.
    fn on_contact(&self, header: &ContactPairHeader);

    fn on_trigger(&self, _pairs: &[TriggerPair]) {}

    fn on_sleep(&self, _actors: &[BodyHandle]) {}

    fn on_wake(&self, _actors: &[BodyHandle]) {}

    /// Post-integration poses of awake dynamic actors, when enabled on the scene.
    fn on_advance(&self, _poses: &[(BodyHandle, Transform)]) {}
}

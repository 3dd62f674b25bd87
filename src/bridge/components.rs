//! Components the bridge reads from and writes to the entity world.

use bevy_ecs::component::Component;
use glam::Vec3;

use crate::utils::allocator::BodyHandle;

/// World-space position of an entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl From<Vec3> for Position {
    fn from(value: Vec3) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

/// Marks an entity that should get an immovable body.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StaticBody;

/// Marks an entity that should get a simulated body of the given mass.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct DynamicBody {
    pub mass: f32,
}

impl DynamicBody {
    pub fn new(mass: f32) -> Self {
        Self { mass }
    }

    /// Finite and strictly positive.
    pub fn has_valid_mass(&self) -> bool {
        self.mass.is_finite() && self.mass > 0.0
    }
}

/// Identifier of a game event published when a sensor entity is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventDescriptor(pub u32);

impl EventDescriptor {
    /// Stable id derived from an event name (32-bit FNV-1a).
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash: u32 = 0x811c_9dc5;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u32;
            hash = hash.wrapping_mul(0x0100_0193);
            i += 1;
        }
        Self(hash)
    }
}

/// Entity wants to be notified when something touches it.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionSensor {
    pub on_collision: EventDescriptor,
}

impl CollisionSensor {
    pub fn new(on_collision: EventDescriptor) -> Self {
        Self { on_collision }
    }
}

/// Entity owns a static scene body.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StaticBinding {
    pub handle: BodyHandle,
}

/// Entity owns a dynamic scene body.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DynamicBinding {
    pub handle: BodyHandle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_ids_are_stable_and_distinct() {
        const HIT: EventDescriptor = EventDescriptor::from_name("hit");
        assert_eq!(HIT, EventDescriptor::from_name("hit"));
        assert_ne!(HIT, EventDescriptor::from_name("pickup"));
        assert_eq!(EventDescriptor::from_name("").0, 0x811c_9dc5);
    }

    #[test]
    fn mass_validation_rejects_degenerate_values() {
        assert!(DynamicBody::new(2.0).has_valid_mass());
        assert!(!DynamicBody::new(0.0).has_valid_mass());
        assert!(!DynamicBody::new(-1.0).has_valid_mass());
        assert!(!DynamicBody::new(f32::NAN).has_valid_mass());
        assert!(!DynamicBody::new(f32::INFINITY).has_valid_mass());
    }
}

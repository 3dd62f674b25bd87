//! Position and mass synchronization between entities and scene bodies.

use bevy_ecs::{entity::Entity, world::World};

use super::components::{DynamicBinding, DynamicBody, Position, StaticBinding};
use crate::{core::types::Transform, scene::SimulationScene, utils::allocator::BodyHandle};

/// Pushes every bound entity's position, and every dynamic entity's mass,
/// into the scene. Runs before the step.
pub fn push_transforms(world: &mut World, scene: &mut SimulationScene) {
    let mut statics = world.query::<(&StaticBinding, &Position)>();
    for (binding, position) in statics.iter(world) {
        set_position(scene, binding.handle, *position);
    }

    let mut dynamics = world.query::<(Entity, &DynamicBinding, &Position, Option<&DynamicBody>)>();
    for (entity, binding, position, body) in dynamics.iter(world) {
        set_position(scene, binding.handle, *position);
        match body {
            Some(body) if body.has_valid_mass() => {
                scene.set_mass(binding.handle, body.mass);
            }
            Some(body) => log::warn!("Ignoring invalid mass {} on {entity:?}", body.mass),
            None => {}
        }
    }
}

fn set_position(scene: &mut SimulationScene, handle: BodyHandle, position: Position) {
    let Some(current) = scene.global_pose(handle) else {
        return;
    };
    let pose = Transform::from_position_rotation(position.to_vec3(), current.rotation);
    scene.set_global_pose(handle, pose);
}

/// Copies post-step positions of dynamic bodies back into their entities.
/// Static bodies are never read back.
pub fn pull_dynamic_transforms(world: &mut World, scene: &SimulationScene) {
    let mut dynamics = world.query::<(&DynamicBinding, &mut Position)>();
    for (binding, mut position) in dynamics.iter_mut(world) {
        if let Some(pose) = scene.global_pose(binding.handle) {
            *position = Position::from(pose.position);
        }
    }
}

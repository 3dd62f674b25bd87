//! Creation and release of scene bodies for physics-bound entities.

use bevy_ecs::{
    entity::Entity,
    query::{Has, Or, With, Without},
    world::World,
};
use glam::Vec3;

use super::{
    backref::SharedBackReferences,
    components::{CollisionSensor, DynamicBinding, DynamicBody, Position, StaticBinding, StaticBody},
};
use crate::{
    config::{categories, SceneConfig},
    core::{
        shape::Shape,
        types::{Material, Transform},
    },
    filter::{Capabilities, FilterDescriptor},
    scene::SimulationScene,
    utils::allocator::{BodyHandle, ShapeHandle},
};

type Unbound = (Without<StaticBinding>, Without<DynamicBinding>);

/// Filter descriptors of the three pre-built shapes.
pub mod descriptors {
    use super::*;

    pub fn collide_only() -> FilterDescriptor {
        FilterDescriptor::new(
            categories::COLLIDE_ONLY,
            categories::ALL,
            Capabilities::ENABLED | Capabilities::COLLIDES,
        )
    }

    pub fn collide_and_notify() -> FilterDescriptor {
        FilterDescriptor::new(
            categories::COLLIDE_AND_NOTIFY,
            categories::ALL,
            Capabilities::ENABLED | Capabilities::COLLIDES | Capabilities::SENSOR,
        )
    }

    pub fn notify_only() -> FilterDescriptor {
        FilterDescriptor::new(
            categories::NOTIFY_ONLY,
            categories::ALL,
            Capabilities::ENABLED | Capabilities::SENSOR,
        )
    }
}

/// The fixed set of shapes bodies are built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeSet {
    pub collide_only: ShapeHandle,
    pub collide_and_notify: ShapeHandle,
    pub notify_only: ShapeHandle,
}

impl ShapeSet {
    /// Creates the three box shapes in `scene`, sharing one material.
    pub fn build(scene: &mut SimulationScene, config: &SceneConfig) -> Self {
        let material = Material::from(config.material);
        let half_extents = Vec3::splat(config.shape_half_extent);
        let mut make = |descriptor: FilterDescriptor| {
            scene.create_shape(
                Shape::builder()
                    .box_shape(half_extents)
                    .material(material)
                    .filter_data(descriptor.encode())
                    .build(),
            )
        };

        Self {
            collide_only: make(descriptors::collide_only()),
            collide_and_notify: make(descriptors::collide_and_notify()),
            notify_only: make(descriptors::notify_only()),
        }
    }

    /// Shape for a static or dynamic body.
    pub fn select(&self, has_sensor: bool) -> ShapeHandle {
        if has_sensor {
            self.collide_and_notify
        } else {
            self.collide_only
        }
    }
}

/// Binds unbound entities to new scene bodies.
pub struct BodyLifecycle {
    shapes: ShapeSet,
    back_references: SharedBackReferences,
}

impl BodyLifecycle {
    pub fn new(shapes: ShapeSet, back_references: SharedBackReferences) -> Self {
        Self {
            shapes,
            back_references,
        }
    }

    pub fn shapes(&self) -> &ShapeSet {
        &self.shapes
    }

    /// Creates bodies for every eligible unbound entity. Entities with bad
    /// data are left unbound and picked up again on the next call.
    ///
    /// Returns the number of bodies created.
    pub fn create_bodies(&self, world: &mut World, scene: &mut SimulationScene) -> usize {
        self.log_missing_positions(world);

        let statics: Vec<(Entity, Position, bool)> = world
            .query_filtered::<
                (Entity, &Position, Has<CollisionSensor>),
                (With<StaticBody>, Without<DynamicBody>, Unbound),
            >()
            .iter(world)
            .map(|(entity, position, sensor)| (entity, *position, sensor))
            .collect();

        let dynamics: Vec<(Entity, Position, DynamicBody, bool)> = world
            .query_filtered::<(Entity, &Position, &DynamicBody, Has<CollisionSensor>), Unbound>()
            .iter(world)
            .map(|(entity, position, body, sensor)| (entity, *position, *body, sensor))
            .collect();

        let sensors: Vec<(Entity, Position)> = world
            .query_filtered::<(Entity, &Position), (
                With<CollisionSensor>,
                Without<StaticBody>,
                Without<DynamicBody>,
                Unbound,
            )>()
            .iter(world)
            .map(|(entity, position)| (entity, *position))
            .collect();

        let mut created = 0;

        for (entity, position, has_sensor) in statics {
            let handle = self.spawn_static(scene, entity, position, self.shapes.select(has_sensor));
            if let Ok(mut entity_mut) = world.get_entity_mut(entity) {
                entity_mut.insert(StaticBinding { handle });
                created += 1;
            }
        }

        for (entity, position, body, has_sensor) in dynamics {
            if !body.has_valid_mass() {
                log::warn!("Skipping {entity:?}: invalid mass {}", body.mass);
                continue;
            }
            let pose = Transform::from_position(position.to_vec3());
            let handle = scene.create_rigid_dynamic(pose);
            scene.attach_shape(handle, self.shapes.select(has_sensor));
            scene.update_mass_and_inertia(handle, body.mass);
            scene.add_actor(handle);
            self.back_references.write().insert(handle, entity);
            if let Ok(mut entity_mut) = world.get_entity_mut(entity) {
                entity_mut.insert(DynamicBinding { handle });
                created += 1;
            }
        }

        for (entity, position) in sensors {
            let handle = self.spawn_static(scene, entity, position, self.shapes.notify_only);
            if let Ok(mut entity_mut) = world.get_entity_mut(entity) {
                entity_mut.insert(StaticBinding { handle });
                created += 1;
            }
        }

        if created > 0 {
            log::debug!("Created {created} physics bodies");
        }
        created
    }

    fn spawn_static(
        &self,
        scene: &mut SimulationScene,
        entity: Entity,
        position: Position,
        shape: ShapeHandle,
    ) -> BodyHandle {
        let handle = scene.create_rigid_static(Transform::from_position(position.to_vec3()));
        scene.attach_shape(handle, shape);
        scene.add_actor(handle);
        self.back_references.write().insert(handle, entity);
        handle
    }

    fn log_missing_positions(&self, world: &mut World) {
        let mut query = world.query_filtered::<Entity, (
            Or<(With<StaticBody>, With<DynamicBody>)>,
            Without<Position>,
            Unbound,
        )>();
        for entity in query.iter(world) {
            log::debug!("Skipping {entity:?}: no position");
        }
    }

    /// Unbinds `entity`: removes its binding component, back-reference and
    /// scene body. Returns false if the entity had no binding.
    pub fn release(&self, world: &mut World, scene: &mut SimulationScene, entity: Entity) -> bool {
        let Ok(mut entity_mut) = world.get_entity_mut(entity) else {
            return false;
        };
        let handle = match (
            entity_mut.take::<StaticBinding>(),
            entity_mut.take::<DynamicBinding>(),
        ) {
            (Some(binding), _) => binding.handle,
            (None, Some(binding)) => binding.handle,
            (None, None) => return false,
        };

        self.back_references.write().remove(handle);
        scene.remove_actor(handle);
        log::debug!("Released body {handle:?} of {entity:?}");
        true
    }
}

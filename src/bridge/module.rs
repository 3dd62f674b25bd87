use std::{path::Path, sync::Arc};

use bevy_ecs::{entity::Entity, world::World};

use super::{
    backref::{BackReferenceTable, SharedBackReferences},
    contacts::{notify_collisions, ContactEventAdapter, ContactQueue},
    events::EventPublisher,
    lifecycle::{BodyLifecycle, ShapeSet},
    stepper::SimulationStepper,
    sync::{pull_dynamic_transforms, push_transforms},
};
use crate::{config::SceneConfig, error::Result, scene::SimulationScene};

/// What one call to [`PhysicsModule::run_frame`] did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub bodies_created: usize,
    pub contacts_drained: usize,
    pub events_published: usize,
}

/// Long-lived owner of the scene, its worker pool, the pre-built shapes and
/// the contact pipeline.
///
/// A frame is split into three calls so a host scheduler can place each in
/// its own stage:
///
/// 1. [`run_logic_stage`](Self::run_logic_stage): bind new entities, push positions and masses.
/// 2. [`step`](Self::step): advance the scene by the configured time step.
/// 3. [`run_update_stage`](Self::run_update_stage): pull dynamic positions, publish sensor events.
///
/// [`run_frame`](Self::run_frame) runs all of them in order.
pub struct PhysicsModule {
    // Released in reverse order of acquisition: shapes, scene, pool.
    lifecycle: BodyLifecycle,
    stepper: SimulationStepper,
    queue: ContactQueue,
    back_references: SharedBackReferences,
    config: SceneConfig,
}

impl PhysicsModule {
    pub fn load(config: SceneConfig) -> Result<Self> {
        config.validate()?;

        let queue = ContactQueue::new();
        let back_references = BackReferenceTable::shared();
        let adapter = Arc::new(ContactEventAdapter::new(
            queue.clone(),
            Arc::clone(&back_references),
        ));

        let mut stepper = SimulationStepper::new(&config, adapter)?;
        let shapes = ShapeSet::build(stepper.scene_mut(), &config);
        let lifecycle = BodyLifecycle::new(shapes, Arc::clone(&back_references));

        log::debug!(
            "Physics module loaded: {} workers, time step {:.4} s",
            stepper.worker_count(),
            config.time_step
        );

        Ok(Self {
            lifecycle,
            stepper,
            queue,
            back_references,
            config,
        })
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::load(SceneConfig::from_file(path)?)
    }

    /// Binds new entities, then pushes positions and masses into the scene.
    /// Returns the number of bodies created.
    pub fn run_logic_stage(&mut self, world: &mut World) -> usize {
        let created = self.lifecycle.create_bodies(world, self.stepper.scene_mut());
        push_transforms(world, self.stepper.scene_mut());
        created
    }

    /// Advances by the configured time step.
    pub fn step(&mut self) {
        let dt = self.config.time_step;
        self.advance(dt);
    }

    pub fn advance(&mut self, dt: f32) {
        self.stepper.advance(dt);
    }

    /// Pulls dynamic positions back, then drains the contact queue into
    /// `publisher`. Returns the number of events published.
    pub fn run_update_stage(
        &mut self,
        world: &mut World,
        publisher: &mut dyn EventPublisher,
    ) -> usize {
        pull_dynamic_transforms(world, self.stepper.scene());
        notify_collisions(&self.queue, world, publisher)
    }

    pub fn run_frame(
        &mut self,
        world: &mut World,
        publisher: &mut dyn EventPublisher,
    ) -> FrameReport {
        let bodies_created = self.run_logic_stage(world);
        self.step();
        let contacts_drained = self.queue.len();
        let events_published = self.run_update_stage(world, publisher);
        FrameReport {
            bodies_created,
            contacts_drained,
            events_published,
        }
    }

    /// Destroys the body bound to `entity`. Nothing calls this automatically
    /// when entities are despawned.
    pub fn release(&mut self, world: &mut World, entity: Entity) -> bool {
        self.lifecycle.release(world, self.stepper.scene_mut(), entity)
    }

    pub fn binding_count(&self) -> usize {
        self.back_references.read().len()
    }

    pub fn pending_contacts(&self) -> usize {
        self.queue.len()
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn scene(&self) -> &SimulationScene {
        self.stepper.scene()
    }

    pub fn scene_mut(&mut self) -> &mut SimulationScene {
        self.stepper.scene_mut()
    }

    pub fn shapes(&self) -> &ShapeSet {
        self.lifecycle.shapes()
    }
}

impl Drop for PhysicsModule {
    fn drop(&mut self) {
        log::debug!(
            "Unloading physics module ({} bound bodies)",
            self.back_references.read().len()
        );
    }
}

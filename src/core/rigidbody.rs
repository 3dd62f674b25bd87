use glam::{Mat3, Vec3};

use super::types::{MassProperties, Transform, Velocity};
use crate::{
    config::{DEFAULT_ANGULAR_DAMPING, DEFAULT_LINEAR_DAMPING},
    utils::allocator::{BodyHandle, ShapeHandle},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    /// Immovable; infinite mass. Only moved by explicit pose writes.
    Static,
    Dynamic,
}

/// Rigid actor stored in the scene: kinematic state plus its attached shape.
#[derive(Debug, Clone)]
pub struct RigidActor {
    pub handle: BodyHandle,
    pub kind: ActorKind,
    pub transform: Transform,
    pub velocity: Velocity,
    pub mass_properties: MassProperties,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub inverse_mass: f32,
    pub inverse_inertia: Mat3,
    pub shape: Option<ShapeHandle>,
    pub in_scene: bool,
    pub is_awake: bool,
    /// Seconds spent below the sleep velocity threshold.
    pub idle_time: f32,
}

impl RigidActor {
    pub fn new(handle: BodyHandle, kind: ActorKind, transform: Transform) -> Self {
        let mut actor = Self {
            handle,
            kind,
            transform,
            velocity: Velocity::default(),
            mass_properties: MassProperties::default(),
            linear_damping: DEFAULT_LINEAR_DAMPING,
            angular_damping: DEFAULT_ANGULAR_DAMPING,
            inverse_mass: 1.0,
            inverse_inertia: Mat3::IDENTITY,
            shape: None,
            in_scene: false,
            is_awake: kind == ActorKind::Dynamic,
            idle_time: 0.0,
        };
        actor.recompute_inverses();
        actor
    }

    pub fn is_static(&self) -> bool {
        self.kind == ActorKind::Static
    }

    pub fn is_dynamic(&self) -> bool {
        self.kind == ActorKind::Dynamic
    }

    /// Whether the solver and integrator move this actor this step.
    pub fn is_simulated(&self) -> bool {
        self.is_dynamic() && self.is_awake
    }

    pub fn apply_linear_impulse(&mut self, impulse: Vec3) {
        if self.is_static() {
            return;
        }
        self.velocity.linear += impulse * self.inverse_mass;
    }

    pub fn set_mass_properties(&mut self, props: MassProperties) {
        self.mass_properties = props;
        self.recompute_inverses();
    }

    /// Wakes the actor and resets its idle timer. Returns true on a sleep → awake transition.
    pub fn wake(&mut self) -> bool {
        if self.is_static() {
            return false;
        }
        self.idle_time = 0.0;
        let was_asleep = !self.is_awake;
        self.is_awake = true;
        was_asleep
    }

    pub fn put_to_sleep(&mut self) {
        self.is_awake = false;
        self.velocity = Velocity::default();
    }

    fn recompute_inverses(&mut self) {
        if self.is_static() {
            self.inverse_mass = 0.0;
            self.inverse_inertia = Mat3::ZERO;
            return;
        }

        self.inverse_mass = if self.mass_properties.mass.abs() < f32::EPSILON {
            0.0
        } else {
            1.0 / self.mass_properties.mass
        };
        let inertia = self.mass_properties.inertia;
        if inertia.determinant().abs() < f32::EPSILON {
            self.inverse_inertia = Mat3::IDENTITY;
        } else {
            self.inverse_inertia = inertia.inverse();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::allocator::GenerationalId;

    fn handle() -> BodyHandle {
        BodyHandle(GenerationalId::new(0, 0))
    }

    #[test]
    fn static_actors_have_infinite_mass() {
        let mut actor = RigidActor::new(handle(), ActorKind::Static, Transform::default());
        actor.set_mass_properties(MassProperties {
            mass: 5.0,
            inertia: Mat3::IDENTITY,
        });
        assert_eq!(actor.inverse_mass, 0.0);
        actor.apply_linear_impulse(Vec3::X);
        assert_eq!(actor.velocity.linear, Vec3::ZERO);
        assert!(!actor.wake());
    }

    #[test]
    fn mass_change_updates_inverse() {
        let mut actor = RigidActor::new(handle(), ActorKind::Dynamic, Transform::default());
        actor.set_mass_properties(MassProperties {
            mass: 4.0,
            inertia: Mat3::IDENTITY,
        });
        assert!((actor.inverse_mass - 0.25).abs() < 1e-6);
    }
}

use glam::{Quat, Vec3};

use crate::{core::rigidbody::RigidActor, utils::allocator::Arena};

/// Semi-implicit Euler integrator for awake dynamic actors.
#[derive(Debug, Clone)]
pub struct Integrator {
    pub gravity: Vec3,
}

impl Integrator {
    pub fn new(gravity: Vec3) -> Self {
        Self { gravity }
    }

    pub fn integrate_velocity(&self, actor: &mut RigidActor, dt: f32) {
        if !actor.is_simulated() {
            return;
        }

        actor.velocity.linear += self.gravity * dt;

        actor.velocity.linear *= (1.0 - actor.linear_damping * dt).max(0.0);
        actor.velocity.angular *= (1.0 - actor.angular_damping * dt).max(0.0);
    }

    pub fn integrate_position(&self, actor: &mut RigidActor, dt: f32) {
        if !actor.is_simulated() {
            return;
        }

        actor.transform.position += actor.velocity.linear * dt;

        let omega_mag = actor.velocity.angular.length();
        if omega_mag > 1e-6 {
            let axis = actor.velocity.angular / omega_mag;
            let delta = Quat::from_axis_angle(axis, omega_mag * dt);
            actor.transform.rotation = (delta * actor.transform.rotation).normalize();
        }
    }

    pub fn step_velocities(&self, actors: &mut Arena<RigidActor>, dt: f32) {
        for (_, actor) in actors.iter_mut() {
            if actor.in_scene {
                self.integrate_velocity(actor, dt);
            }
        }
    }

    pub fn step_positions(&self, actors: &mut Arena<RigidActor>, dt: f32) {
        for (_, actor) in actors.iter_mut() {
            if actor.in_scene {
                self.integrate_position(actor, dt);
            }
        }
    }
}

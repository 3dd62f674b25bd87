use glam::Vec3;

use crate::{
    collision::narrowphase::ContactPoint,
    core::{rigidbody::RigidActor, types::MaterialPairProperties},
    utils::allocator::{Arena, BodyHandle},
};

/// Approach speed under which restitution is ignored, so resting stacks settle.
const RESTITUTION_VELOCITY_THRESHOLD: f32 = 1.0;

/// Contact between two actors that the solver has to resolve.
#[derive(Debug, Clone)]
pub struct SolverContact {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    pub point: Vec3,
    pub normal: Vec3,
    pub depth: f32,
    pub material: MaterialPairProperties,
    pub accumulated_normal_impulse: f32,
    pub accumulated_tangent_impulse: Vec3,
}

impl SolverContact {
    pub fn new(
        body_a: BodyHandle,
        body_b: BodyHandle,
        contact: ContactPoint,
        material: MaterialPairProperties,
    ) -> Self {
        Self {
            body_a,
            body_b,
            point: contact.point,
            normal: contact.normal,
            depth: contact.depth,
            material,
            accumulated_normal_impulse: 0.0,
            accumulated_tangent_impulse: Vec3::ZERO,
        }
    }
}

/// Sequential impulse solver with Baumgarte-style position correction.
#[derive(Debug, Clone)]
pub struct ContactSolver {
    pub velocity_iterations: u32,
    pub bias_factor: f32,
    pub slop: f32,
}

impl ContactSolver {
    pub fn new(velocity_iterations: u32) -> Self {
        Self {
            velocity_iterations: velocity_iterations.max(1),
            bias_factor: 0.2,
            slop: 0.01,
        }
    }

    pub fn solve(&self, actors: &mut Arena<RigidActor>, contacts: &mut [SolverContact]) {
        for _ in 0..self.velocity_iterations {
            for contact in contacts.iter_mut() {
                let pair = actors.get2_mut(contact.body_a.0, contact.body_b.0);
                if let Some((body_a, body_b)) = pair {
                    Self::resolve_contact(body_a, body_b, contact);
                }
            }
        }

        for contact in contacts.iter() {
            if let Some((body_a, body_b)) = actors.get2_mut(contact.body_a.0, contact.body_b.0) {
                self.correct_position(body_a, body_b, contact);
            }
        }
    }

    fn resolve_contact(
        body_a: &mut RigidActor,
        body_b: &mut RigidActor,
        contact: &mut SolverContact,
    ) {
        let inverse_mass_sum = body_a.inverse_mass + body_b.inverse_mass;
        if inverse_mass_sum <= 1e-6 {
            return;
        }

        let relative_vel = body_b.velocity.linear - body_a.velocity.linear;
        let vel_along_normal = relative_vel.dot(contact.normal);
        if vel_along_normal < 0.0 {
            let restitution = if -vel_along_normal > RESTITUTION_VELOCITY_THRESHOLD {
                contact.material.restitution
            } else {
                0.0
            };

            let impulse_mag = -(vel_along_normal * (1.0 + restitution)) / inverse_mass_sum;
            let accumulated = (contact.accumulated_normal_impulse + impulse_mag).max(0.0);
            let impulse_delta = accumulated - contact.accumulated_normal_impulse;
            contact.accumulated_normal_impulse = accumulated;

            let impulse = contact.normal * impulse_delta;
            body_a.apply_linear_impulse(-impulse);
            body_b.apply_linear_impulse(impulse);
        }

        Self::apply_friction(body_a, body_b, contact, inverse_mass_sum);
    }

    /// Coulomb friction: the tangential impulse sticks while it stays under
    /// `static_friction * normal`, and slides at `dynamic_friction * normal`
    /// once that cone is left. The dynamic coefficient never exceeds the
    /// static one.
    fn apply_friction(
        body_a: &mut RigidActor,
        body_b: &mut RigidActor,
        contact: &mut SolverContact,
        inverse_mass_sum: f32,
    ) {
        let normal_impulse = contact.accumulated_normal_impulse;
        if normal_impulse <= f32::EPSILON {
            contact.accumulated_tangent_impulse = Vec3::ZERO;
            return;
        }

        let relative_vel = body_b.velocity.linear - body_a.velocity.linear;
        let tangent_vel = relative_vel - contact.normal * relative_vel.dot(contact.normal);

        let mut new_impulse = contact.accumulated_tangent_impulse - tangent_vel / inverse_mass_sum;
        new_impulse -= contact.normal * new_impulse.dot(contact.normal);

        let mu_static = contact.material.static_friction.max(0.0);
        let mu_dynamic = contact.material.dynamic_friction.max(0.0).min(mu_static);
        let max_static = mu_static * normal_impulse;
        let max_dynamic = mu_dynamic * normal_impulse;

        let length = new_impulse.length();
        if length > max_static && length > 0.0 {
            new_impulse = if max_dynamic > 0.0 {
                new_impulse / length * max_dynamic
            } else {
                Vec3::ZERO
            };
        }

        let impulse_delta = new_impulse - contact.accumulated_tangent_impulse;
        contact.accumulated_tangent_impulse = new_impulse;
        if impulse_delta.length_squared() <= 1e-12 {
            return;
        }

        body_a.apply_linear_impulse(-impulse_delta);
        body_b.apply_linear_impulse(impulse_delta);
    }

    fn correct_position(
        &self,
        body_a: &mut RigidActor,
        body_b: &mut RigidActor,
        contact: &SolverContact,
    ) {
        let total_inv_mass = body_a.inverse_mass + body_b.inverse_mass;
        if total_inv_mass <= 1e-6 {
            return;
        }

        let correction = (contact.depth - self.slop).max(0.0) * self.bias_factor / total_inv_mass;
        let offset = contact.normal * correction;
        if body_a.is_dynamic() {
            body_a.transform.position -= offset * body_a.inverse_mass;
        }
        if body_b.is_dynamic() {
            body_b.transform.position += offset * body_b.inverse_mass;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{rigidbody::ActorKind, types::Transform},
        utils::allocator::GenerationalId,
    };

    fn insert(arena: &mut Arena<RigidActor>, kind: ActorKind, position: Vec3) -> BodyHandle {
        let id = arena.insert(RigidActor::new(
            BodyHandle(GenerationalId::new(usize::MAX, 0)),
            kind,
            Transform::from_position(position),
        ));
        let handle = BodyHandle(id);
        if let Some(actor) = arena.get_mut(id) {
            actor.handle = handle;
            actor.in_scene = true;
        }
        handle
    }

    #[test]
    fn falling_body_stops_on_static_ground() {
        let mut actors = Arena::new();
        let ground = insert(&mut actors, ActorKind::Static, Vec3::ZERO);
        let body = insert(&mut actors, ActorKind::Dynamic, Vec3::new(0.0, 0.38, 0.0));
        actors.get_mut(body.0).unwrap().velocity.linear = Vec3::new(0.0, -0.5, 0.0);

        let mut contacts = vec![SolverContact::new(
            ground,
            body,
            ContactPoint {
                point: Vec3::new(0.0, 0.19, 0.0),
                normal: Vec3::Y,
                depth: 0.02,
            },
            MaterialPairProperties::default(),
        )];

        ContactSolver::new(4).solve(&mut actors, &mut contacts);

        let body = actors.get(body.0).unwrap();
        assert!(body.velocity.linear.y.abs() < 1e-5, "approach velocity should be cancelled");
        assert!(body.transform.position.y > 0.38, "penetration should be pushed out");
        assert_eq!(actors.get(ground.0).unwrap().transform.position, Vec3::ZERO);
    }

    #[test]
    fn separating_bodies_are_left_alone() {
        let mut actors = Arena::new();
        let a = insert(&mut actors, ActorKind::Dynamic, Vec3::ZERO);
        let b = insert(&mut actors, ActorKind::Dynamic, Vec3::new(0.3, 0.0, 0.0));
        actors.get_mut(b.0).unwrap().velocity.linear = Vec3::X;

        let mut contacts = vec![SolverContact::new(
            a,
            b,
            ContactPoint {
                point: Vec3::new(0.15, 0.0, 0.0),
                normal: Vec3::X,
                depth: 0.005,
            },
            MaterialPairProperties::default(),
        )];
        ContactSolver::new(4).solve(&mut actors, &mut contacts);

        assert_eq!(actors.get(b.0).unwrap().velocity.linear, Vec3::X);
        assert_eq!(contacts[0].accumulated_normal_impulse, 0.0);
    }

    fn slide_on_ground(static_friction: f32, dynamic_friction: f32) -> Vec3 {
        let mut actors = Arena::new();
        let ground = insert(&mut actors, ActorKind::Static, Vec3::ZERO);
        let body = insert(&mut actors, ActorKind::Dynamic, Vec3::new(0.0, 0.4, 0.0));
        actors.get_mut(body.0).unwrap().velocity.linear = Vec3::new(0.3, -0.1, 0.0);

        let mut contacts = vec![SolverContact::new(
            ground,
            body,
            ContactPoint {
                point: Vec3::new(0.0, 0.2, 0.0),
                normal: Vec3::Y,
                depth: 0.0,
            },
            MaterialPairProperties {
                static_friction,
                dynamic_friction,
                restitution: 0.0,
            },
        )];
        ContactSolver::new(4).solve(&mut actors, &mut contacts);
        actors.get(body.0).unwrap().velocity.linear
    }

    #[test]
    fn static_friction_holds_body_inside_cone() {
        let velocity = slide_on_ground(10.0, 0.5);
        assert!(velocity.x.abs() < 1e-5, "vx = {}", velocity.x);
    }

    #[test]
    fn zero_static_friction_caps_dynamic_friction() {
        let velocity = slide_on_ground(0.0, 0.5);
        assert!((velocity.x - 0.3).abs() < 1e-5, "vx = {}", velocity.x);
    }

    #[test]
    fn body_outside_cone_slides_with_dynamic_friction() {
        // Normal impulse 0.1: static limit 0.05, sliding impulse 0.02.
        let velocity = slide_on_ground(0.5, 0.2);
        assert!((velocity.x - 0.28).abs() < 1e-5, "vx = {}", velocity.x);
    }
}

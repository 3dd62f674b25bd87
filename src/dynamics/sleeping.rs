use crate::{
    config::SLEEP_VELOCITY_THRESHOLD,
    core::rigidbody::RigidActor,
    utils::allocator::{Arena, BodyHandle},
};

/// Puts idle dynamic actors to sleep once they stayed idle for `sleep_delay`
/// seconds. Returns the actors that fell asleep this step.
pub fn update_sleeping(
    actors: &mut Arena<RigidActor>,
    dt: f32,
    sleep_delay: f32,
) -> Vec<BodyHandle> {
    let mut slept = Vec::new();
    for (_, actor) in actors.iter_mut() {
        if !actor.in_scene || !actor.is_simulated() {
            continue;
        }

        let energy =
            actor.velocity.linear.length_squared() + actor.velocity.angular.length_squared();
        if energy >= SLEEP_VELOCITY_THRESHOLD {
            actor.idle_time = 0.0;
            continue;
        }

        actor.idle_time += dt;
        if actor.idle_time >= sleep_delay {
            actor.put_to_sleep();
            slept.push(actor.handle);
        }
    }
    slept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{rigidbody::ActorKind, types::Transform},
        utils::allocator::GenerationalId,
    };
    use glam::Vec3;

    #[test]
    fn idle_actor_sleeps_after_delay() {
        let mut actors = Arena::new();
        let id = actors.insert(RigidActor::new(
            BodyHandle(GenerationalId::new(0, 0)),
            ActorKind::Dynamic,
            Transform::default(),
        ));
        actors.get_mut(id).unwrap().in_scene = true;

        assert!(update_sleeping(&mut actors, 0.25, 0.5).is_empty());
        let slept = update_sleeping(&mut actors, 0.25, 0.5);
        assert_eq!(slept.len(), 1);
        assert!(!actors.get(id).unwrap().is_awake);
    }

    #[test]
    fn moving_actor_resets_idle_time() {
        let mut actors = Arena::new();
        let id = actors.insert(RigidActor::new(
            BodyHandle(GenerationalId::new(0, 0)),
            ActorKind::Dynamic,
            Transform::default(),
        ));
        {
            let actor = actors.get_mut(id).unwrap();
            actor.in_scene = true;
            actor.idle_time = 0.4;
            actor.velocity.linear = Vec3::X;
        }

        assert!(update_sleeping(&mut actors, 0.25, 0.5).is_empty());
        assert_eq!(actors.get(id).unwrap().idle_time, 0.0);
    }
}

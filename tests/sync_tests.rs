use approx::assert_abs_diff_eq;
use bevy_ecs::world::World;
use particle_bridge::*;

fn weightless() -> PhysicsModule {
    let config = SceneConfig::default()
        .with_gravity(Vec3::ZERO)
        .with_worker_count(0);
    PhysicsModule::load(config).unwrap()
}

#[test]
fn resting_body_round_trips_its_position() {
    let mut module = weightless();
    let mut world = World::new();
    let entity = world
        .spawn((Position::new(1.0, 2.0, 3.0), DynamicBody::new(1.0)))
        .id();
    let mut events = EventBuffer::new();

    for _ in 0..10 {
        module.run_frame(&mut world, &mut events);
    }

    let position = world.get::<Position>(entity).unwrap();
    assert_abs_diff_eq!(position.x, 1.0, epsilon = 1e-5);
    assert_abs_diff_eq!(position.y, 2.0, epsilon = 1e-5);
    assert_abs_diff_eq!(position.z, 3.0, epsilon = 1e-5);
}

#[test]
fn static_bodies_are_never_read_back() {
    let mut module = weightless();
    let mut world = World::new();
    let entity = world.spawn((Position::new(4.0, 0.0, 0.0), StaticBody)).id();
    module.run_logic_stage(&mut world);

    let handle = world.get::<StaticBinding>(entity).unwrap().handle;
    module
        .scene_mut()
        .set_global_pose(handle, Transform::from_position(Vec3::new(-4.0, 1.0, 0.0)));

    let mut events = EventBuffer::new();
    module.run_update_stage(&mut world, &mut events);

    assert_eq!(*world.get::<Position>(entity).unwrap(), Position::new(4.0, 0.0, 0.0));
}

#[test]
fn entity_position_is_pushed_before_the_step() {
    let mut module = weightless();
    let mut world = World::new();
    let entity = world.spawn((Position::default(), DynamicBody::new(1.0))).id();
    module.run_logic_stage(&mut world);
    let handle = world.get::<DynamicBinding>(entity).unwrap().handle;

    *world.get_mut::<Position>(entity).unwrap() = Position::new(0.0, 7.5, -2.0);
    module.run_logic_stage(&mut world);

    let pose = module.scene().global_pose(handle).unwrap();
    assert_abs_diff_eq!(pose.position.y, 7.5, epsilon = 1e-6);
    assert_abs_diff_eq!(pose.position.z, -2.0, epsilon = 1e-6);
}

#[test]
fn mass_changes_reach_the_scene() {
    let mut module = weightless();
    let mut world = World::new();
    let entity = world.spawn((Position::default(), DynamicBody::new(1.0))).id();
    module.run_logic_stage(&mut world);
    let handle = world.get::<DynamicBinding>(entity).unwrap().handle;

    world.get_mut::<DynamicBody>(entity).unwrap().mass = 8.0;
    module.run_logic_stage(&mut world);
    assert_abs_diff_eq!(module.scene().actor(handle).unwrap().inverse_mass, 0.125, epsilon = 1e-6);

    world.get_mut::<DynamicBody>(entity).unwrap().mass = -1.0;
    module.run_logic_stage(&mut world);
    assert_abs_diff_eq!(module.scene().actor(handle).unwrap().inverse_mass, 0.125, epsilon = 1e-6);
}

#[test]
fn falling_body_moves_its_entity() {
    let config = SceneConfig::default().with_worker_count(0);
    let mut module = PhysicsModule::load(config).unwrap();
    let mut world = World::new();
    let entity = world
        .spawn((Position::new(0.0, 10.0, 0.0), DynamicBody::new(1.0)))
        .id();
    let mut events = EventBuffer::new();

    for _ in 0..30 {
        module.run_frame(&mut world, &mut events);
    }

    let y = world.get::<Position>(entity).unwrap().y;
    assert!(y < 9.0, "body should fall, y = {y}");
    assert!(events.is_empty());
}

use bevy_ecs::world::World;
use particle_bridge::bridge::descriptors;
use particle_bridge::*;

const HIT: EventDescriptor = EventDescriptor::from_name("hit");

fn load() -> PhysicsModule {
    PhysicsModule::load(SceneConfig::default().with_worker_count(0))
        .expect("default config should load")
}

#[test]
fn bodies_are_created_once() {
    let mut module = load();
    let mut world = World::new();
    world.spawn((Position::new(0.0, 0.0, 0.0), StaticBody));
    world.spawn((Position::new(0.0, 2.0, 0.0), DynamicBody::new(1.0)));

    assert_eq!(module.run_logic_stage(&mut world), 2);
    assert_eq!(module.run_logic_stage(&mut world), 0);
    assert_eq!(module.binding_count(), 2);
    assert_eq!(module.scene().scene_actor_count(), 2);
}

#[test]
fn shape_follows_sensor_component() {
    let mut module = load();
    let mut world = World::new();
    let plain = world.spawn((Position::default(), StaticBody)).id();
    let sensor = world
        .spawn((Position::new(5.0, 0.0, 0.0), DynamicBody::new(2.0), CollisionSensor::new(HIT)))
        .id();
    let notify = world
        .spawn((Position::new(10.0, 0.0, 0.0), CollisionSensor::new(HIT)))
        .id();

    module.run_logic_stage(&mut world);
    let shapes = *module.shapes();

    let plain_handle = world.get::<StaticBinding>(plain).unwrap().handle;
    let sensor_handle = world.get::<DynamicBinding>(sensor).unwrap().handle;
    let notify_handle = world.get::<StaticBinding>(notify).unwrap().handle;

    let scene = module.scene();
    assert_eq!(scene.actor(plain_handle).unwrap().shape, Some(shapes.collide_only));
    assert_eq!(scene.actor(sensor_handle).unwrap().shape, Some(shapes.collide_and_notify));
    assert_eq!(scene.actor(notify_handle).unwrap().shape, Some(shapes.notify_only));
    assert!(scene.actor(notify_handle).unwrap().is_static());

    assert_eq!(
        FilterDescriptor::decode(&scene.simulation_filter_data(shapes.notify_only).unwrap()),
        descriptors::notify_only()
    );
}

#[test]
fn dynamic_mass_sets_inverse_mass() {
    let mut module = load();
    let mut world = World::new();
    let entity = world.spawn((Position::default(), DynamicBody::new(4.0))).id();

    module.run_logic_stage(&mut world);

    let handle = world.get::<DynamicBinding>(entity).unwrap().handle;
    let actor = module.scene().actor(handle).unwrap();
    assert!((actor.inverse_mass - 0.25).abs() < 1e-6);
    assert!(actor.is_dynamic());
}

#[test]
fn entity_without_position_is_picked_up_later() {
    let mut module = load();
    let mut world = World::new();
    let entity = world.spawn(StaticBody).id();

    assert_eq!(module.run_logic_stage(&mut world), 0);
    assert!(world.get::<StaticBinding>(entity).is_none());

    world.entity_mut(entity).insert(Position::new(1.0, 0.0, 0.0));
    assert_eq!(module.run_logic_stage(&mut world), 1);
    assert!(world.get::<StaticBinding>(entity).is_some());
}

#[test]
fn invalid_mass_is_retried_after_fix() {
    let mut module = load();
    let mut world = World::new();
    let entity = world.spawn((Position::default(), DynamicBody::new(f32::NAN))).id();

    assert_eq!(module.run_logic_stage(&mut world), 0);
    assert_eq!(module.binding_count(), 0);

    world.get_mut::<DynamicBody>(entity).unwrap().mass = 3.0;
    assert_eq!(module.run_logic_stage(&mut world), 1);
    assert!(world.get::<DynamicBinding>(entity).is_some());
}

#[test]
fn static_and_dynamic_markers_make_a_dynamic_body() {
    let mut module = load();
    let mut world = World::new();
    let entity = world
        .spawn((Position::default(), StaticBody, DynamicBody::new(1.0)))
        .id();

    assert_eq!(module.run_logic_stage(&mut world), 1);
    assert!(world.get::<DynamicBinding>(entity).is_some());
    assert!(world.get::<StaticBinding>(entity).is_none());
}

#[test]
fn release_unbinds_and_destroys_the_body() {
    let mut module = load();
    let mut world = World::new();
    let entity = world.spawn((Position::default(), DynamicBody::new(1.0))).id();
    module.run_logic_stage(&mut world);
    let handle = world.get::<DynamicBinding>(entity).unwrap().handle;

    assert!(module.release(&mut world, entity));
    assert!(world.get::<DynamicBinding>(entity).is_none());
    assert!(module.scene().actor(handle).is_none());
    assert_eq!(module.binding_count(), 0);
    assert!(!module.release(&mut world, entity));
}

#[test]
fn despawned_entities_keep_their_body_until_released() {
    let mut module = load();
    let mut world = World::new();
    let entity = world.spawn((Position::default(), StaticBody)).id();
    module.run_logic_stage(&mut world);

    world.despawn(entity);
    module.run_logic_stage(&mut world);

    assert_eq!(module.binding_count(), 1);
    assert_eq!(module.scene().scene_actor_count(), 1);
    assert!(!module.release(&mut world, entity));
}

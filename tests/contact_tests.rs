use bevy_ecs::world::World;
use particle_bridge::bridge::{notify_collisions, ContactQueue, PendingContact};
use particle_bridge::utils::allocator::GenerationalId;
use particle_bridge::*;

const LANDED: EventDescriptor = EventDescriptor::from_name("landed");

fn body(index: usize) -> BodyHandle {
    BodyHandle(GenerationalId::new(index, 0))
}

#[test]
fn drain_of_empty_queue_publishes_nothing() {
    let queue = ContactQueue::new();
    let world = World::new();
    let mut events = EventBuffer::new();

    assert_eq!(notify_collisions(&queue, &world, &mut events), 0);
    assert!(queue.is_empty());
    assert!(events.is_empty());
}

#[test]
fn only_sensor_entities_publish() {
    let queue = ContactQueue::new();
    let mut world = World::new();
    let plain = world.spawn(Position::default()).id();
    let sensor = world.spawn((Position::default(), CollisionSensor::new(LANDED))).id();

    queue.push(PendingContact {
        body: body(0),
        back_reference: Some(BackReference { entity: plain }),
    });
    queue.push(PendingContact {
        body: body(1),
        back_reference: Some(BackReference { entity: sensor }),
    });

    let mut events = EventBuffer::new();
    assert_eq!(notify_collisions(&queue, &world, &mut events), 1);
    assert_eq!(
        events.events(),
        &[CollisionEvent {
            entity: sensor,
            event: LANDED
        }]
    );
    assert!(queue.is_empty());
}

#[test]
fn unbound_and_despawned_records_are_dropped() {
    let queue = ContactQueue::new();
    let mut world = World::new();
    let gone = world.spawn(CollisionSensor::new(LANDED)).id();
    world.despawn(gone);

    queue.push(PendingContact {
        body: body(0),
        back_reference: None,
    });
    queue.push(PendingContact {
        body: body(1),
        back_reference: Some(BackReference { entity: gone }),
    });

    let mut events = EventBuffer::new();
    assert_eq!(notify_collisions(&queue, &world, &mut events), 0);
    assert!(queue.is_empty());
}

#[test]
fn sensor_box_landing_on_floor_publishes_event() {
    let mut module = PhysicsModule::load(SceneConfig::default()).unwrap();
    let mut world = World::new();
    world.spawn((Position::new(0.0, 0.0, 0.0), StaticBody));
    let crate_entity = world
        .spawn((
            Position::new(0.0, 0.5, 0.0),
            DynamicBody::new(1.0),
            CollisionSensor::new(LANDED),
        ))
        .id();

    let mut events = EventBuffer::new();
    let mut drained = 0;
    for _ in 0..60 {
        let report = module.run_frame(&mut world, &mut events);
        drained += report.contacts_drained;
        assert_eq!(module.pending_contacts(), 0);
    }

    assert!(drained >= 2);
    assert!(!events.is_empty());
    assert!(events
        .events()
        .iter()
        .all(|event| event.entity == crate_entity && event.event == LANDED));

    let y = world.get::<Position>(crate_entity).unwrap().y;
    assert!(y > 0.2 && y < 0.5, "crate should rest on the floor, y = {y}");
}

#[test]
fn collide_only_bodies_touch_silently() {
    let mut module = PhysicsModule::load(SceneConfig::default().with_worker_count(0)).unwrap();
    let mut world = World::new();
    world.spawn((Position::new(0.0, 0.0, 0.0), StaticBody));
    world.spawn((Position::new(0.0, 0.5, 0.0), DynamicBody::new(1.0)));

    let mut events = EventBuffer::new();
    for _ in 0..60 {
        let report = module.run_frame(&mut world, &mut events);
        assert_eq!(report.contacts_drained, 0);
    }
    assert!(events.is_empty());
}

#[test]
fn notify_only_volume_reports_without_blocking() {
    let mut module = PhysicsModule::load(SceneConfig::default().with_worker_count(0)).unwrap();
    let mut world = World::new();
    let volume = world
        .spawn((Position::new(0.0, 0.0, 0.0), CollisionSensor::new(LANDED)))
        .id();
    let faller = world
        .spawn((Position::new(0.0, 0.5, 0.0), DynamicBody::new(1.0)))
        .id();

    let mut events = EventBuffer::new();
    for _ in 0..60 {
        module.run_frame(&mut world, &mut events);
    }

    assert!(events.events().iter().any(|event| event.entity == volume));
    assert!(world.get::<Position>(faller).unwrap().y < -0.5);
}

//! Rigid-body simulation scene: actors, shared shapes, pair filtering,
//! contact solving and event reporting.

pub mod dispatcher;
pub mod events;

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use glam::{Mat3, Vec3};

use crate::{
    collision::{
        broadphase::{BroadPhase, BroadPhaseProxy},
        narrowphase::{ContactPoint, NarrowPhase},
    },
    config::{BroadPhaseKind, SceneConfig},
    core::{
        rigidbody::{ActorKind, RigidActor},
        shape::{Shape, ShapeGeometry},
        types::{MassProperties, Material, MaterialPairProperties, Transform},
    },
    dynamics::{
        integrator::Integrator,
        sleeping::update_sleeping,
        solver::{ContactSolver, SolverContact},
    },
    filter::{
        contact_report_filter_shader, FilterData, FilterObjectAttributes, FilterShader, PairFlags,
    },
    utils::{
        allocator::{Arena, BodyHandle, GenerationalId, ShapeHandle},
        logging::ScopedTimer,
    },
};

pub use dispatcher::CpuDispatcher;
pub use events::{
    ContactPair, ContactPairHeader, SimulationEventCallback, TriggerPair, TriggerStatus,
};

/// Pose changes smaller than this do not wake a sleeping actor.
const WAKE_DISTANCE_EPSILON: f32 = 1e-5;

type PairKey = (BodyHandle, BodyHandle);

fn pair_key(a: BodyHandle, b: BodyHandle) -> PairKey {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Everything needed to build a [`SimulationScene`].
pub struct SceneDesc {
    pub gravity: Vec3,
    pub broad_phase: BroadPhaseKind,
    pub broad_phase_cell_size: f32,
    pub solver_iterations: u32,
    pub sleep_delay: f32,
    pub report_advance: bool,
    pub filter_shader: FilterShader,
    pub callback: Arc<dyn SimulationEventCallback>,
}

impl SceneDesc {
    pub fn from_config(
        config: &SceneConfig,
        callback: Arc<dyn SimulationEventCallback>,
    ) -> Self {
        Self {
            gravity: config.gravity_vec(),
            broad_phase: config.broad_phase,
            broad_phase_cell_size: config.broad_phase_cell_size,
            solver_iterations: config.solver_iterations,
            sleep_delay: config.sleep_delay,
            report_advance: config.report_advance,
            filter_shader: contact_report_filter_shader,
            callback,
        }
    }

    /// Replaces the default [`contact_report_filter_shader`].
    pub fn with_filter_shader(mut self, filter_shader: FilterShader) -> Self {
        self.filter_shader = filter_shader;
        self
    }
}

/// Counters describing the most recent step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StepStats {
    pub candidate_pairs: usize,
    pub kept_pairs: usize,
    pub solved_contacts: usize,
    pub touch_reports: usize,
    pub trigger_reports: usize,
}

/// Plain-data view of a shaped actor handed to the worker threads.
#[derive(Debug, Clone, Copy)]
struct PairProxy {
    actor: BodyHandle,
    shape: ShapeHandle,
    simulated: bool,
    transform: Transform,
    geometry: ShapeGeometry,
    material: Material,
    filter_data: FilterData,
    attributes: FilterObjectAttributes,
}

enum PairOutcome {
    /// Neither side moves this step; keep whatever state the pair had.
    Dormant(PairKey),
    Trigger(PairKey, TriggerPair),
    Contact {
        key: PairKey,
        actors: [BodyHandle; 2],
        shapes: [ShapeHandle; 2],
        contact: ContactPoint,
        flags: PairFlags,
        material: MaterialPairProperties,
    },
}

fn evaluate_pair(shader: FilterShader, a: &PairProxy, b: &PairProxy) -> Option<PairOutcome> {
    let key = pair_key(a.actor, b.actor);
    if !a.simulated && !b.simulated {
        return Some(PairOutcome::Dormant(key));
    }

    let filter = shader(a.attributes, a.filter_data, b.attributes, b.filter_data);
    if filter.is_suppressed() {
        return None;
    }

    if a.attributes.is_trigger() || b.attributes.is_trigger() {
        NarrowPhase::collide(&a.geometry, &a.transform, &b.geometry, &b.transform)?;
        let (trigger, other) = if a.attributes.is_trigger() {
            (a, b)
        } else {
            (b, a)
        };
        return Some(PairOutcome::Trigger(
            key,
            TriggerPair {
                trigger_actor: trigger.actor,
                trigger_shape: trigger.shape,
                other_actor: other.actor,
                other_shape: other.shape,
                status: TriggerStatus::Found,
            },
        ));
    }

    if !filter.flags.contains(PairFlags::DETECT_DISCRETE_CONTACT) {
        return None;
    }

    let contact = NarrowPhase::collide(&a.geometry, &a.transform, &b.geometry, &b.transform)?;
    Some(PairOutcome::Contact {
        key,
        actors: [a.actor, b.actor],
        shapes: [a.shape, b.shape],
        contact,
        flags: filter.flags,
        material: Material::combine_pair(&a.material, &b.material),
    })
}

/// Owns every simulated actor and shape. Stepping is blocking: all filtering,
/// solving and callbacks have finished when [`SimulationScene::advance`] returns.
pub struct SimulationScene {
    actors: Arena<RigidActor>,
    shapes: Arena<Shape>,
    broadphase: BroadPhase,
    integrator: Integrator,
    solver: ContactSolver,
    filter_shader: FilterShader,
    callback: Arc<dyn SimulationEventCallback>,
    dispatcher: Arc<CpuDispatcher>,
    touching: HashSet<PairKey>,
    triggers: HashMap<PairKey, TriggerPair>,
    pending_wakes: Vec<BodyHandle>,
    sleep_delay: f32,
    report_advance: bool,
    step_count: u64,
    last_step: StepStats,
}

impl SimulationScene {
    pub fn new(desc: SceneDesc, dispatcher: Arc<CpuDispatcher>) -> Self {
        log::debug!(
            "Creating scene: gravity = {:?}, broad phase = {:?}, workers = {}",
            desc.gravity,
            desc.broad_phase,
            dispatcher.worker_count()
        );
        Self {
            actors: Arena::new(),
            shapes: Arena::new(),
            broadphase: BroadPhase::new(desc.broad_phase, desc.broad_phase_cell_size),
            integrator: Integrator::new(desc.gravity),
            solver: ContactSolver::new(desc.solver_iterations),
            filter_shader: desc.filter_shader,
            callback: desc.callback,
            dispatcher,
            touching: HashSet::new(),
            triggers: HashMap::new(),
            pending_wakes: Vec::new(),
            sleep_delay: desc.sleep_delay,
            report_advance: desc.report_advance,
            step_count: 0,
            last_step: StepStats::default(),
        }
    }

    pub fn gravity(&self) -> Vec3 {
        self.integrator.gravity
    }

    pub fn dispatcher(&self) -> &CpuDispatcher {
        &self.dispatcher
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn last_step(&self) -> StepStats {
        self.last_step
    }

    pub fn create_shape(&mut self, shape: Shape) -> ShapeHandle {
        ShapeHandle(self.shapes.insert(shape))
    }

    pub fn shape(&self, handle: ShapeHandle) -> Option<&Shape> {
        self.shapes.get(handle.0)
    }

    pub fn set_simulation_filter_data(
        &mut self,
        handle: ShapeHandle,
        filter_data: FilterData,
    ) -> bool {
        match self.shapes.get_mut(handle.0) {
            Some(shape) => {
                shape.filter_data = filter_data;
                true
            }
            None => false,
        }
    }

    pub fn simulation_filter_data(&self, handle: ShapeHandle) -> Option<FilterData> {
        self.shape(handle).map(|shape| shape.filter_data)
    }

    pub fn create_rigid_static(&mut self, pose: Transform) -> BodyHandle {
        self.create_actor(ActorKind::Static, pose)
    }

    pub fn create_rigid_dynamic(&mut self, pose: Transform) -> BodyHandle {
        self.create_actor(ActorKind::Dynamic, pose)
    }

    fn create_actor(&mut self, kind: ActorKind, pose: Transform) -> BodyHandle {
        let placeholder = BodyHandle(GenerationalId::new(usize::MAX, 0));
        let id = self.actors.insert(RigidActor::new(placeholder, kind, pose));
        let handle = BodyHandle(id);
        if let Some(actor) = self.actors.get_mut(handle.0) {
            actor.handle = handle;
        }
        handle
    }

    pub fn actor(&self, handle: BodyHandle) -> Option<&RigidActor> {
        self.actors.get(handle.0)
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Number of actors taking part in simulation.
    pub fn scene_actor_count(&self) -> usize {
        self.actors.iter().filter(|(_, actor)| actor.in_scene).count()
    }

    /// Attaches a shared shape, replacing any shape the actor had.
    pub fn attach_shape(&mut self, body: BodyHandle, shape: ShapeHandle) -> bool {
        if !self.shapes.contains(shape.0) {
            return false;
        }
        match self.actors.get_mut(body.0) {
            Some(actor) => {
                actor.shape = Some(shape);
                true
            }
            None => false,
        }
    }

    pub fn add_actor(&mut self, body: BodyHandle) -> bool {
        match self.actors.get_mut(body.0) {
            Some(actor) => {
                actor.in_scene = true;
                true
            }
            None => false,
        }
    }

    /// Removes the actor from the scene and releases it. The handle is dead afterwards.
    pub fn remove_actor(&mut self, body: BodyHandle) -> bool {
        if self.actors.remove(body.0).is_none() {
            return false;
        }
        self.touching.retain(|(a, b)| *a != body && *b != body);
        self.triggers.retain(|(a, b), _| *a != body && *b != body);
        self.pending_wakes.retain(|handle| *handle != body);
        true
    }

    pub fn global_pose(&self, body: BodyHandle) -> Option<Transform> {
        self.actor(body).map(|actor| actor.transform)
    }

    /// Teleports the actor. A dynamic actor that actually moved is woken.
    pub fn set_global_pose(&mut self, body: BodyHandle, pose: Transform) -> bool {
        let Some(actor) = self.actors.get_mut(body.0) else {
            return false;
        };
        let moved = actor.transform.position.distance_squared(pose.position)
            > WAKE_DISTANCE_EPSILON * WAKE_DISTANCE_EPSILON;
        actor.transform = pose;
        if moved && actor.wake() {
            self.pending_wakes.push(body);
        }
        true
    }

    /// Sets the mass of a dynamic actor, keeping its inertia tensor.
    pub fn set_mass(&mut self, body: BodyHandle, mass: f32) -> bool {
        match self.actors.get_mut(body.0) {
            Some(actor) if actor.is_dynamic() => {
                if actor.mass_properties.mass != mass {
                    let inertia = actor.mass_properties.inertia;
                    actor.set_mass_properties(MassProperties { mass, inertia });
                }
                true
            }
            _ => false,
        }
    }

    /// Sets mass and derives the inertia tensor from the attached shape.
    pub fn update_mass_and_inertia(&mut self, body: BodyHandle, mass: f32) -> bool {
        let Some(actor) = self.actors.get(body.0) else {
            return false;
        };
        if !actor.is_dynamic() {
            return false;
        }
        let inertia = actor
            .shape
            .and_then(|shape| self.shapes.get(shape.0))
            .map(|shape| shape.geometry.inertia(mass))
            .unwrap_or(Mat3::IDENTITY * mass);

        match self.actors.get_mut(body.0) {
            Some(actor) => {
                actor.set_mass_properties(MassProperties { mass, inertia });
                true
            }
            None => false,
        }
    }

    pub fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec3) -> bool {
        match self.actors.get_mut(body.0) {
            Some(actor) if actor.is_dynamic() => {
                actor.velocity.linear = velocity;
                if actor.wake() {
                    self.pending_wakes.push(body);
                }
                true
            }
            _ => false,
        }
    }

    pub fn is_sleeping(&self, body: BodyHandle) -> Option<bool> {
        self.actor(body)
            .filter(|actor| actor.is_dynamic())
            .map(|actor| !actor.is_awake)
    }

    /// Advances the scene by exactly `dt` and returns once every worker and
    /// callback has finished.
    pub fn advance(&mut self, dt: f32) {
        let dispatcher = Arc::clone(&self.dispatcher);
        dispatcher.install(|| self.step(dt));
        self.step_count += 1;
    }

    fn step(&mut self, dt: f32) {
        let mut woke = std::mem::take(&mut self.pending_wakes);
        let mut stats = StepStats::default();

        {
            let _timer = ScopedTimer::new("scene::integrate_velocities");
            self.integrator.step_velocities(&mut self.actors, dt);
        }

        let outcomes = {
            let _timer = ScopedTimer::new("scene::collide");
            self.collide(&mut stats)
        };

        let mut touching_now = HashSet::new();
        let mut triggers_now = HashMap::new();
        let mut touch_reports = Vec::new();
        let mut solver_contacts = Vec::new();

        for outcome in outcomes {
            match outcome {
                PairOutcome::Dormant(key) => {
                    if self.touching.contains(&key) {
                        touching_now.insert(key);
                    }
                    if let Some(pair) = self.triggers.get(&key) {
                        triggers_now.insert(key, *pair);
                    }
                }
                PairOutcome::Trigger(key, pair) => {
                    stats.kept_pairs += 1;
                    triggers_now.insert(key, pair);
                }
                PairOutcome::Contact {
                    key,
                    actors,
                    shapes,
                    contact,
                    flags,
                    material,
                } => {
                    stats.kept_pairs += 1;
                    touching_now.insert(key);
                    let newly_touching = !self.touching.contains(&key);
                    if flags.contains(PairFlags::NOTIFY_TOUCH_FOUND) && newly_touching {
                        touch_reports.push(ContactPairHeader {
                            actors,
                            pairs: vec![ContactPair {
                                shapes,
                                events: PairFlags::NOTIFY_TOUCH_FOUND,
                                contact,
                            }],
                        });
                    }
                    if flags.contains(PairFlags::SOLVE_CONTACT) {
                        solver_contacts.push(SolverContact::new(
                            actors[0], actors[1], contact, material,
                        ));
                    }
                }
            }
        }

        for contact in &solver_contacts {
            self.wake_touched(contact.body_a, contact.body_b, &mut woke);
        }
        stats.solved_contacts = solver_contacts.len();

        {
            let _timer = ScopedTimer::new("scene::solve");
            self.solver.solve(&mut self.actors, &mut solver_contacts);
        }
        {
            let _timer = ScopedTimer::new("scene::integrate_positions");
            self.integrator.step_positions(&mut self.actors, dt);
        }

        let poses: Vec<(BodyHandle, Transform)> = if self.report_advance {
            self.actors
                .iter()
                .filter(|(_, actor)| actor.in_scene && actor.is_simulated())
                .map(|(_, actor)| (actor.handle, actor.transform))
                .collect()
        } else {
            Vec::new()
        };
        let slept = update_sleeping(&mut self.actors, dt, self.sleep_delay);

        let mut trigger_reports: Vec<TriggerPair> = triggers_now
            .iter()
            .filter(|(key, _)| !self.triggers.contains_key(*key))
            .map(|(_, pair)| *pair)
            .collect();
        trigger_reports.extend(
            self.triggers
                .iter()
                .filter(|(key, _)| !triggers_now.contains_key(*key))
                .map(|(_, pair)| TriggerPair {
                    status: TriggerStatus::Lost,
                    ..*pair
                }),
        );

        self.touching = touching_now;
        self.triggers = triggers_now;

        stats.touch_reports = touch_reports.len();
        stats.trigger_reports = trigger_reports.len();
        self.last_step = stats;

        for header in &touch_reports {
            self.callback.on_contact(header);
        }
        if !trigger_reports.is_empty() {
            self.callback.on_trigger(&trigger_reports);
        }
        if !woke.is_empty() {
            self.callback.on_wake(&woke);
        }
        if !slept.is_empty() {
            self.callback.on_sleep(&slept);
        }
        if !poses.is_empty() {
            self.callback.on_advance(&poses);
        }
    }

    fn collide(&mut self, stats: &mut StepStats) -> Vec<PairOutcome> {
        let proxies: Vec<PairProxy> = self
            .actors
            .iter()
            .filter(|(_, actor)| actor.in_scene)
            .filter_map(|(_, actor)| {
                let shape_handle = actor.shape?;
                let shape = self.shapes.get(shape_handle.0)?;
                let mut attributes = match actor.kind {
                    ActorKind::Static => FilterObjectAttributes::STATIC,
                    ActorKind::Dynamic => FilterObjectAttributes::DYNAMIC,
                };
                if shape.is_trigger {
                    attributes |= FilterObjectAttributes::TRIGGER;
                }
                Some(PairProxy {
                    actor: actor.handle,
                    shape: shape_handle,
                    simulated: actor.is_simulated(),
                    transform: actor.transform,
                    geometry: shape.geometry,
                    material: shape.material,
                    filter_data: shape.filter_data,
                    attributes,
                })
            })
            .collect();

        let bounds: Vec<BroadPhaseProxy> = proxies
            .iter()
            .map(|proxy| BroadPhaseProxy {
                position: proxy.transform.position,
                radius: proxy.geometry.bounding_radius(),
            })
            .collect();
        let pairs = self.broadphase.get_potential_pairs(&bounds);
        stats.candidate_pairs = pairs.len();

        let shader = self.filter_shader;
        self.dispatcher
            .filter_map(&pairs, |&(i, j)| evaluate_pair(shader, &proxies[i], &proxies[j]))
    }

    fn wake_touched(&mut self, a: BodyHandle, b: BodyHandle, woke: &mut Vec<BodyHandle>) {
        let a_simulated = self.actor(a).is_some_and(RigidActor::is_simulated);
        let b_simulated = self.actor(b).is_some_and(RigidActor::is_simulated);
        let sleeper = match (a_simulated, b_simulated) {
            (true, false) => b,
            (false, true) => a,
            _ => return,
        };
        if let Some(actor) = self.actors.get_mut(sleeper.0) {
            if actor.wake() {
                woke.push(sleeper);
            }
        }
    }
}

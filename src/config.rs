//! Global configuration constants and the per-process scene configuration.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default gravity vector applied in the simulation scene (Y-up).
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, -9.81, 0.0];

/// Default fixed physics tick (in seconds).
pub const DEFAULT_TIME_STEP: f32 = 1.0 / 60.0;

/// Worker threads in the scene dispatcher.
pub const DEFAULT_WORKER_COUNT: usize = 2;

/// Number of constraint solver iterations performed per step.
pub const DEFAULT_SOLVER_ITERATIONS: u32 = 4;

/// Default damping applied to linear velocity.
pub const DEFAULT_LINEAR_DAMPING: f32 = 0.02;

/// Default damping applied to angular velocity.
pub const DEFAULT_ANGULAR_DAMPING: f32 = 0.02;

/// Default cell size for the broad-phase uniform grid.
pub const DEFAULT_BROADPHASE_CELL_SIZE: f32 = 5.0;

/// Half extent of the pre-built box shapes.
pub const DEFAULT_SHAPE_HALF_EXTENT: f32 = 0.2;

/// Squared speed under which a dynamic body counts as idle.
pub const SLEEP_VELOCITY_THRESHOLD: f32 = 0.01;

/// Seconds a body has to stay idle before it is put to sleep.
pub const DEFAULT_SLEEP_DELAY: f32 = 0.5;

/// Filter categories of the pre-built shapes.
pub mod categories {
    pub const COLLIDE_ONLY: u32 = 0b001;
    pub const COLLIDE_AND_NOTIFY: u32 = 0b010;
    pub const NOTIFY_ONLY: u32 = 0b100;

    /// Every pre-built shape is willing to interact with every category.
    pub const ALL: u32 = COLLIDE_ONLY | COLLIDE_AND_NOTIFY | NOTIFY_ONLY;
}

const fn default_gravity() -> [f32; 3] {
    DEFAULT_GRAVITY
}
const fn default_worker_count() -> usize {
    DEFAULT_WORKER_COUNT
}
const fn default_cell_size() -> f32 {
    DEFAULT_BROADPHASE_CELL_SIZE
}
const fn default_half_extent() -> f32 {
    DEFAULT_SHAPE_HALF_EXTENT
}
const fn default_time_step() -> f32 {
    DEFAULT_TIME_STEP
}
const fn default_solver_iterations() -> u32 {
    DEFAULT_SOLVER_ITERATIONS
}
const fn default_sleep_delay() -> f32 {
    DEFAULT_SLEEP_DELAY
}

/// Broad-phase strategy used to find candidate pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadPhaseKind {
    /// Spatial hash over bounding spheres.
    #[default]
    UniformGrid,
    /// Every actor against every other actor.
    AllPairs,
}

/// Friction and restitution of the material shared by the pre-built shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub static_friction: f32,
    pub dynamic_friction: f32,
    pub restitution: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            static_friction: 0.5,
            dynamic_friction: 0.5,
            restitution: 0.5,
        }
    }
}

/// Process-wide scene configuration, created once when the module loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Gravity vector [x, y, z] in m/s^2.
    #[serde(default = "default_gravity")]
    pub gravity: [f32; 3],

    /// Worker threads used by the dispatcher. Zero runs the step on the caller.
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub broad_phase: BroadPhaseKind,

    #[serde(default = "default_cell_size")]
    pub broad_phase_cell_size: f32,

    #[serde(default)]
    pub material: MaterialConfig,

    #[serde(default = "default_half_extent")]
    pub shape_half_extent: f32,

    /// Fixed physics tick in seconds.
    #[serde(default = "default_time_step")]
    pub time_step: f32,

    #[serde(default = "default_solver_iterations")]
    pub solver_iterations: u32,

    /// Idle time before a dynamic body falls asleep.
    #[serde(default = "default_sleep_delay")]
    pub sleep_delay: f32,

    /// Deliver post-integration poses of awake bodies through `on_advance`.
    #[serde(default)]
    pub report_advance: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            worker_count: default_worker_count(),
            broad_phase: BroadPhaseKind::default(),
            broad_phase_cell_size: default_cell_size(),
            material: MaterialConfig::default(),
            shape_half_extent: default_half_extent(),
            time_step: default_time_step(),
            solver_iterations: default_solver_iterations(),
            sleep_delay: default_sleep_delay(),
            report_advance: false,
        }
    }
}

impl SceneConfig {
    pub fn gravity_vec(&self) -> Vec3 {
        Vec3::from_array(self.gravity)
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity.to_array();
        self
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(ConfigError::InvalidTimeStep(self.time_step));
        }
        if self.gravity.iter().any(|g| !g.is_finite()) {
            return Err(invalid("gravity", format!("{:?} is not finite", self.gravity)));
        }
        if !(self.broad_phase_cell_size > 0.0) {
            return Err(invalid(
                "broad_phase_cell_size",
                format!("{} must be > 0", self.broad_phase_cell_size),
            ));
        }
        if !(self.shape_half_extent > 0.0) {
            return Err(invalid(
                "shape_half_extent",
                format!("{} must be > 0", self.shape_half_extent),
            ));
        }
        if self.solver_iterations == 0 {
            return Err(invalid("solver_iterations", "must be >= 1".into()));
        }
        if !(self.sleep_delay >= 0.0) {
            return Err(invalid("sleep_delay", format!("{} must be >= 0", self.sleep_delay)));
        }

        let material = &self.material;
        if !(material.static_friction >= 0.0) {
            return Err(invalid(
                "material.static_friction",
                format!("{} must be >= 0", material.static_friction),
            ));
        }
        if !(material.dynamic_friction >= 0.0) {
            return Err(invalid(
                "material.dynamic_friction",
                format!("{} must be >= 0", material.dynamic_friction),
            ));
        }
        if !(0.0..=1.0).contains(&material.restitution) {
            return Err(invalid(
                "material.restitution",
                format!("{} must be within [0, 1]", material.restitution),
            ));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

fn invalid(field: &'static str, message: String) -> ConfigError {
    ConfigError::InvalidValue { field, message }
}

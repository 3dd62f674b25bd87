use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::MaterialConfig;

/// Position and orientation of a rigid actor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Rotates a local direction into world space.
    pub fn rotate(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }
}

/// Linear and angular velocity of a rigid actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub linear: Vec3,
    pub angular: Vec3,
}

/// Mass and inertia tensor data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MassProperties {
    pub mass: f32,
    pub inertia: Mat3,
}

impl Default for MassProperties {
    fn default() -> Self {
        Self {
            mass: 1.0,
            inertia: Mat3::IDENTITY,
        }
    }
}

/// Material coefficients that affect interactions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub static_friction: f32,
    pub dynamic_friction: f32,
    pub restitution: f32,
}

impl Default for Material {
    fn default() -> Self {
        MaterialConfig::default().into()
    }
}

impl From<MaterialConfig> for Material {
    fn from(config: MaterialConfig) -> Self {
        Self {
            static_friction: config.static_friction,
            dynamic_friction: config.dynamic_friction,
            restitution: config.restitution,
        }
    }
}

impl Material {
    pub fn new(static_friction: f32, dynamic_friction: f32, restitution: f32) -> Self {
        Self {
            static_friction,
            dynamic_friction,
            restitution,
        }
    }

    /// Averages both materials' coefficients.
    pub fn combine_pair(a: &Self, b: &Self) -> MaterialPairProperties {
        MaterialPairProperties {
            static_friction: 0.5 * (a.static_friction + b.static_friction),
            dynamic_friction: 0.5 * (a.dynamic_friction + b.dynamic_friction),
            restitution: 0.5 * (a.restitution + b.restitution),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialPairProperties {
    pub static_friction: f32,
    pub dynamic_friction: f32,
    pub restitution: f32,
}

impl Default for MaterialPairProperties {
    fn default() -> Self {
        Material::combine_pair(&Material::default(), &Material::default())
    }
}

/// Helper methods for inertia calculations.
pub trait InertiaTensorExt {
    fn for_solid_box(half_extents: Vec3, mass: f32) -> Mat3;
    fn for_solid_sphere(radius: f32, mass: f32) -> Mat3;
}

impl InertiaTensorExt for Mat3 {
    fn for_solid_box(half_extents: Vec3, mass: f32) -> Mat3 {
        let lx = half_extents.x * 2.0;
        let ly = half_extents.y * 2.0;
        let lz = half_extents.z * 2.0;
        let factor = mass / 12.0;
        Mat3::from_diagonal(Vec3::new(
            factor * (ly * ly + lz * lz),
            factor * (lx * lx + lz * lz),
            factor * (lx * lx + ly * ly),
        ))
    }

    fn for_solid_sphere(radius: f32, mass: f32) -> Mat3 {
        let value = 0.4 * mass * radius * radius;
        Mat3::from_diagonal(Vec3::splat(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_properties_average_coefficients() {
        let ice = Material::new(0.05, 0.03, 0.05);
        let rubber = Material::new(1.2, 1.0, 0.8);
        let pair = Material::combine_pair(&ice, &rubber);
        assert!((pair.static_friction - 0.625).abs() < 1e-5);
        assert!((pair.dynamic_friction - 0.515).abs() < 1e-5);
        assert!((pair.restitution - 0.425).abs() < 1e-5);
    }

    #[test]
    fn box_inertia_is_symmetric_for_cubes() {
        let inertia = Mat3::for_solid_box(Vec3::splat(0.5), 12.0);
        assert!((inertia.x_axis.x - 2.0).abs() < 1e-5);
        assert!((inertia.y_axis.y - 2.0).abs() < 1e-5);
        assert!((inertia.z_axis.z - 2.0).abs() < 1e-5);
    }
}

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

use super::types::{InertiaTensorExt, Material};
use crate::filter::FilterData;

/// Supported primitive geometries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeGeometry {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
}

impl ShapeGeometry {
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    pub fn cuboid(half_extents: Vec3) -> Self {
        Self::Box { half_extents }
    }

    pub fn bounding_radius(&self) -> f32 {
        match self {
            ShapeGeometry::Sphere { radius } => *radius,
            ShapeGeometry::Box { half_extents } => half_extents.length(),
        }
    }

    /// Inertia tensor of a solid body of this geometry with the given mass.
    pub fn inertia(&self, mass: f32) -> Mat3 {
        match self {
            ShapeGeometry::Sphere { radius } => Mat3::for_solid_sphere(*radius, mass),
            ShapeGeometry::Box { half_extents } => Mat3::for_solid_box(*half_extents, mass),
        }
    }
}

/// Shape that can be attached to any number of actors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub geometry: ShapeGeometry,
    pub material: Material,
    pub filter_data: FilterData,
    pub is_trigger: bool,
}

impl Shape {
    pub fn builder() -> ShapeBuilder {
        ShapeBuilder::new()
    }
}

pub struct ShapeBuilder {
    geometry: ShapeGeometry,
    material: Material,
    filter_data: FilterData,
    is_trigger: bool,
}

impl Default for ShapeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeBuilder {
    pub fn new() -> Self {
        Self {
            geometry: ShapeGeometry::Sphere { radius: 1.0 },
            material: Material::default(),
            filter_data: FilterData::default(),
            is_trigger: false,
        }
    }

    pub fn sphere(mut self, radius: f32) -> Self {
        self.geometry = ShapeGeometry::Sphere { radius };
        self
    }

    pub fn box_shape(mut self, half_extents: Vec3) -> Self {
        self.geometry = ShapeGeometry::Box { half_extents };
        self
    }

    pub fn material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn filter_data(mut self, filter_data: FilterData) -> Self {
        self.filter_data = filter_data;
        self
    }

    pub fn is_trigger(mut self, is_trigger: bool) -> Self {
        self.is_trigger = is_trigger;
        self
    }

    pub fn build(self) -> Shape {
        Shape {
            geometry: self.geometry,
            material: self.material,
            filter_data: self.filter_data,
            is_trigger: self.is_trigger,
        }
    }
}

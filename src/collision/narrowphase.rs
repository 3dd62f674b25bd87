use glam::Vec3;

use crate::core::{shape::ShapeGeometry, types::Transform};

/// Single contact between two shapes. `normal` points from shape A to shape B.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    pub point: Vec3,
    pub normal: Vec3,
    pub depth: f32,
}

/// Separating axis theorem for oriented box-box collisions.
pub struct SATAlgorithm;

impl SATAlgorithm {
    pub fn intersect_boxes(
        half_extents_a: Vec3,
        transform_a: &Transform,
        half_extents_b: Vec3,
        transform_b: &Transform,
    ) -> Option<ContactPoint> {
        let relative_pos = transform_b.position - transform_a.position;

        let axes_a = [
            transform_a.rotate(Vec3::X),
            transform_a.rotate(Vec3::Y),
            transform_a.rotate(Vec3::Z),
        ];
        let axes_b = [
            transform_b.rotate(Vec3::X),
            transform_b.rotate(Vec3::Y),
            transform_b.rotate(Vec3::Z),
        ];

        let mut test_axes = Vec::with_capacity(15);
        test_axes.extend_from_slice(&axes_a);
        test_axes.extend_from_slice(&axes_b);

        for axis_a in &axes_a {
            for axis_b in &axes_b {
                let axis = axis_a.cross(*axis_b);
                if axis.length_squared() > 1e-6 {
                    test_axes.push(axis.normalize());
                }
            }
        }

        let mut min_overlap = f32::MAX;
        let mut min_axis = Vec3::Y;
        let mut min_extent_a = 0.0;

        for axis in test_axes {
            let extent_a = project_extent(&axes_a, half_extents_a, axis);
            let extent_b = project_extent(&axes_b, half_extents_b, axis);

            let projection = relative_pos.dot(axis);
            let overlap = (extent_a + extent_b) - projection.abs();

            if overlap <= 0.0 {
                return None;
            }

            if overlap < min_overlap {
                min_overlap = overlap;
                min_extent_a = extent_a;
                min_axis = if projection < 0.0 { -axis } else { axis };
            }
        }

        let normal = min_axis.normalize_or_zero();
        Some(ContactPoint {
            point: transform_a.position + normal * (min_extent_a - min_overlap * 0.5),
            normal,
            depth: min_overlap,
        })
    }
}

fn project_extent(axes: &[Vec3; 3], half_extents: Vec3, axis: Vec3) -> f32 {
    axes[0].dot(axis).abs() * half_extents.x
        + axes[1].dot(axis).abs() * half_extents.y
        + axes[2].dot(axis).abs() * half_extents.z
}

fn sphere_sphere(
    radius_a: f32,
    transform_a: &Transform,
    radius_b: f32,
    transform_b: &Transform,
) -> Option<ContactPoint> {
    let delta = transform_b.position - transform_a.position;
    let distance = delta.length();
    let depth = radius_a + radius_b - distance;
    if depth <= 0.0 {
        return None;
    }

    let normal = if distance > 1e-6 { delta / distance } else { Vec3::Y };
    Some(ContactPoint {
        point: transform_a.position + normal * (radius_a - depth * 0.5),
        normal,
        depth,
    })
}

/// Contact with the normal pointing from the box towards the sphere.
fn box_sphere(
    half_extents: Vec3,
    box_transform: &Transform,
    radius: f32,
    sphere_transform: &Transform,
) -> Option<ContactPoint> {
    let inverse_rotation = box_transform.rotation.conjugate();
    let local_center = inverse_rotation * (sphere_transform.position - box_transform.position);
    let clamped = local_center.clamp(-half_extents, half_extents);
    let offset = local_center - clamped;
    let distance_sq = offset.length_squared();

    if distance_sq > 1e-12 {
        if distance_sq >= radius * radius {
            return None;
        }
        let distance = distance_sq.sqrt();
        let normal = box_transform.rotate(offset / distance);
        return Some(ContactPoint {
            point: box_transform.position + box_transform.rotate(clamped),
            normal,
            depth: radius - distance,
        });
    }

    // Center inside the box: push out through the nearest face.
    let gaps = half_extents - local_center.abs();
    let (axis, gap) = if gaps.x <= gaps.y && gaps.x <= gaps.z {
        (Vec3::X * local_center.x.signum(), gaps.x)
    } else if gaps.y <= gaps.z {
        (Vec3::Y * local_center.y.signum(), gaps.y)
    } else {
        (Vec3::Z * local_center.z.signum(), gaps.z)
    };
    Some(ContactPoint {
        point: sphere_transform.position,
        normal: box_transform.rotate(axis),
        depth: gap + radius,
    })
}

/// Narrow phase dispatcher hooking algorithms to geometry pairs.
pub struct NarrowPhase;

impl NarrowPhase {
    pub fn collide(
        geometry_a: &ShapeGeometry,
        transform_a: &Transform,
        geometry_b: &ShapeGeometry,
        transform_b: &Transform,
    ) -> Option<ContactPoint> {
        match (geometry_a, geometry_b) {
            (
                ShapeGeometry::Box { half_extents: he_a },
                ShapeGeometry::Box { half_extents: he_b },
            ) => SATAlgorithm::intersect_boxes(*he_a, transform_a, *he_b, transform_b),
            (ShapeGeometry::Sphere { radius: ra }, ShapeGeometry::Sphere { radius: rb }) => {
                sphere_sphere(*ra, transform_a, *rb, transform_b)
            }
            (ShapeGeometry::Box { half_extents }, ShapeGeometry::Sphere { radius }) => {
                box_sphere(*half_extents, transform_a, *radius, transform_b)
            }
            (ShapeGeometry::Sphere { radius }, ShapeGeometry::Box { half_extents }) => {
                box_sphere(*half_extents, transform_b, *radius, transform_a).map(|contact| {
                    ContactPoint {
                        normal: -contact.normal,
                        ..contact
                    }
                })
            }
        }
    }
}

use anyhow::Result;
use glam::Vec3;

use csg_engine::csg::Operation;
use csg_engine::device::Gpu;
use csg_engine::scene::SceneBuilder;

/// Distance the drilling cylinders start behind the origin.
const CYLINDER_START: f32 = -1.25;

/// One drilling cylinder of the basic scene.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CylinderParams {
    pub radius: f32,
    /// Shift along the cylinder's local X axis.
    pub offset: f32,
}

/// Tweakable dimensions of the basic scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneParams {
    pub sphere_radius: f32,
    pub cube_size: f32,
    /// Shift of the cube along X.
    pub cube_offset: f32,
    pub cylinder_length: f32,
    /// Along Z, along Y (rotated about X) and along X (rotated about Y).
    pub cylinders: [CylinderParams; 3],
}

impl Default for SceneParams {
    fn default() -> Self {
        let cylinder = CylinderParams {
            radius: 0.6,
            offset: 0.0,
        };
        Self {
            sphere_radius: 1.2,
            cube_size: 1.8,
            cube_offset: 0.0,
            cylinder_length: 2.5,
            cylinders: [cylinder; 3],
        }
    }
}

/// Sphere ∩ cube, drilled along all three axes.
///
/// Pushes five primitives: the two intersected solids, then the three
/// subtracted cylinders.
pub fn build_basic(gpu: &Gpu, b: &mut SceneBuilder<'_>, params: &SceneParams) -> Result<()> {
    b.push_display_list(gpu, Operation::Intersection, 1, |l| {
        l.sphere(params.sphere_radius);
    })?;

    b.push_display_list(gpu, Operation::Intersection, 1, |l| {
        l.translate(Vec3::new(params.cube_offset, 0.0, 0.0))
            .cube(params.cube_size);
    })?;

    let axes = [None, Some(Vec3::X), Some(Vec3::Y)];
    for (cylinder, axis) in params.cylinders.iter().zip(axes) {
        b.push_display_list(gpu, Operation::Subtraction, 1, |l| {
            if let Some(axis) = axis {
                l.rotate_deg(90.0, axis);
            }
            l.translate(Vec3::new(cylinder.offset, 0.0, CYLINDER_START))
                .cylinder(cylinder.radius, params.cylinder_length);
        })?;
    }

    Ok(())
}

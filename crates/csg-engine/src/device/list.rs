use std::fmt;

use glam::{Affine3A, Mat3, Quat, Vec3};

use crate::geometry::Shape;
use crate::paint::Material;

use super::{CompileError, Gpu};

/// Device-side name of a compiled display list. Never zero.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ListId(pub(crate) u32);

impl ListId {
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "list#{}", self.0)
    }
}

/// A shape with its transform resolved at compile time.
#[derive(Debug, Clone)]
pub(crate) struct CompiledSolid {
    pub shape: Shape,
    pub world_to_object: Affine3A,
    /// Maps object-space normals to world space.
    pub normal_matrix: Mat3,
    pub material: Material,
}

/// Records draw commands for [`Gpu::compile_list`].
///
/// Transform calls post-multiply the current matrix, so the call closest to a
/// shape is applied to it first:
///
/// ```ignore
/// list.push_matrix()
///     .rotate_deg(90.0, Vec3::X)
///     .translate(Vec3::new(0.0, 0.0, -1.25))
///     .cylinder(0.6, 2.5)
///     .pop_matrix();
/// ```
///
/// The first invalid command is remembered and reported by `compile_list`; later
/// commands are ignored.
pub struct ListBuilder {
    solids: Vec<CompiledSolid>,
    matrix: Affine3A,
    stack: Vec<Affine3A>,
    material: Material,
    error: Option<CompileError>,
}

impl ListBuilder {
    pub(crate) fn new() -> Self {
        Self {
            solids: Vec::new(),
            matrix: Affine3A::IDENTITY,
            stack: Vec::new(),
            material: Material::default(),
            error: None,
        }
    }

    pub fn push_matrix(&mut self) -> &mut Self {
        if self.error.is_none() {
            self.stack.push(self.matrix);
        }
        self
    }

    pub fn pop_matrix(&mut self) -> &mut Self {
        if self.error.is_none() {
            match self.stack.pop() {
                Some(m) => self.matrix = m,
                None => self.fail("pop_matrix without matching push_matrix".to_owned()),
            }
        }
        self
    }

    pub fn translate(&mut self, v: Vec3) -> &mut Self {
        self.apply(Affine3A::from_translation(v))
    }

    /// Rotates by `angle_deg` degrees around `axis`.
    pub fn rotate_deg(&mut self, angle_deg: f32, axis: Vec3) -> &mut Self {
        let axis = axis.normalize_or_zero();
        if axis == Vec3::ZERO {
            self.fail("rotation axis must be non-zero".to_owned());
            return self;
        }
        self.apply(Affine3A::from_quat(Quat::from_axis_angle(axis, angle_deg.to_radians())))
    }

    pub fn scale(&mut self, s: Vec3) -> &mut Self {
        self.apply(Affine3A::from_scale(s))
    }

    /// Sets the material for subsequent shapes.
    pub fn material(&mut self, material: Material) -> &mut Self {
        self.material = material;
        self
    }

    pub fn sphere(&mut self, radius: f32) -> &mut Self {
        self.shape(Shape::Sphere { radius })
    }

    pub fn cube(&mut self, size: f32) -> &mut Self {
        self.shape(Shape::Cube { size })
    }

    pub fn cylinder(&mut self, radius: f32, length: f32) -> &mut Self {
        self.shape(Shape::Cylinder { radius, length })
    }

    /// Records `shape` under the current matrix and material.
    pub fn shape(&mut self, shape: Shape) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        if let Err(reason) = shape.validate() {
            self.fail(reason);
            return self;
        }

        let det = self.matrix.matrix3.determinant();
        if !det.is_finite() || det.abs() < 1e-12 {
            self.fail(format!("transform is not invertible (determinant {det})"));
            return self;
        }

        let world_to_object = self.matrix.inverse();
        self.solids.push(CompiledSolid {
            shape,
            world_to_object,
            normal_matrix: Mat3::from(world_to_object.matrix3).transpose(),
            material: self.material,
        });
        self
    }

    /// Number of shapes recorded so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.solids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }

    pub(crate) fn finish(self) -> Result<Vec<CompiledSolid>, CompileError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if !self.stack.is_empty() {
            log::debug!("display list closed with {} unpopped matrices", self.stack.len());
        }
        Ok(self.solids)
    }

    fn apply(&mut self, m: Affine3A) -> &mut Self {
        if self.error.is_none() {
            self.matrix = self.matrix * m;
        }
        self
    }

    fn fail(&mut self, reason: String) {
        if self.error.is_none() {
            self.error = Some(CompileError::InvalidGeometry { reason });
        }
    }
}

/// Owned handle to a compiled display list.
///
/// Dropping the handle deletes the list on its device, so every successfully
/// compiled list is deleted exactly once.
pub struct DisplayList {
    id: ListId,
    gpu: Gpu,
}

impl DisplayList {
    pub(crate) fn new(id: ListId, gpu: Gpu) -> Self {
        Self { id, gpu }
    }

    #[inline]
    pub fn id(&self) -> ListId {
        self.id
    }

    /// Device the list lives on.
    #[inline]
    pub fn gpu(&self) -> &Gpu {
        &self.gpu
    }

    /// Executes the list with the device's current state.
    #[inline]
    pub fn call(&self) {
        self.gpu.call_list(self.id);
    }
}

impl fmt::Debug for DisplayList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DisplayList").field(&self.id).finish()
    }
}

impl Drop for DisplayList {
    fn drop(&mut self) {
        self.gpu.delete_list(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid(b: ListBuilder) -> String {
        match b.finish() {
            Err(CompileError::InvalidGeometry { reason }) => reason,
            other => panic!("expected invalid geometry, got {other:?}"),
        }
    }

    #[test]
    fn translate_moves_shape() {
        let mut b = ListBuilder::new();
        b.translate(Vec3::new(1.0, 2.0, 3.0)).sphere(1.0);
        let solids = b.finish().unwrap();
        assert_eq!(solids.len(), 1);
        let origin = solids[0].world_to_object.transform_point3(Vec3::new(1.0, 2.0, 3.0));
        assert!(origin.length() < 1e-6);
    }

    #[test]
    fn transforms_compose_like_a_matrix_stack() {
        // Rotate after translate: the translation happens in rotated space.
        let mut b = ListBuilder::new();
        b.rotate_deg(90.0, Vec3::X).translate(Vec3::new(0.0, 0.0, 1.0)).cube(1.0);
        let solids = b.finish().unwrap();
        let object_to_world = solids[0].world_to_object.inverse();
        let center = object_to_world.transform_point3(Vec3::ZERO);
        assert!((center - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn pop_restores_matrix() {
        let mut b = ListBuilder::new();
        b.push_matrix()
            .translate(Vec3::X)
            .sphere(1.0)
            .pop_matrix()
            .sphere(1.0);
        let solids = b.finish().unwrap();
        let second = solids[1].world_to_object.transform_point3(Vec3::ZERO);
        assert!(second.length() < 1e-6);
    }

    #[test]
    fn unbalanced_pop_is_an_error() {
        let mut b = ListBuilder::new();
        b.pop_matrix().sphere(1.0);
        assert!(invalid(b).contains("pop_matrix"));
    }

    #[test]
    fn first_error_wins() {
        let mut b = ListBuilder::new();
        b.sphere(-1.0).rotate_deg(10.0, Vec3::ZERO);
        assert!(invalid(b).contains("radius"));
    }

    #[test]
    fn zero_scale_is_not_invertible() {
        let mut b = ListBuilder::new();
        b.scale(Vec3::new(1.0, 0.0, 1.0)).cube(1.0);
        assert!(invalid(b).contains("not invertible"));
    }

    #[test]
    fn normal_matrix_handles_non_uniform_scale() {
        let mut b = ListBuilder::new();
        b.scale(Vec3::new(2.0, 1.0, 1.0)).sphere(1.0);
        let solid = &b.finish().unwrap()[0];
        // A 45 degree object normal tilts towards Y once X is stretched.
        let n = (solid.normal_matrix * Vec3::new(1.0, 1.0, 0.0).normalize()).normalize();
        assert!(n.y > n.x);
    }
}

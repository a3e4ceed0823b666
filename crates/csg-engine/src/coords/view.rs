use glam::{Mat3, Quat, Vec3};

use crate::geometry::Ray;

use super::Viewport;

/// Orthographic view volume.
///
/// Every pixel casts a ray along [`forward`](Self::forward) from an eye plane
/// `eye_distance` in front of `target`. Fragment depth is the distance along that
/// ray, so smaller depth is closer to the viewer. Geometry behind the eye plane
/// is clipped.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrthoView {
    /// View-to-world rotation. The view looks down its local -Z axis.
    pub rotation: Quat,
    /// World point at the center of the image.
    pub target: Vec3,
    /// Half the visible height in world units.
    pub half_height: f32,
    pub eye_distance: f32,
}

impl OrthoView {
    /// Creates a view looking along `forward` with `up` pointing to the top of
    /// the image. Degenerate inputs fall back to the default axes.
    pub fn looking_along(forward: Vec3, up: Vec3, half_height: f32) -> Self {
        let z = -forward.normalize_or_zero();
        let z = if z == Vec3::ZERO { Vec3::Z } else { z };

        let x = up.cross(z).normalize_or_zero();
        let x = if x == Vec3::ZERO { z.any_orthonormal_vector() } else { x };
        let y = z.cross(x);

        Self {
            rotation: Quat::from_mat3(&Mat3::from_cols(x, y, z)),
            ..Self::default_with_half_height(half_height)
        }
    }

    fn default_with_half_height(half_height: f32) -> Self {
        Self {
            rotation: Quat::IDENTITY,
            target: Vec3::ZERO,
            half_height,
            eye_distance: 100.0,
        }
    }

    /// Unit view direction in world space.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Ray through the center of pixel `(x, y)`.
    pub fn ray(&self, viewport: Viewport, x: u32, y: u32) -> Ray {
        let w = viewport.width.max(1) as f32;
        let h = viewport.height.max(1) as f32;

        let nx = ((x as f32 + 0.5) / w) * 2.0 - 1.0;
        let ny = 1.0 - ((y as f32 + 0.5) / h) * 2.0;

        let local = Vec3::new(
            nx * self.half_height * viewport.aspect(),
            ny * self.half_height,
            self.eye_distance,
        );

        Ray::new(self.target + self.rotation * local, self.forward())
    }

    /// Pixel covering the world point `p`, if it lies inside the image.
    pub fn pixel_at(&self, viewport: Viewport, p: Vec3) -> Option<(u32, u32)> {
        let local = self.rotation.inverse() * (p - self.target);
        let half_width = self.half_height * viewport.aspect();

        let u = (local.x / half_width + 1.0) * 0.5 * viewport.width as f32;
        let v = (1.0 - local.y / self.half_height) * 0.5 * viewport.height as f32;
        if !(u >= 0.0 && v >= 0.0) {
            return None;
        }

        let (x, y) = (u.floor() as u32, v.floor() as u32);
        viewport.index(x, y).map(|_| (x, y))
    }
}

impl Default for OrthoView {
    fn default() -> Self {
        Self::default_with_half_height(2.0)
    }
}

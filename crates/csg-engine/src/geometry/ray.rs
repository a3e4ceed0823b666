use glam::{Affine3A, Vec3};

/// Parametric ray `origin + t * dir`.
///
/// `dir` is not required to be unit length; transforming a ray by an affine map
/// keeps the parameter `t` of every point unchanged.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    #[inline]
    pub const fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    #[inline]
    pub fn transformed(&self, m: &Affine3A) -> Ray {
        Ray::new(m.transform_point3(self.origin), m.transform_vector3(self.dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_preserves_parameter() {
        let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        let m = Affine3A::from_scale_rotation_translation(
            Vec3::splat(2.0),
            glam::Quat::from_rotation_y(0.7),
            Vec3::new(-4.0, 0.5, 9.0),
        );
        let moved = ray.transformed(&m);
        for t in [0.0, 1.5, 10.0] {
            let expected = m.transform_point3(ray.at(t));
            assert!((moved.at(t) - expected).length() < 1e-4);
        }
    }
}

use glam::Vec3;

use super::Color;

/// Surface material used when a solid is shaded.
///
/// Shading is a single headlight term: faces seen head-on receive the full base
/// color, grazing faces fall off towards `ambient`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub color: Color,
    pub ambient: f32,
}

impl Material {
    #[inline]
    pub const fn new(color: Color) -> Self {
        Self { color, ambient: 0.25 }
    }

    /// Returns the shaded color for a surface with world-space `normal`, seen
    /// along the view direction `forward`.
    ///
    /// Back faces are lit like front faces; the inside of a subtracted solid
    /// must stay visible.
    #[inline]
    pub fn shade(&self, normal: Vec3, forward: Vec3) -> Color {
        let facing = normal.dot(forward).abs().clamp(0.0, 1.0);
        let k = self.ambient + (1.0 - self.ambient) * facing;
        self.color.scaled(k)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Color::rgb(0.5, 0.0, 0.5))
    }
}

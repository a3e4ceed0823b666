use glam::Vec3;

use super::Ray;

/// Convex solid in its own object space.
///
/// - `Sphere`: centered at the origin.
/// - `Cube`: axis-aligned, centered at the origin, edge length `size`.
/// - `Cylinder`: around the +Z axis from `z = 0` to `z = length`, with both caps.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
    Cube { size: f32 },
    Cylinder { radius: f32, length: f32 },
}

/// One ray/surface crossing in object space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Hit {
    pub t: f32,
    /// Outward surface normal (object space, unit length).
    pub normal: Vec3,
}

/// Entry and exit crossings of a ray through a convex shape.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Span {
    pub enter: Hit,
    pub exit: Hit,
}

impl Shape {
    /// Checks that all dimensions are finite and strictly positive.
    pub fn validate(&self) -> Result<(), String> {
        let dims: &[(&str, f32)] = match self {
            Shape::Sphere { radius } => &[("radius", *radius)],
            Shape::Cube { size } => &[("size", *size)],
            Shape::Cylinder { radius, length } => &[("radius", *radius), ("length", *length)],
        };

        for &(name, v) in dims {
            if !(v.is_finite() && v > 0.0) {
                return Err(format!("{self:?}: {name} must be finite and positive, got {v}"));
            }
        }
        Ok(())
    }

    /// Intersects `ray` with the solid. Tangent rays produce no span.
    pub fn intersect(&self, ray: &Ray) -> Option<Span> {
        match *self {
            Shape::Sphere { radius } => intersect_sphere(ray, radius),
            Shape::Cube { size } => intersect_cube(ray, size * 0.5),
            Shape::Cylinder { radius, length } => intersect_cylinder(ray, radius, length),
        }
    }
}

fn intersect_sphere(ray: &Ray, radius: f32) -> Option<Span> {
    let a = ray.dir.length_squared();
    if a <= 0.0 {
        return None;
    }
    let half_b = ray.origin.dot(ray.dir);

    // Distance to the center measured off the ray; avoids cancellation when the
    // origin is far away.
    let off_axis = ray.origin - ray.dir * (half_b / a);
    let disc = a * (radius * radius - off_axis.length_squared());
    if disc <= 0.0 {
        return None;
    }

    let sq = disc.sqrt();
    let t0 = (-half_b - sq) / a;
    let t1 = (-half_b + sq) / a;

    let hit = |t: f32| Hit {
        t,
        normal: (ray.at(t) / radius).normalize_or_zero(),
    };
    Some(Span {
        enter: hit(t0),
        exit: hit(t1),
    })
}

/// Running slab intersection: the interval narrows as constraints are added.
struct Interval {
    enter: Hit,
    exit: Hit,
}

impl Interval {
    fn unbounded() -> Self {
        Self {
            enter: Hit { t: f32::NEG_INFINITY, normal: Vec3::ZERO },
            exit: Hit { t: f32::INFINITY, normal: Vec3::ZERO },
        }
    }

    /// Intersects with the slab `lo <= origin + t * dir <= hi` along one axis.
    /// Returns `false` when the ray misses the slab entirely.
    fn clip_slab(&mut self, origin: f32, dir: f32, lo: f32, hi: f32, axis: Vec3) -> bool {
        if dir == 0.0 {
            return origin >= lo && origin <= hi;
        }

        let (mut t_lo, mut t_hi) = ((lo - origin) / dir, (hi - origin) / dir);
        let (mut n_lo, mut n_hi) = (-axis, axis);
        if t_lo > t_hi {
            std::mem::swap(&mut t_lo, &mut t_hi);
            std::mem::swap(&mut n_lo, &mut n_hi);
        }

        self.clip(Hit { t: t_lo, normal: n_lo }, Hit { t: t_hi, normal: n_hi });
        true
    }

    fn clip(&mut self, enter: Hit, exit: Hit) {
        if enter.t > self.enter.t {
            self.enter = enter;
        }
        if exit.t < self.exit.t {
            self.exit = exit;
        }
    }

    fn into_span(self) -> Option<Span> {
        (self.enter.t < self.exit.t && self.enter.t.is_finite() && self.exit.t.is_finite()).then_some(
            Span {
                enter: self.enter,
                exit: self.exit,
            },
        )
    }
}

fn intersect_cube(ray: &Ray, half: f32) -> Option<Span> {
    let mut iv = Interval::unbounded();
    for (axis, unit) in [(0, Vec3::X), (1, Vec3::Y), (2, Vec3::Z)] {
        if !iv.clip_slab(ray.origin[axis], ray.dir[axis], -half, half, unit) {
            return None;
        }
    }
    iv.into_span()
}

fn intersect_cylinder(ray: &Ray, radius: f32, length: f32) -> Option<Span> {
    let mut iv = Interval::unbounded();

    // Side wall: x^2 + y^2 <= r^2.
    let (o, d) = (ray.origin, ray.dir);
    let a = d.x * d.x + d.y * d.y;
    let half_b = o.x * d.x + o.y * d.y;

    if a == 0.0 {
        if o.x * o.x + o.y * o.y > radius * radius {
            return None;
        }
    } else {
        let (px, py) = (o.x - d.x * half_b / a, o.y - d.y * half_b / a);
        let disc = a * (radius * radius - (px * px + py * py));
        if disc <= 0.0 {
            return None;
        }
        let sq = disc.sqrt();
        let wall = |t: f32| {
            let p = ray.at(t);
            Hit {
                t,
                normal: Vec3::new(p.x, p.y, 0.0).normalize_or_zero(),
            }
        };
        iv.clip(wall((-half_b - sq) / a), wall((-half_b + sq) / a));
    }

    // Caps.
    if !iv.clip_slab(o.z, d.z, 0.0, length, Vec3::Z) {
        return None;
    }
    iv.into_span()
}

//! Per-pixel visible-surface resolution over captured surface lists.
//!
//! Each pixel gets one sorted surface list per primitive. A candidate surface is
//! a front face of an intersected/unioned primitive or a back face of a
//! subtracted one; the nearest candidate lying inside the composite wins.

use crate::csg::Operation;
use crate::device::Surface;

/// Point-membership test for the composite `((∩ I) ∪ (∪ U)) − (∪ S)`.
pub(crate) struct Composite<'a> {
    ops: &'a [Operation],
    has_intersections: bool,
}

impl<'a> Composite<'a> {
    pub(crate) fn new(ops: &'a [Operation]) -> Self {
        Self {
            ops,
            has_intersections: ops.contains(&Operation::Intersection),
        }
    }

    /// Whether a point on the surface of primitive `on` lies on the composite,
    /// given `inside(j)` for every other primitive `j`.
    fn contains(&self, on: usize, inside: impl Fn(usize) -> bool) -> bool {
        let mut product = self.has_intersections;
        let mut unioned = false;

        for (j, &op) in self.ops.iter().enumerate() {
            let is_inside = if j == on { op.shows_front_faces() } else { inside(j) };
            match op {
                Operation::Intersection => product &= is_inside,
                Operation::Union => unioned |= is_inside,
                Operation::Subtraction => {
                    if is_inside {
                        return false;
                    }
                }
            }
        }

        product || unioned
    }
}

/// Goldfeather: membership by surface parity, candidates limited to the first
/// `layers[i]` surfaces of the visible facing of primitive `i`.
pub(crate) fn goldfeather(
    composite: &Composite<'_>,
    surfaces: &[&[Surface]],
    layers: &[usize],
) -> Option<f32> {
    let mut best: Option<f32> = None;

    for (i, &op) in composite.ops.iter().enumerate() {
        let wanted = op.shows_front_faces();
        let candidates = surfaces[i]
            .iter()
            .filter(|s| s.front_facing == wanted)
            .take(layers[i]);

        for candidate in candidates {
            let z = candidate.depth;
            if best.is_some_and(|b| z >= b) {
                break;
            }

            if composite.contains(i, |j| parity_inside(surfaces[j], z)) {
                best = Some(z);
                break;
            }
        }
    }

    best
}

/// Odd number of crossings before `z`. A list starting with a back face lost its
/// entry to the eye plane, so the ray starts inside.
fn parity_inside(surfaces: &[Surface], z: f32) -> bool {
    let clipped = surfaces.first().is_some_and(|s| !s.front_facing);
    let crossed = surfaces.iter().take_while(|s| s.depth < z).count();
    (crossed + usize::from(clipped)) % 2 == 1
}

/// Entry/exit depths of a convex primitive along one pixel ray.
#[derive(Debug, Copy, Clone)]
struct Interval {
    enter: Option<f32>,
    exit: Option<f32>,
}

impl Interval {
    fn of(surfaces: &[Surface]) -> Self {
        Self {
            enter: surfaces.iter().find(|s| s.front_facing).map(|s| s.depth),
            exit: surfaces.iter().rev().find(|s| !s.front_facing).map(|s| s.depth),
        }
    }

    fn contains(&self, z: f32) -> bool {
        match (self.enter, self.exit) {
            (Some(a), Some(b)) => a < z && z < b,
            // Entry clipped by the eye plane: everything up to the exit is inside.
            (None, Some(b)) => z < b,
            _ => false,
        }
    }
}

/// SCS fast path: each primitive is reduced to one interval per pixel.
pub(crate) fn scs(composite: &Composite<'_>, surfaces: &[&[Surface]]) -> Option<f32> {
    let intervals: Vec<Interval> = surfaces.iter().map(|s| Interval::of(s)).collect();
    let mut best: Option<f32> = None;

    for (i, &op) in composite.ops.iter().enumerate() {
        let candidate = if op.shows_front_faces() {
            intervals[i].enter
        } else {
            intervals[i].exit
        };
        let Some(z) = candidate else { continue };
        if best.is_some_and(|b| z >= b) {
            continue;
        }

        if composite.contains(i, |j| intervals[j].contains(z)) {
            best = Some(z);
        }
    }

    best
}

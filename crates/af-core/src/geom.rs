//! Vector geometry helpers shared by the actuator models.

use crate::numeric::Real;
use crate::{CoreError, CoreResult};
use nalgebra::{Matrix3, Rotation3, Unit, Vector3};

/// Cartesian 3-vector.
pub type Vec3 = Vector3<Real>;

/// 3x3 tensor, rows are the basis vectors of a local frame.
pub type Mat3 = Matrix3<Real>;

/// Magnitudes below this are treated as zero-length vectors.
pub const DEGENERATE_TOL: Real = 1e-12;

/// Normalize `v`, failing when its length is zero or non-finite.
pub fn normalized(v: &Vec3, what: &'static str) -> CoreResult<Vec3> {
    let magnitude = v.norm();
    if !magnitude.is_finite() || magnitude < DEGENERATE_TOL {
        return Err(CoreError::Degenerate { what, magnitude });
    }
    Ok(v / magnitude)
}

/// Rotate `v` by `angle` radians about `axis` (right-hand rule).
///
/// `axis` does not need to be unit length but must be non-degenerate.
pub fn rotate_about(axis: &Vec3, angle: Real, v: &Vec3) -> CoreResult<Vec3> {
    let unit = normalized(axis, "rotation axis")?;
    let rot = Rotation3::from_axis_angle(&Unit::new_unchecked(unit), angle);
    Ok(rot * v)
}

/// Convert degrees to radians.
#[inline]
pub fn radians(deg: Real) -> Real {
    deg.to_radians()
}

/// Axis-aligned box `[lo, hi]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub lo: [Real; 3],
    pub hi: [Real; 3],
}

impl BoundingBox {
    pub fn new(lo: [Real; 3], hi: [Real; 3]) -> Self {
        Self { lo, hi }
    }

    /// Smallest box containing every point; `None` for an empty iterator.
    pub fn enclosing<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Vec3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bb = Self::new([first.x, first.y, first.z], [first.x, first.y, first.z]);
        for p in iter {
            for n in 0..3 {
                bb.lo[n] = bb.lo[n].min(p[n]);
                bb.hi[n] = bb.hi[n].max(p[n]);
            }
        }
        Some(bb)
    }

    /// Grow the box by `margin` in every direction.
    pub fn expanded(&self, margin: Real) -> Self {
        let mut out = *self;
        for n in 0..3 {
            out.lo[n] -= margin;
            out.hi[n] += margin;
        }
        out
    }

    pub fn contains_point(&self, p: &Vec3) -> bool {
        (0..3).all(|n| p[n] >= self.lo[n] && p[n] <= self.hi[n])
    }

    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        (0..3).all(|n| other.lo[n] >= self.lo[n] && other.hi[n] <= self.hi[n])
    }

    pub fn length(&self, dir: usize) -> Real {
        self.hi[dir] - self.lo[dir]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn normalize_unit_result() {
        let n = normalized(&Vec3::new(3.0, 0.0, 4.0), "test").unwrap();
        assert!((n.norm() - 1.0).abs() < 1e-14);
        assert!((n.x - 0.6).abs() < 1e-14);
    }

    #[test]
    fn normalize_rejects_zero() {
        let err = normalized(&Vec3::zeros(), "disk normal").unwrap_err();
        assert!(err.to_string().contains("disk normal"));
    }

    #[test]
    fn quarter_turn_about_z() {
        let v = rotate_about(&Vec3::z(), FRAC_PI_2, &Vec3::x()).unwrap();
        assert!((v - Vec3::y()).norm() < 1e-14);
    }

    #[test]
    fn bounding_box_enclosing_and_expanding() {
        let pts = [Vec3::new(0.0, 1.0, 2.0), Vec3::new(-1.0, 3.0, 0.0)];
        let bb = BoundingBox::enclosing(pts.iter()).unwrap();
        assert_eq!(bb.lo, [-1.0, 1.0, 0.0]);
        assert_eq!(bb.hi, [0.0, 3.0, 2.0]);

        let big = bb.expanded(0.5);
        assert!(big.contains_box(&bb));
        assert!(!bb.contains_box(&big));
        assert!(big.contains_point(&Vec3::new(0.4, 3.4, -0.4)));
        assert!((big.length(1) - 3.0).abs() < 1e-14);
    }

    #[test]
    fn enclosing_empty_is_none() {
        assert!(BoundingBox::enclosing(std::iter::empty()).is_none());
    }

    proptest::proptest! {
        #[test]
        fn rotation_preserves_length_and_axis_component(
            ax in -1.0..1.0_f64, ay in -1.0..1.0_f64, az in 0.1..1.0_f64,
            vx in -10.0..10.0_f64, vy in -10.0..10.0_f64, vz in -10.0..10.0_f64,
            angle in -6.3..6.3_f64,
        ) {
            let axis = Vec3::new(ax, ay, az);
            let v = Vec3::new(vx, vy, vz);
            let r = rotate_about(&axis, angle, &v).unwrap();
            let unit = normalized(&axis, "axis").unwrap();
            proptest::prop_assert!((r.norm() - v.norm()).abs() < 1e-9);
            proptest::prop_assert!((r.dot(&unit) - v.dot(&unit)).abs() < 1e-9);
        }
    }
}

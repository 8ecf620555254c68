//! Filtered lifting line correction for actuator lines.
//!
//! A smoothed force distribution induces less downwash than the sharp
//! lifting line it represents. The correction estimates the difference
//! between the induced velocity for the optimal smoothing length
//! (`eps_opt = 0.25 c`) and for the smoothing actually used, from the
//! spanwise gradient of circulation, and adds it to the sampled velocity.
//! Updates are under-relaxed to keep the force/velocity loop stable.

use af_core::{CoreResult, Real, Vec3, normalized};
use std::f64::consts::PI;

pub const DEFAULT_RELAXATION: Real = 0.1;

/// Optimal smoothing length relative to the local chord.
pub const EPS_OPT_CHORD_RATIO: Real = 0.25;

#[derive(Clone, Debug)]
pub struct FllcData {
    pub relaxation: Real,
    /// Velocity correction per point, added at the next velocity update.
    pub correction: Vec<Vec3>,
    /// Point positions at the last geometry refresh.
    pub prev_pos: Vec<Vec3>,
    /// Midpoints between consecutive points, where circulation jumps sit.
    pub midpoints: Vec<Vec3>,
    pub span_dir: Vec3,
}

impl FllcData {
    pub fn new(relaxation: Real) -> Self {
        Self {
            relaxation,
            correction: Vec::new(),
            prev_pos: Vec::new(),
            midpoints: Vec::new(),
            span_dir: Vec3::z(),
        }
    }

    pub fn init(&mut self, pos: &[Vec3]) -> CoreResult<()> {
        self.correction = vec![Vec3::zeros(); pos.len()];
        self.prev_pos.clear();
        self.update_geometry(pos).map(|_| ())
    }

    /// Refresh spanwise geometry if the points moved since the last call.
    /// Returns whether anything changed.
    pub fn update_geometry(&mut self, pos: &[Vec3]) -> CoreResult<bool> {
        if self.prev_pos.as_slice() == pos {
            return Ok(false);
        }
        if let (Some(first), Some(last)) = (pos.first(), pos.last()) {
            self.span_dir = normalized(&(last - first), "fllc span direction")?;
        }
        self.midpoints = pos.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect();
        self.prev_pos = pos.to_vec();
        Ok(true)
    }

    /// Update the correction from the current circulation distribution.
    ///
    /// `circulation`, `chord`, `eps_les` and `lift_dir` are per point.
    pub fn compute_correction(
        &mut self,
        circulation: &[Real],
        chord: &[Real],
        eps_les: &[Real],
        lift_dir: &[Vec3],
    ) {
        let n = circulation.len();
        for i in 0..n {
            let eps_opt = EPS_OPT_CHORD_RATIO * chord[i];
            let eps_les_i = eps_les[i];
            let mut du = 0.0;
            for j in 0..n.saturating_sub(1) {
                let dg = circulation[j + 1] - circulation[j];
                let r = (self.prev_pos[i] - self.midpoints[j]).dot(&self.span_dir);
                if r.abs() < 1e-12 {
                    continue;
                }
                let r2 = r * r;
                let f_les = (-r2 / (eps_les_i * eps_les_i)).exp();
                let f_opt = (-r2 / (eps_opt * eps_opt)).exp();
                du += -dg / (4.0 * PI * r) * (f_les - f_opt);
            }
            let target = lift_dir[i] * du;
            self.correction[i] =
                self.correction[i] * (1.0 - self.relaxation) + target * self.relaxation;
        }
    }

    pub fn max_correction(&self) -> Real {
        self.correction.iter().map(|c| c.norm()).fold(0.0, Real::max)
    }
}

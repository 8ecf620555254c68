//! Flow-field sampling seam.
//!
//! The fluid solver owns the velocity and density fields. Actuators only need
//! point values at their sample locations, so the solver side implements
//! [`FieldSampler`]. Two analytic inflows are provided for drivers and tests.

use af_core::{BoundingBox, Real, Vec3};
use thiserror::Error;

/// Velocity and density at a point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSample {
    pub velocity: Vec3,
    pub density: Real,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SampleError {
    #[error("point ({x}, {y}, {z}) is outside the flow domain")]
    OutsideDomain { x: Real, y: Real, z: Real },

    #[error("field unavailable: {what}")]
    Unavailable { what: String },
}

impl SampleError {
    pub fn outside(p: &Vec3) -> Self {
        SampleError::OutsideDomain {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}

/// Point sampler over the current flow state.
///
/// Called once per velocity sample point per step, possibly from several
/// actuators in parallel.
pub trait FieldSampler: Sync {
    /// Simulation domain, if bounded.
    fn domain(&self) -> Option<BoundingBox> {
        None
    }

    fn sample(&self, pos: &Vec3) -> Result<FieldSample, SampleError>;
}

fn check_domain(domain: &Option<BoundingBox>, pos: &Vec3) -> Result<(), SampleError> {
    match domain {
        Some(bb) if !bb.contains_point(pos) => Err(SampleError::outside(pos)),
        _ => Ok(()),
    }
}

/// Spatially uniform inflow.
#[derive(Clone, Debug)]
pub struct UniformFlow {
    pub velocity: Vec3,
    pub density: Real,
    pub domain: Option<BoundingBox>,
}

impl UniformFlow {
    pub fn new(velocity: Vec3, density: Real) -> Self {
        Self {
            velocity,
            density,
            domain: None,
        }
    }

    pub fn within(mut self, domain: BoundingBox) -> Self {
        self.domain = Some(domain);
        self
    }
}

impl FieldSampler for UniformFlow {
    fn domain(&self) -> Option<BoundingBox> {
        self.domain
    }

    fn sample(&self, pos: &Vec3) -> Result<FieldSample, SampleError> {
        check_domain(&self.domain, pos)?;
        Ok(FieldSample {
            velocity: self.velocity,
            density: self.density,
        })
    }
}

/// Atmospheric power-law shear: `U(z) = u_ref (z / z_ref)^alpha` along
/// `direction`, zero at and below the ground.
#[derive(Clone, Debug)]
pub struct PowerLawShear {
    pub u_ref: Real,
    pub z_ref: Real,
    pub alpha: Real,
    pub direction: Vec3,
    pub density: Real,
    pub domain: Option<BoundingBox>,
}

impl FieldSampler for PowerLawShear {
    fn domain(&self) -> Option<BoundingBox> {
        self.domain
    }

    fn sample(&self, pos: &Vec3) -> Result<FieldSample, SampleError> {
        check_domain(&self.domain, pos)?;
        if self.z_ref <= 0.0 {
            return Err(SampleError::Unavailable {
                what: "shear reference height must be positive".to_string(),
            });
        }
        let speed = if pos.z > 0.0 {
            self.u_ref * (pos.z / self.z_ref).powf(self.alpha)
        } else {
            0.0
        };
        Ok(FieldSample {
            velocity: self.direction * speed,
            density: self.density,
        })
    }
}

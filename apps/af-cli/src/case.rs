//! Case file: domain, analytic inflow, step count and the actuator deck.

use af_actuator::{FieldSampler, PowerLawShear, UniformFlow};
use af_core::units::constants::RHO_AIR;
use af_core::{BoundingBox, Real, Vec3};
use serde::Deserialize;
use serde_yaml::Mapping;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaseError {
    #[error("Failed to read case file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse case file {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("Invalid case: {what}")]
    Invalid { what: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct DomainConfig {
    pub lo: [Real; 3],
    pub hi: [Real; 3],
}

impl DomainConfig {
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.lo, self.hi)
    }
}

fn default_density() -> Real {
    RHO_AIR
}

fn default_direction() -> [Real; 3] {
    [1.0, 0.0, 0.0]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InflowConfig {
    Uniform {
        velocity: [Real; 3],
        #[serde(default = "default_density")]
        density: Real,
    },
    Shear {
        u_ref: Real,
        z_ref: Real,
        alpha: Real,
        #[serde(default = "default_direction")]
        direction: [Real; 3],
        #[serde(default = "default_density")]
        density: Real,
    },
}

impl InflowConfig {
    pub fn sampler(&self, domain: Option<BoundingBox>) -> Result<Box<dyn FieldSampler>, CaseError> {
        match self {
            InflowConfig::Uniform { velocity, density } => {
                let mut flow = UniformFlow::new(Vec3::from(*velocity), *density);
                flow.domain = domain;
                Ok(Box::new(flow))
            }
            InflowConfig::Shear {
                u_ref,
                z_ref,
                alpha,
                direction,
                density,
            } => {
                let direction = af_core::normalized(&Vec3::from(*direction), "shear direction")
                    .map_err(|e| CaseError::Invalid { what: e.to_string() })?;
                Ok(Box::new(PowerLawShear {
                    u_ref: *u_ref,
                    z_ref: *z_ref,
                    alpha: *alpha,
                    direction,
                    density: *density,
                    domain,
                }))
            }
        }
    }
}

fn default_steps() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaseConfig {
    /// Omitted domain means unbounded.
    #[serde(default)]
    pub domain: Option<DomainConfig>,
    pub inflow: InflowConfig,
    #[serde(default = "default_steps")]
    pub steps: usize,
    pub actuators: Mapping,
}

impl CaseConfig {
    pub fn from_yaml(yaml: &str, path: &str) -> Result<Self, CaseError> {
        serde_yaml::from_str(yaml).map_err(|source| CaseError::Parse {
            path: path.to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, CaseError> {
        let display = path.display().to_string();
        let yaml = std::fs::read_to_string(path).map_err(|source| CaseError::Io {
            path: display.clone(),
            source,
        })?;
        Self::from_yaml(&yaml, &display)
    }

    pub fn domain_box(&self) -> Option<BoundingBox> {
        self.domain.as_ref().map(DomainConfig::bounding_box)
    }
}

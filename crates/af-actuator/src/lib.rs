//! af-actuator: actuator-disk and actuator-line force models.
//!
//! An actuator is a set of points that exerts body forces on the flow. Each
//! instance pairs a kind (what computes the force) with a source topology
//! (how the force is distributed):
//!
//! - `UniformCtDisk`: rotor disk with a uniform thrust coefficient
//! - `FixedWingLine`: fixed wing as an actuator line, with optional filtered
//!   lifting-line correction
//!
//! Instances advance through parse, init and a repeated
//! positions / velocities / forces step. The flow solver supplies point
//! samples through [`FieldSampler`] and reads forces back through
//! [`ForceView`].

pub mod container;
pub mod data;
pub mod error;
pub mod field;
pub mod model;
pub mod ops;
pub mod registry;
pub mod types;

pub use container::{ActuatorContainer, LABELS_KEY};
pub use data::{ActDataHolder, ActGrid, ActInfo};
pub use error::{ActError, ActResult};
pub use field::{FieldSample, FieldSampler, PowerLawShear, SampleError, UniformFlow};
pub use model::{ActModel, Actuator, ActuatorSnapshot, ForceView};
pub use ops::disk::{DiskBaseData, DiskSummary};
pub use ops::wing::WingBaseData;
pub use ops::{ActuatorOps, InitContext};
pub use registry::{ActuatorCtor, ActuatorRegistry, register_builtin_actuators};
pub use types::{
    ActSrc, ActSrcDisk, ActSrcLine, ActTrait, FixedWing, KindTag, Stage, TopologyTag, UniformCt,
    identifier,
};

//! Lifecycle operations for each actuator kind and source topology.
//!
//! [`ActuatorOps`] has one method per pipeline stage, each defaulting to a
//! no-op. Every `(kind, topology)` pair gets its own `impl`, including pairs
//! that do nothing (an empty `impl` block). A pair without an `impl` cannot
//! be registered, so a new kind never inherits another kind's behavior by
//! accident.

pub mod disk;
pub mod fllc;
pub mod wing;

use crate::data::ActDataHolder;
use crate::error::ActResult;
use crate::types::{ActSrc, ActTrait};
use af_core::{BoundingBox, Real};
use af_interp::AirfoilCache;
use af_params::{ActParser, Rule};

/// Shared resources available while initializing actuators.
pub struct InitContext<'a> {
    /// Simulation domain; `None` skips the containment check.
    pub domain: Option<BoundingBox>,
    pub airfoils: &'a mut AirfoilCache,
}

/// Stage behavior for kind `Self` with source topology `S`.
pub trait ActuatorOps<S: ActSrc>: ActTrait {
    /// Cross-parameter rules checked before any value is read.
    const PARSE_RULES: &'static [Rule] = &[];

    /// Read inputs into metadata and compute parse-time geometry.
    fn read_inputs(_data: &mut ActDataHolder<Self>, _pp: &ActParser) -> ActResult<()> {
        Ok(())
    }

    /// Allocate and populate the grid.
    fn init_data(_data: &mut ActDataHolder<Self>, _ctx: &mut InitContext<'_>) -> ActResult<()> {
        Ok(())
    }

    /// Move points for the current step.
    fn update_pos(_data: &mut ActDataHolder<Self>) -> ActResult<()> {
        Ok(())
    }

    /// Reduce freshly sampled velocities (`grid.vel`, `grid.density`).
    fn update_vel(_data: &mut ActDataHolder<Self>) -> ActResult<()> {
        Ok(())
    }

    /// Fill `grid.force`.
    fn compute_force(_data: &mut ActDataHolder<Self>) -> ActResult<()> {
        Ok(())
    }

    /// Time-varying scalars for diagnostics.
    fn scalars(_data: &ActDataHolder<Self>) -> Vec<(&'static str, Real)> {
        Vec::new()
    }
}

//! Per-instance containers: point grid, info and the data holder tying them
//! to a kind's metadata.

use crate::types::ActTrait;
use af_core::{ActuatorId, BoundingBox, Mat3, Real, Vec3};

/// Point arrays for one actuator.
///
/// Force points (`pos`, `force`, `epsilon`, `orientation`) and velocity
/// sample points (`vel_pos`, `vel`, `density`) may have different lengths.
/// Kinds only size the arrays they use. Sizes are fixed at init.
#[derive(Clone, Debug, Default)]
pub struct ActGrid {
    pub pos: Vec<Vec3>,
    pub force: Vec<Vec3>,
    pub epsilon: Vec<Vec3>,
    pub orientation: Vec<Mat3>,
    pub vel_pos: Vec<Vec3>,
    pub vel: Vec<Vec3>,
    pub density: Vec<Real>,
}

impl ActGrid {
    /// Size the force-point arrays.
    pub fn resize_force_points(&mut self, n: usize, with_frames: bool) {
        self.pos.resize(n, Vec3::zeros());
        self.force.resize(n, Vec3::zeros());
        self.epsilon.resize(n, Vec3::zeros());
        if with_frames {
            self.orientation.resize(n, Mat3::identity());
        }
    }

    /// Size the velocity-sample arrays.
    pub fn resize_velocity_points(&mut self, n: usize) {
        self.vel_pos.resize(n, Vec3::zeros());
        self.vel.resize(n, Vec3::zeros());
        self.density.resize(n, 0.0);
    }

    pub fn num_force_points(&self) -> usize {
        self.pos.len()
    }

    pub fn num_velocity_points(&self) -> usize {
        self.vel_pos.len()
    }
}

/// Identity and region of influence of an actuator.
#[derive(Clone, Debug)]
pub struct ActInfo {
    pub label: String,
    pub id: ActuatorId,
    /// Region of influence; the only geometry the mesh layer sees.
    pub bound_box: BoundingBox,
}

impl ActInfo {
    pub fn new(label: impl Into<String>, id: ActuatorId) -> Self {
        Self {
            label: label.into(),
            id,
            bound_box: BoundingBox::default(),
        }
    }
}

/// Metadata, grid and info of one actuator instance.
#[derive(Debug)]
pub struct ActDataHolder<T: ActTrait> {
    pub meta: T::MetaType,
    pub grid: ActGrid,
    pub info: ActInfo,
}

impl<T: ActTrait> ActDataHolder<T> {
    pub fn new(label: impl Into<String>, id: ActuatorId) -> Self {
        Self {
            meta: T::MetaType::default(),
            grid: ActGrid::default(),
            info: ActInfo::new(label, id),
        }
    }

    pub fn label(&self) -> &str {
        &self.info.label
    }
}

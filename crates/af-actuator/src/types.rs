//! Actuator kinds, source topologies and lifecycle stages.
//!
//! Kinds and topologies are zero-sized marker types. Behavior for a
//! `(kind, topology)` pair is attached through
//! [`ActuatorOps`](crate::ops::ActuatorOps) implementations, so the routine
//! that runs for a stage is fixed at compile time. The `KindTag` and
//! `TopologyTag` enums mirror the markers for runtime bookkeeping (registry
//! keys, coverage checks).

use serde::Serialize;
use std::fmt;

/// Closed set of actuator kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum KindTag {
    UniformCt,
    FixedWing,
}

impl KindTag {
    pub const ALL: [KindTag; 2] = [KindTag::UniformCt, KindTag::FixedWing];

    pub fn name(self) -> &'static str {
        match self {
            KindTag::UniformCt => "UniformCt",
            KindTag::FixedWing => "FixedWing",
        }
    }
}

/// Closed set of force-source topologies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TopologyTag {
    Disk,
    Line,
}

impl TopologyTag {
    pub const ALL: [TopologyTag; 2] = [TopologyTag::Disk, TopologyTag::Line];

    pub fn name(self) -> &'static str {
        match self {
            TopologyTag::Disk => "Disk",
            TopologyTag::Line => "Line",
        }
    }
}

/// Registry identifier of a kind/topology pair, e.g. `UniformCtDisk`.
pub fn identifier(kind: KindTag, topology: TopologyTag) -> String {
    format!("{}{}", kind.name(), topology.name())
}

/// An actuator kind: owns a metadata type.
pub trait ActTrait: Send + Sync + Sized + 'static {
    type MetaType: Default + fmt::Debug + Send;

    const KIND: KindTag;
}

/// A source topology describing how forces are spread into the flow.
pub trait ActSrc: Send + Sync + 'static {
    const TOPOLOGY: TopologyTag;
}

/// Uniform thrust-coefficient rotor disk.
#[derive(Debug)]
pub struct UniformCt;

/// Fixed wing represented by an actuator line.
#[derive(Debug)]
pub struct FixedWing;

/// Forces spread over a disk.
#[derive(Debug)]
pub struct ActSrcDisk;

/// Forces spread along a line of points.
#[derive(Debug)]
pub struct ActSrcLine;

impl ActSrc for ActSrcDisk {
    const TOPOLOGY: TopologyTag = TopologyTag::Disk;
}

impl ActSrc for ActSrcLine {
    const TOPOLOGY: TopologyTag = TopologyTag::Line;
}

/// Lifecycle stage of an actuator instance.
///
/// ```text
/// Uninitialized --read_inputs--> Parsed --init--> Ready
/// Ready --update_pos / update_vel / compute_force--> Ready
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Stage {
    Uninitialized,
    Parsed,
    Ready,
}

//! Explicit constructor table keyed by `<Kind><Topology>` identifiers.
//!
//! Nothing registers itself. Drivers build a registry with
//! [`register_builtin_actuators`] (or [`ActuatorRegistry::with_builtins`])
//! and can check it against every kind/topology combination with
//! [`ActuatorRegistry::verify_coverage`].

use crate::error::{ActError, ActResult};
use crate::model::{ActModel, Actuator};
use crate::ops::ActuatorOps;
use crate::types::{
    ActSrc, ActSrcDisk, ActSrcLine, FixedWing, KindTag, TopologyTag, UniformCt, identifier,
};
use af_core::ActuatorId;
use af_params::ActParser;
use std::collections::BTreeMap;
use tracing::debug;

/// Builds a parsed instance from its parameters.
pub type ActuatorCtor = fn(ActuatorId, &ActParser) -> ActResult<Box<dyn Actuator>>;

fn construct<T: ActuatorOps<S>, S: ActSrc>(
    id: ActuatorId,
    pp: &ActParser,
) -> ActResult<Box<dyn Actuator>> {
    Ok(Box::new(ActModel::<T, S>::from_parser(id, pp)?))
}

#[derive(Default)]
pub struct ActuatorRegistry {
    ctors: BTreeMap<String, ActuatorCtor>,
}

impl ActuatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in pair.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        register_builtin_actuators(&mut registry);
        registry
    }

    /// Register the `(T, S)` pair under its identifier. Re-registering
    /// replaces the previous constructor.
    pub fn register<T: ActuatorOps<S>, S: ActSrc>(&mut self) {
        let id = ActModel::<T, S>::type_identifier();
        debug!(identifier = %id, "registering actuator type");
        self.ctors.insert(id, construct::<T, S>);
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.ctors.contains_key(identifier)
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.ctors.keys().map(String::as_str)
    }

    /// Construct and parse an instance of the parser's `type`.
    pub fn create(&self, id: ActuatorId, pp: &ActParser) -> ActResult<Box<dyn Actuator>> {
        let ctor = self
            .ctors
            .get(pp.type_name())
            .ok_or_else(|| ActError::UnknownType {
                identifier: pp.type_name().to_string(),
            })?;
        ctor(id, pp)
    }

    /// Every kind/topology combination must have a constructor.
    pub fn verify_coverage(&self) -> ActResult<()> {
        let missing: Vec<String> = KindTag::ALL
            .iter()
            .flat_map(|k| TopologyTag::ALL.iter().map(move |t| identifier(*k, *t)))
            .filter(|id| !self.contains(id))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ActError::Coverage { missing })
        }
    }
}

/// Register all built-in `(kind, topology)` pairs, including the pairs whose
/// stages do nothing.
pub fn register_builtin_actuators(registry: &mut ActuatorRegistry) {
    registry.register::<UniformCt, ActSrcDisk>();
    registry.register::<UniformCt, ActSrcLine>();
    registry.register::<FixedWing, ActSrcLine>();
    registry.register::<FixedWing, ActSrcDisk>();
}

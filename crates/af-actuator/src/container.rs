//! Collection of actuator instances driven together.
//!
//! Construction and init are sequential (init shares the airfoil cache).
//! Stepping is parallel across instances: each instance runs its stages in
//! order on its own data, and the only shared state is read-only.

use crate::error::{ActError, ActResult};
use crate::field::FieldSampler;
use crate::model::{Actuator, ActuatorSnapshot};
use crate::ops::InitContext;
use crate::registry::ActuatorRegistry;
use af_core::{ActuatorId, BoundingBox};
use af_interp::AirfoilCache;
use af_params::{ActParser, ParamError};
use rayon::prelude::*;
use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

/// Key listing the instance labels inside the `actuators` mapping.
pub const LABELS_KEY: &str = "labels";

#[derive(Default)]
pub struct ActuatorContainer {
    actuators: Vec<Box<dyn Actuator>>,
}

impl ActuatorContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every instance named in `actuators.labels`, in order. Ids follow
    /// the label position.
    pub fn from_mapping(registry: &ActuatorRegistry, actuators: &Mapping) -> ActResult<Self> {
        let labels: Vec<String> = match actuators.get(LABELS_KEY) {
            Some(v) => serde_yaml::from_value(v.clone()).map_err(|e| ParamError::Malformed {
                label: String::new(),
                key: LABELS_KEY.to_string(),
                reason: e.to_string(),
            })?,
            None => {
                return Err(ParamError::Missing {
                    label: String::new(),
                    key: LABELS_KEY.to_string(),
                }
                .into());
            }
        };

        let mut container = Self::new();
        for label in &labels {
            if container.get(label).is_some() {
                return Err(ActError::configuration(label, "label listed more than once"));
            }
            let pp = ActParser::from_actuators(actuators, label)?;
            let index = u32::try_from(container.len())
                .ok()
                .and_then(ActuatorId::from_index)
                .ok_or_else(|| ActError::configuration(label, "too many actuators"))?;
            let act = registry.create(index, &pp)?;
            info!(
                label = %label,
                kind = %act.identifier(),
                bound_box = ?act.info().bound_box,
                "actuator constructed"
            );
            container.push(act);
        }
        Ok(container)
    }

    /// Parse a YAML document whose top level holds an `actuators` mapping.
    pub fn from_yaml(registry: &ActuatorRegistry, yaml: &str) -> ActResult<Self> {
        let doc: Mapping = serde_yaml::from_str(yaml).map_err(|e| ParamError::Structure {
            what: format!("invalid actuator input: {e}"),
        })?;
        let actuators = doc
            .get("actuators")
            .and_then(Value::as_mapping)
            .ok_or_else(|| ParamError::Structure {
                what: "missing 'actuators' section".to_string(),
            })?;
        Self::from_mapping(registry, actuators)
    }

    pub fn push(&mut self, actuator: Box<dyn Actuator>) {
        self.actuators.push(actuator);
    }

    /// Initialize all instances against `domain`.
    pub fn init_all(
        &mut self,
        domain: Option<BoundingBox>,
        airfoils: &mut AirfoilCache,
    ) -> ActResult<()> {
        let mut ctx = InitContext { domain, airfoils };
        for act in &mut self.actuators {
            act.init(&mut ctx)?;
        }
        debug!(
            count = self.actuators.len(),
            airfoils = ctx.airfoils.len(),
            "actuators initialized"
        );
        Ok(())
    }

    /// Advance every instance one step. Stops at the first failure.
    pub fn step(&mut self, field: &dyn FieldSampler) -> ActResult<()> {
        self.actuators
            .par_iter_mut()
            .try_for_each(|act| act.step(field))
    }

    pub fn snapshots(&self) -> Vec<ActuatorSnapshot> {
        self.actuators.iter().map(|a| a.snapshot()).collect()
    }

    pub fn get(&self, label: &str) -> Option<&dyn Actuator> {
        self.actuators
            .iter()
            .find(|a| a.label() == label)
            .map(|a| a.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Actuator> {
        self.actuators.iter().map(|a| a.as_ref())
    }

    pub fn len(&self) -> usize {
        self.actuators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actuators.is_empty()
    }
}

//! Layered key/value access to one actuator's inputs.

use crate::error::{ParamError, ParamResult};
use af_core::{Real, Vec3};
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};

/// Key holding the actuator type identifier inside an instance block.
pub const TYPE_KEY: &str = "type";

/// Key of the per-type defaults block inside the `actuators` mapping.
pub const DEFAULTS_KEY: &str = "defaults";

/// Parameter source for a single actuator instance.
///
/// Lookups check the instance block first, then the defaults block of the
/// instance's type. Values are deserialized on access; nothing is cached or
/// written back.
#[derive(Clone, Debug)]
pub struct ActParser {
    label: String,
    type_name: String,
    instance: Mapping,
    defaults: Mapping,
}

impl ActParser {
    pub fn new(
        label: impl Into<String>,
        type_name: impl Into<String>,
        instance: Mapping,
        defaults: Option<Mapping>,
    ) -> Self {
        Self {
            label: label.into(),
            type_name: type_name.into(),
            instance,
            defaults: defaults.unwrap_or_default(),
        }
    }

    /// Build the parser for `label` out of an `actuators` mapping.
    ///
    /// The instance block must exist and carry a string `type` entry.
    pub fn from_actuators(actuators: &Mapping, label: &str) -> ParamResult<Self> {
        let instance = actuators
            .get(label)
            .and_then(Value::as_mapping)
            .ok_or_else(|| ParamError::Structure {
                what: format!("no input block for actuator '{label}'"),
            })?
            .clone();

        let type_name = instance
            .get(TYPE_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| ParamError::Missing {
                label: label.to_string(),
                key: TYPE_KEY.to_string(),
            })?
            .to_string();

        let defaults = actuators
            .get(DEFAULTS_KEY)
            .and_then(Value::as_mapping)
            .and_then(|d| d.get(type_name.as_str()))
            .and_then(Value::as_mapping)
            .cloned();

        Ok(Self::new(label, type_name, instance, defaults))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// True when `key` is present in the instance or its defaults.
    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Read a required value.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> ParamResult<T> {
        let value = self.lookup(key).ok_or_else(|| self.missing(key))?;
        self.decode(key, value)
    }

    /// Read an optional value into `value`; leaves it untouched when absent.
    pub fn query<T: DeserializeOwned>(&self, key: &str, value: &mut T) -> ParamResult<bool> {
        match self.lookup(key) {
            Some(v) => {
                *value = self.decode(key, v)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Read a required sequence. A scalar is accepted as a one-element list.
    pub fn getarr<T: DeserializeOwned>(&self, key: &str) -> ParamResult<Vec<T>> {
        let value = self.lookup(key).ok_or_else(|| self.missing(key))?;
        self.decode_seq(key, value)
    }

    /// Read an optional sequence into `value`; leaves it untouched when absent.
    pub fn queryarr<T: DeserializeOwned>(
        &self,
        key: &str,
        value: &mut Vec<T>,
    ) -> ParamResult<bool> {
        match self.lookup(key) {
            Some(v) => {
                *value = self.decode_seq(key, v)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Read a required 3-vector given as `[x, y, z]`.
    pub fn get_vec3(&self, key: &str) -> ParamResult<Vec3> {
        let xyz: [Real; 3] = self.get(key)?;
        Ok(Vec3::from(xyz))
    }

    /// Read an optional 3-vector; leaves `value` untouched when absent.
    pub fn query_vec3(&self, key: &str, value: &mut Vec3) -> ParamResult<bool> {
        let mut xyz = [value.x, value.y, value.z];
        let found = self.query(key, &mut xyz)?;
        if found {
            *value = Vec3::from(xyz);
        }
        Ok(found)
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        self.instance.get(key).or_else(|| self.defaults.get(key))
    }

    fn missing(&self, key: &str) -> ParamError {
        ParamError::Missing {
            label: self.label.clone(),
            key: key.to_string(),
        }
    }

    fn decode<T: DeserializeOwned>(&self, key: &str, value: &Value) -> ParamResult<T> {
        serde_yaml::from_value(value.clone()).map_err(|e| ParamError::Malformed {
            label: self.label.clone(),
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    fn decode_seq<T: DeserializeOwned>(&self, key: &str, value: &Value) -> ParamResult<Vec<T>> {
        match value {
            Value::Sequence(_) => self.decode(key, value),
            scalar => Ok(vec![self.decode(key, scalar)?]),
        }
    }
}

//! Error types for parameter lookup and validation.

use thiserror::Error;

pub type ParamResult<T> = Result<T, ParamError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("Actuator '{label}': missing required parameter '{key}'")]
    Missing { label: String, key: String },

    #[error("Actuator '{label}': malformed parameter '{key}' ({reason})")]
    Malformed {
        label: String,
        key: String,
        reason: String,
    },

    #[error("Actuator '{label}': invalid parameters:\n{}", .violations.join("\n"))]
    Invalid {
        label: String,
        violations: Vec<String>,
    },

    #[error("Invalid actuator input structure: {what}")]
    Structure { what: String },
}

impl ParamError {
    /// Parameter name the error points at, if a single one is involved.
    pub fn key(&self) -> Option<&str> {
        match self {
            ParamError::Missing { key, .. } | ParamError::Malformed { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Actuator label the error belongs to, if known.
    pub fn label(&self) -> Option<&str> {
        match self {
            ParamError::Missing { label, .. }
            | ParamError::Malformed { label, .. }
            | ParamError::Invalid { label, .. } => Some(label),
            ParamError::Structure { .. } => None,
        }
    }
}

//! Error types for actuator construction and stepping.

use af_core::CoreError;
use af_interp::InterpError;
use af_params::ParamError;
use std::fmt;
use thiserror::Error;

use crate::types::Stage;

pub type ActResult<T> = Result<T, ActError>;

/// Failures are setup or contract violations; none of them are retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActError {
    /// Missing, conflicting or malformed inputs.
    #[error("Configuration error for actuator '{label}': {message}")]
    Configuration { label: String, message: String },

    /// Degenerate vectors, mismatched or non-monotonic tables.
    #[error("Geometry error for actuator '{label}': {what}")]
    Geometry { label: String, what: String },

    /// Actuator outside the simulation domain or unresolvable sample points.
    #[error("Domain error for actuator '{label}': {what}")]
    Domain { label: String, what: String },

    #[error("Actuator '{label}' expected stage {expected:?}, found {found:?}")]
    Lifecycle {
        label: String,
        expected: Stage,
        found: Stage,
    },

    #[error("Unknown actuator type '{identifier}'")]
    UnknownType { identifier: String },

    #[error("Actuator registry is missing strategies for: {}", .missing.join(", "))]
    Coverage { missing: Vec<String> },
}

impl ActError {
    pub fn configuration(label: &str, message: impl fmt::Display) -> Self {
        ActError::Configuration {
            label: label.to_string(),
            message: message.to_string(),
        }
    }

    pub fn geometry(label: &str, what: impl fmt::Display) -> Self {
        ActError::Geometry {
            label: label.to_string(),
            what: what.to_string(),
        }
    }

    pub fn domain(label: &str, what: impl fmt::Display) -> Self {
        ActError::Domain {
            label: label.to_string(),
            what: what.to_string(),
        }
    }

    /// Table shape problems are geometry errors; unreadable sources are
    /// configuration errors.
    pub fn from_interp(label: &str, e: InterpError) -> Self {
        match e {
            InterpError::Load { .. } | InterpError::UnknownFormat { .. } => {
                Self::configuration(label, e)
            }
            _ => Self::geometry(label, e),
        }
    }

    pub fn from_core(label: &str, e: CoreError) -> Self {
        Self::geometry(label, e)
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            ActError::Configuration { label, .. }
            | ActError::Geometry { label, .. }
            | ActError::Domain { label, .. }
            | ActError::Lifecycle { label, .. } => Some(label),
            ActError::UnknownType { .. } | ActError::Coverage { .. } => None,
        }
    }
}

impl From<ParamError> for ActError {
    fn from(e: ParamError) -> Self {
        let label = e.label().unwrap_or_default().to_string();
        ActError::Configuration {
            label,
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_error_keeps_label_and_key() {
        let err: ActError = ParamError::Missing {
            label: "T1".to_string(),
            key: "rotor_diameter".to_string(),
        }
        .into();
        assert_eq!(err.label(), Some("T1"));
        assert!(err.to_string().contains("rotor_diameter"));
    }

    #[test]
    fn interp_errors_split_by_cause() {
        let load = ActError::from_interp(
            "W1",
            InterpError::Load {
                path: "a.txt".to_string(),
                reason: "missing".to_string(),
            },
        );
        assert!(matches!(load, ActError::Configuration { .. }));

        let shape = ActError::from_interp(
            "W1",
            InterpError::LengthMismatch {
                what: "chord".to_string(),
                x_len: 2,
                y_len: 3,
            },
        );
        assert!(matches!(shape, ActError::Geometry { .. }));
    }
}

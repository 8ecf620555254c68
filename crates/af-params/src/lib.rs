//! af-params: actuator parameter source and input validation.
//!
//! Actuator inputs live in a YAML mapping. Each instance is looked up by
//! label and falls back to a per-type defaults block:
//!
//! ```yaml
//! actuators:
//!   defaults:
//!     UniformCtDisk:
//!       density: 1.225
//!   T1:
//!     type: UniformCtDisk
//!     rotor_diameter: 126.0
//! ```

pub mod error;
pub mod parser;
pub mod validate;

pub use error::{ParamError, ParamResult};
pub use parser::{ActParser, DEFAULTS_KEY, TYPE_KEY};
pub use validate::{ParseDiagnostics, Rule, validate};

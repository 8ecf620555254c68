//! af-core: shared foundation for actuflow.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - geom (Vec3/Mat3 aliases, rotations, bounding boxes)
//! - ids (compact actuator IDs)
//! - units (uom SI types + constructors)
//! - error (shared error types)

pub mod error;
pub mod geom;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use geom::*;
pub use ids::*;
pub use numeric::*;

//! af-interp: table lookups for actuator models.
//!
//! Provides:
//! - clamped linear interpolation over strictly increasing tables
//! - a single-pass variant for non-decreasing query sequences
//! - immutable tables shared through `Arc`
//! - airfoil polars (angle of attack -> lift/drag) with a loader and cache
//!
//! Queries outside a table's range clamp to the nearest endpoint; they are
//! never an error.

pub mod airfoil;
pub mod error;
pub mod linear;
pub mod table;

pub use airfoil::{AirfoilCache, AirfoilFormat, AirfoilLoader, AirfoilTable};
pub use error::{InterpError, InterpResult};
pub use linear::{linear, linear_monotonic};
pub use table::{SharedTable, Table};

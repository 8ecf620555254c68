//! Immutable lookup tables.

use crate::error::InterpResult;
use crate::linear::{check_table, eval_checked};
use af_core::Real;
use std::sync::Arc;

/// Reference-counted handle to a table shared between actuators and lookups.
pub type SharedTable = Arc<Table>;

/// Ordered `(x, y)` pairs with `x` strictly increasing.
///
/// Validated once at construction; there is no way to mutate a table after
/// that, so lookups never need to re-check it.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    name: String,
    x: Vec<Real>,
    y: Vec<Real>,
}

impl Table {
    pub fn new(name: impl Into<String>, x: Vec<Real>, y: Vec<Real>) -> InterpResult<Self> {
        let name = name.into();
        check_table(&name, &x, &y)?;
        Ok(Self { name, x, y })
    }

    pub fn shared(
        name: impl Into<String>,
        x: Vec<Real>,
        y: Vec<Real>,
    ) -> InterpResult<SharedTable> {
        Self::new(name, x, y).map(Arc::new)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn x(&self) -> &[Real] {
        &self.x
    }

    pub fn y(&self) -> &[Real] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Clamped linear lookup.
    pub fn eval(&self, x: Real) -> Real {
        eval_checked(&self.x, &self.y, x)
    }

    pub fn max_y(&self) -> Real {
        self.y.iter().copied().fold(Real::NEG_INFINITY, Real::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InterpError;

    #[test]
    fn thrust_curve_lookup() {
        let ct = Table::shared("thrust_coeff", vec![0.0, 2.0], vec![0.9, 0.7]).unwrap();
        assert!((ct.eval(1.0) - 0.8).abs() < 1e-14);
        assert_eq!(ct.eval(5.0), 0.7);
        assert_eq!(ct.len(), 2);
        assert_eq!(ct.name(), "thrust_coeff");
    }

    #[test]
    fn construction_validates() {
        let err = Table::new("chord", vec![0.0, 1.0], vec![2.0]).unwrap_err();
        assert!(err.to_string().contains("chord"));
        assert!(matches!(err, InterpError::LengthMismatch { .. }));
    }

    #[test]
    fn clones_of_shared_table_point_to_same_data() {
        let a = Table::shared("t", vec![0.0, 1.0], vec![0.0, 1.0]).unwrap();
        let b = Arc::clone(&a);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.max_y(), 1.0);
    }
}

use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

/// Fail with `NonFinite` for NaN or infinite inputs.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Maximum of a slice, `None` when empty.
pub fn max_of(values: &[Real]) -> Option<Real> {
    values.iter().copied().reduce(Real::max)
}

/// True when every element is strictly larger than its predecessor.
pub fn is_strictly_increasing(values: &[Real]) -> bool {
    values.windows(2).all(|w| w[1] > w[0])
}

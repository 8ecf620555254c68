//! Clamped linear interpolation.

use crate::error::{InterpError, InterpResult};
use af_core::Real;

/// Check that `xs`/`ys` form a usable table.
pub(crate) fn check_table(what: &str, xs: &[Real], ys: &[Real]) -> InterpResult<()> {
    if xs.is_empty() {
        return Err(InterpError::Empty {
            what: what.to_string(),
        });
    }
    if xs.len() != ys.len() {
        return Err(InterpError::LengthMismatch {
            what: what.to_string(),
            x_len: xs.len(),
            y_len: ys.len(),
        });
    }
    if let Some(index) = xs.windows(2).position(|w| w[1] <= w[0] || w[1].is_nan()) {
        return Err(InterpError::NotMonotonic {
            what: what.to_string(),
            index: index + 1,
        });
    }
    Ok(())
}

/// Interpolate within segment `j` (`xs[j] <= x < xs[j + 1]`).
#[inline]
fn segment(xs: &[Real], ys: &[Real], j: usize, x: Real) -> Real {
    let fac = (x - xs[j]) / (xs[j + 1] - xs[j]);
    ys[j] + fac * (ys[j + 1] - ys[j])
}

/// Table lookup for an already validated table.
pub(crate) fn eval_checked(xs: &[Real], ys: &[Real], x: Real) -> Real {
    if x.is_nan() {
        return Real::NAN;
    }
    let n = xs.len();
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }
    // First index with xs[idx] > x; x is strictly inside so 1 <= idx <= n-1
    let idx = xs.partition_point(|&xi| xi <= x);
    segment(xs, ys, idx - 1, x)
}

/// Linear interpolation of `ys(xs)` at `x`, clamped to the table endpoints.
pub fn linear(xs: &[Real], ys: &[Real], x: Real) -> InterpResult<Real> {
    check_table("linear", xs, ys)?;
    Ok(eval_checked(xs, ys, x))
}

/// Interpolate a whole sequence of query points in one forward pass.
///
/// `xs` must be strictly increasing. `xq` is expected to be non-decreasing
/// (e.g. normalized span positions); the search cursor only moves forward and
/// restarts from the beginning if a query steps backward. Results are written
/// into `yout`, which must have the same length as `xq`.
pub fn linear_monotonic(
    xs: &[Real],
    ys: &[Real],
    xq: &[Real],
    yout: &mut [Real],
) -> InterpResult<()> {
    check_table("linear_monotonic", xs, ys)?;
    if xq.len() != yout.len() {
        return Err(InterpError::OutputLength {
            query_len: xq.len(),
            out_len: yout.len(),
        });
    }

    let n = xs.len();
    let mut j = 0;
    for (&x, y) in xq.iter().zip(yout.iter_mut()) {
        if x <= xs[0] {
            *y = ys[0];
            continue;
        }
        if x >= xs[n - 1] {
            *y = ys[n - 1];
            continue;
        }
        if x < xs[j] {
            j = 0;
        }
        while x >= xs[j + 1] {
            j += 1;
        }
        *y = segment(xs, ys, j, x);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn midpoint_of_thrust_table() {
        let ct = linear(&[0.0, 2.0], &[0.9, 0.7], 1.0).unwrap();
        assert!((ct - 0.8).abs() < 1e-14);
    }

    #[test]
    fn clamps_outside_range() {
        let xs = [1.0, 2.0, 4.0];
        let ys = [10.0, 20.0, 0.0];
        assert_eq!(linear(&xs, &ys, -5.0).unwrap(), 10.0);
        assert_eq!(linear(&xs, &ys, 100.0).unwrap(), 0.0);
    }

    #[test]
    fn single_point_table_is_constant() {
        assert_eq!(linear(&[3.0], &[0.75], 10.0).unwrap(), 0.75);
        assert_eq!(linear(&[3.0], &[0.75], 0.0).unwrap(), 0.75);
    }

    #[test]
    fn nan_query_propagates() {
        assert!(linear(&[0.0, 2.0], &[0.9, 0.7], f64::NAN).unwrap().is_nan());
        let mut out = [0.0; 2];
        linear_monotonic(&[0.0, 1.0], &[2.0, 4.0], &[0.5, f64::NAN], &mut out).unwrap();
        assert_eq!(out[0], 3.0);
        assert!(out[1].is_nan());
    }

    #[test]
    fn rejects_bad_tables() {
        assert!(matches!(
            linear(&[], &[], 1.0),
            Err(InterpError::Empty { .. })
        ));
        assert!(matches!(
            linear(&[0.0, 1.0], &[1.0], 0.5),
            Err(InterpError::LengthMismatch { .. })
        ));
        assert!(matches!(
            linear(&[0.0, 1.0, 1.0], &[1.0, 2.0, 3.0], 0.5),
            Err(InterpError::NotMonotonic { index: 2, .. })
        ));
    }

    #[test]
    fn chord_along_span() {
        let span = [0.0, 1.0];
        let chord = [2.0, 4.0];
        let wx = [0.0, 0.5, 1.0];
        let mut out = [0.0; 3];
        linear_monotonic(&span, &chord, &wx, &mut out).unwrap();
        assert_eq!(out, [2.0, 3.0, 4.0]);
    }

    #[test]
    fn monotonic_output_length_checked() {
        let mut out = [0.0; 2];
        let err = linear_monotonic(&[0.0, 1.0], &[0.0, 1.0], &[0.1, 0.2, 0.3], &mut out)
            .unwrap_err();
        assert!(matches!(err, InterpError::OutputLength { .. }));
    }

    #[test]
    fn backward_query_restarts_cursor() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [0.0, 10.0, 20.0, 30.0];
        let mut out = [0.0; 3];
        linear_monotonic(&xs, &ys, &[2.5, 0.5, 1.5], &mut out).unwrap();
        assert_eq!(out, [25.0, 5.0, 15.0]);
    }

    fn table_strategy() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
        prop::collection::vec((0.01_f64..5.0, -10.0_f64..10.0), 2..12).prop_map(|pairs| {
            let mut x = 0.0;
            let mut xs = Vec::with_capacity(pairs.len());
            let mut ys = Vec::with_capacity(pairs.len());
            for (dx, y) in pairs {
                x += dx;
                xs.push(x);
                ys.push(y);
            }
            (xs, ys)
        })
    }

    proptest! {
        #[test]
        fn reproduces_table_values((xs, ys) in table_strategy()) {
            let mut out = vec![0.0; xs.len()];
            linear_monotonic(&xs, &ys, &xs, &mut out).unwrap();
            prop_assert_eq!(&out, &ys);
            for (x, y) in xs.iter().zip(&ys) {
                prop_assert_eq!(linear(&xs, &ys, *x).unwrap(), *y);
            }
        }

        #[test]
        fn repeated_interpolation_is_identical(
            (xs, ys) in table_strategy(),
            mut q in prop::collection::vec(-1.0_f64..70.0, 1..20),
        ) {
            q.sort_by(|a, b| a.total_cmp(b));
            let mut first = vec![0.0; q.len()];
            let mut second = vec![0.0; q.len()];
            linear_monotonic(&xs, &ys, &q, &mut first).unwrap();
            linear_monotonic(&xs, &ys, &q, &mut second).unwrap();
            prop_assert_eq!(&first, &second);
            for (x, y) in q.iter().zip(&first) {
                prop_assert_eq!(linear(&xs, &ys, *x).unwrap(), *y);
            }
        }
    }
}

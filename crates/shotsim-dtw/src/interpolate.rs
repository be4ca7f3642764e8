//! Gap filling for trajectories with missing samples.

use crate::error::InterpolateError;
use crate::series::Point2;

/// Fill missing samples of a scalar trajectory by linear interpolation.
///
/// Valid samples are used as knots. A gap between two knots is filled on the
/// straight line joining them; gaps before the first knot or after the last
/// take the nearest knot's value (no extrapolation). With a single knot every
/// gap takes that value. Non-finite values are treated as gaps.
///
/// An empty input yields an empty output, and an input without gaps is
/// returned unchanged, so the operation is idempotent.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`InterpolateError::NoValidSamples`] | Non-empty input where every sample is missing |
pub fn interpolate_missing(samples: &[Option<f64>]) -> Result<Vec<f64>, InterpolateError> {
    let len = samples.len();
    if len == 0 {
        return Ok(Vec::new());
    }

    let knots: Vec<(usize, f64)> = samples
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.filter(|v| v.is_finite()).map(|v| (i, v)))
        .collect();
    if knots.is_empty() {
        return Err(InterpolateError::NoValidSamples { len });
    }

    let mut filled = Vec::with_capacity(len);
    // Index of the first knot at or after the current position.
    let mut next = 0usize;
    for (i, sample) in samples.iter().enumerate() {
        if let Some(v) = sample.filter(|v| v.is_finite()) {
            filled.push(v);
            continue;
        }
        while next < knots.len() && knots[next].0 < i {
            next += 1;
        }
        let before = next.checked_sub(1).map(|p| knots[p]);
        let after = knots.get(next).copied();
        let value = match (before, after) {
            (Some((x0, y0)), Some((x1, y1))) => {
                let t = (i - x0) as f64 / (x1 - x0) as f64;
                y0 + (y1 - y0) * t
            }
            (Some((_, y0)), None) => y0,
            (None, Some((_, y1))) => y1,
            (None, None) => return Err(InterpolateError::NoValidSamples { len }),
        };
        filled.push(value);
    }

    Ok(filled)
}

/// Fill missing samples of a planar trajectory, one axis at a time.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`InterpolateError::AxisLengthMismatch`] | `xs` and `ys` differ in length |
/// | [`InterpolateError::NoValidSamples`] | Either axis is entirely missing |
pub fn interpolate_planar(
    xs: &[Option<f64>],
    ys: &[Option<f64>],
) -> Result<Vec<Point2>, InterpolateError> {
    if xs.len() != ys.len() {
        return Err(InterpolateError::AxisLengthMismatch {
            x_len: xs.len(),
            y_len: ys.len(),
        });
    }
    let xs = interpolate_missing(xs)?;
    let ys = interpolate_missing(ys)?;
    Ok(xs.into_iter().zip(ys).map(|(x, y)| Point2::new(x, y)).collect())
}

//! Quantile discretization of numeric rows into signed rank levels.
//!
//! Each row is discretized independently against its own empirical
//! distribution. The output is an integer matrix in which zero marks a cell
//! that is neither up- nor down-regulated, the sign marks the direction, and
//! the magnitude is the rank level (1 = most extreme).

use ndarray::Array2;

use crate::error::BiclusterError;
use crate::params::Params;

/// Linear-interpolation quantile of an ascending-sorted slice at `p`.
///
/// Interpolates between the two order statistics surrounding the continuous
/// position `p * (n - 1)`.
pub(crate) fn quantile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = p * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Discretize a numeric matrix into signed rank levels.
///
/// With `quantile >= 0.5` only up-regulation is scored: each cell gets the
/// smallest level `k` whose row quantile `1 - k/N` it reaches. Below `0.5`
/// the row is split around its median into an upper and a lower tail and
/// cells are assigned positive or negative levels against the respective
/// tail, zero elsewhere.
pub fn discretize(x: &Array2<f64>, params: &Params) -> Result<Array2<i32>, BiclusterError> {
    params.validate()?;
    let (rows, cols) = x.dim();
    if rows == 0 || cols == 0 {
        return Err(BiclusterError::EmptyInput);
    }
    let resolved = params.resolve(rows, cols)?;
    let levels = resolved.divided;

    let mut out = Array2::zeros((rows, cols));
    for (row_idx, row) in x.rows().into_iter().enumerate() {
        let mut sorted: Vec<f64> = row.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        if resolved.quantile >= 0.5 {
            for (col_idx, &value) in row.iter().enumerate() {
                for k in 1..=levels {
                    if value >= quantile(&sorted, 1.0 - k as f64 / levels as f64) {
                        out[[row_idx, col_idx]] = k as i32;
                        break;
                    }
                }
            }
        } else {
            let part_one = quantile(&sorted, 1.0 - resolved.quantile);
            let part_two = quantile(&sorted, resolved.quantile);
            let median = quantile(&sorted, 0.5);
            let (upper, lower) = if part_one - median >= median - part_two {
                (2.0 * median - part_two, part_two)
            } else {
                (part_one, 2.0 * median - part_one)
            };
            let upper_part: Vec<f64> = sorted.iter().copied().filter(|&v| v > upper).collect();
            let lower_part: Vec<f64> = sorted.iter().copied().filter(|&v| v < lower).collect();

            for (col_idx, &value) in row.iter().enumerate() {
                for k in 1..=levels {
                    if !lower_part.is_empty()
                        && value <= quantile(&lower_part, k as f64 / levels as f64)
                    {
                        out[[row_idx, col_idx]] = -(k as i32);
                        break;
                    }
                    if !upper_part.is_empty()
                        && value >= quantile(&upper_part, 1.0 - k as f64 / levels as f64)
                    {
                        out[[row_idx, col_idx]] = k as i32;
                        break;
                    }
                }
            }
        }
    }
    Ok(out)
}

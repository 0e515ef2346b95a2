//! Per-row rank encoding.
//!
//! `unisort` maps each row of a numeric matrix to the permutation of column
//! indices that sorts the row ascending. Rows are independent and ranked in
//! parallel; the argsort is stable so that equal values keep their column
//! order, which keeps downstream results reproducible.

use ndarray::{Array2, Axis, Zip};

use crate::error::BiclusterError;

/// Rank the rows of any partially ordered matrix.
pub(crate) fn rank_rows<T>(x: &Array2<T>) -> Result<Array2<usize>, BiclusterError>
where
    T: PartialOrd + Sync,
{
    let (rows, cols) = x.dim();
    if rows == 0 || cols == 0 {
        return Err(BiclusterError::EmptyInput);
    }
    let mut ranked = Array2::zeros((rows, cols));
    Zip::from(ranked.axis_iter_mut(Axis(0)))
        .and(x.axis_iter(Axis(0)))
        .par_for_each(|mut out, row| {
            let mut order: Vec<usize> = (0..cols).collect();
            order.sort_by(|&a, &b| {
                row[a]
                    .partial_cmp(&row[b])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            for (k, col) in order.into_iter().enumerate() {
                out[k] = col;
            }
        });
    Ok(ranked)
}

/// Column-index permutation sorting each row ascending.
///
/// `unisort(X)[i, k]` is the column holding the k-th smallest value of row
/// `i`.
pub fn unisort(x: &Array2<f64>) -> Result<Array2<usize>, BiclusterError> {
    rank_rows(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_unisort_example() {
        let x = array![[4.0, 3.0, 1.0, 2.0], [5.0, 8.0, 6.0, 7.0]];
        let ranked = unisort(&x).unwrap();
        assert_eq!(ranked.row(0).to_vec(), vec![2, 3, 1, 0]);
        assert_eq!(ranked.row(1).to_vec(), vec![0, 2, 3, 1]);
    }

    #[test]
    fn test_rows_are_permutations_in_ascending_value_order() {
        let x = array![
            [0.3, -1.2, 4.5, 0.0, 2.2],
            [9.9, 9.8, 9.7, 9.6, 9.5],
            [1.0, 1.0, 1.0, 1.0, 1.0],
        ];
        let ranked = unisort(&x).unwrap();
        for (i, perm) in ranked.rows().into_iter().enumerate() {
            let mut seen = perm.to_vec();
            seen.sort_unstable();
            assert_eq!(seen, (0..x.ncols()).collect::<Vec<_>>());
            for k in 1..perm.len() {
                assert!(x[[i, perm[k - 1]]] <= x[[i, perm[k]]]);
            }
        }
    }

    #[test]
    fn test_ties_keep_column_order() {
        let x = array![[1.0, 1.0, 0.5, 1.0]];
        let ranked = unisort(&x).unwrap();
        assert_eq!(ranked.row(0).to_vec(), vec![2, 0, 1, 3]);
    }

    #[test]
    fn test_empty_input_rejected() {
        let x = Array2::<f64>::zeros((3, 0));
        assert!(matches!(unisort(&x), Err(BiclusterError::EmptyInput)));
    }

    #[test]
    fn test_discrete_rows_rank_the_same_way() {
        let x = array![[4, 3, 1, 2]];
        let ranked = rank_rows(&x).unwrap();
        assert_eq!(ranked.row(0).to_vec(), vec![2, 3, 1, 0]);
    }
}

//! Longest-common-subsequence kernel.
//!
//! The engine compares rows through the LCS of their rank encodings: two
//! rows share a coherent ordering exactly where their column sequences share
//! a long common subsequence. This module provides the dense DP table
//! ([`pairwise_lcs`]), the backtracked subsequence ([`backtrack_lcs`]), a
//! length-only variant with rolling rows for the all-pairs hot loop
//! ([`lcs_length`]), and the tag set of one LCS ([`full_lcs_tags`]).
//!
//! Backtracking resolves ties by stepping up in the table (decrementing the
//! first-sequence index), which makes every derived sequence and tag set
//! deterministic for a given pair of inputs.

use std::collections::BTreeSet;

use ndarray::Array2;

/// Dense LCS dynamic-programming table between two sequences.
///
/// The table has shape `(|x|+1, |y|+1)` with a zero border row and column;
/// the full LCS length sits in the bottom-right corner `[|x|, |y|]`.
pub fn pairwise_lcs<T: PartialEq>(x: &[T], y: &[T]) -> Array2<usize> {
    let mut table = Array2::<usize>::zeros((x.len() + 1, y.len() + 1));
    for i in 1..=x.len() {
        for j in 1..=y.len() {
            table[[i, j]] = if x[i - 1] == y[j - 1] {
                table[[i - 1, j - 1]] + 1
            } else {
                table[[i, j - 1]].max(table[[i - 1, j]])
            };
        }
    }
    table
}

/// LCS length only, using two rolling rows instead of the full table.
pub fn lcs_length<T: PartialEq>(x: &[T], y: &[T]) -> usize {
    if x.is_empty() || y.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; y.len() + 1];
    let mut curr = vec![0usize; y.len() + 1];
    for i in 1..=x.len() {
        for j in 1..=y.len() {
            curr[j] = if x[i - 1] == y[j - 1] {
                prev[j - 1] + 1
            } else {
                curr[j - 1].max(prev[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[y.len()]
}

/// One longest common subsequence of `x` and `y`, as a sequence of values.
///
/// Backtracks from the corner of the DP table; where both neighbors tie the
/// walk steps up, so the returned subsequence is deterministic.
pub fn backtrack_lcs<T: PartialEq + Clone>(x: &[T], y: &[T]) -> Vec<T> {
    let table = pairwise_lcs(x, y);
    let mut lcs = vec![None; table[[x.len(), y.len()]]];
    let mut index = lcs.len();
    let mut i = x.len();
    let mut j = y.len();
    while i > 0 && j > 0 {
        if x[i - 1] == y[j - 1] {
            index -= 1;
            lcs[index] = Some(x[i - 1].clone());
            i -= 1;
            j -= 1;
        } else if table[[i - 1, j]] >= table[[i, j - 1]] {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    lcs.into_iter().flatten().collect()
}

/// Set of element values participating in one LCS of `x` and `y`.
///
/// Computed by backtracking a single LCS and collecting the values seen. In
/// the expansion engine the sequences hold column indices, so this is the
/// set of columns on which the two rows agree in ordering.
pub fn full_lcs_tags<T: PartialEq + Clone + Ord>(x: &[T], y: &[T]) -> BTreeSet<T> {
    backtrack_lcs(x, y).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_corner_holds_length() {
        let x = [1, 2, 3, 4, 5];
        let y = [1, 2, 4];
        let table = pairwise_lcs(&x, &y);
        assert_eq!(table.dim(), (6, 4));
        assert_eq!(table[[5, 3]], 3);
        assert_eq!(lcs_length(&x, &y), 3);
    }

    #[test]
    fn test_backtrack_returns_subsequence() {
        let x = [1, 2, 3, 4, 5];
        let y = [1, 2, 4];
        assert_eq!(backtrack_lcs(&x, &y), vec![1, 2, 4]);
    }

    #[test]
    fn test_length_is_symmetric() {
        let x = [3, 1, 4, 1, 5, 9, 2, 6];
        let y = [2, 7, 1, 8, 2, 8, 1];
        assert_eq!(lcs_length(&x, &y), lcs_length(&y, &x));
    }

    #[test]
    fn test_empty_and_disjoint() {
        let empty: [i32; 0] = [];
        assert_eq!(lcs_length(&empty, &[1, 2]), 0);
        assert_eq!(lcs_length(&[1, 2], &[3, 4]), 0);
        assert!(backtrack_lcs(&[1, 2], &[3, 4]).is_empty());
    }

    #[test]
    fn test_identical_sequences() {
        let x = [2, 3, 1, 0, 4, 6, 7, 5];
        assert_eq!(lcs_length(&x, &x), x.len());
        assert_eq!(backtrack_lcs(&x, &x), x.to_vec());
    }

    #[test]
    fn test_tags_collect_element_values() {
        let x = [0usize, 2, 4, 6, 8];
        let y = [2usize, 6, 8, 0];
        let tags = full_lcs_tags(&x, &y);
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec![2, 6, 8]);
    }

    #[test]
    fn test_subsequence_property() {
        fn is_subsequence(sub: &[i32], of: &[i32]) -> bool {
            let mut it = of.iter();
            sub.iter().all(|s| it.any(|v| v == s))
        }
        let x = [5, 1, 4, 2, 3, 6, 9];
        let y = [1, 2, 3, 9, 4, 5, 6];
        let lcs = backtrack_lcs(&x, &y);
        assert!(is_subsequence(&lcs, &x));
        assert!(is_subsequence(&lcs, &y));
        assert_eq!(lcs.len(), lcs_length(&x, &y));
    }
}

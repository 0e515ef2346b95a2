//! Seed generation: all-pairs LCS lengths with bounded top-K retention.
//!
//! Rows are split into `PART = 4` contiguous partitions and only pairs
//! inside a partition are enumerated, cutting the pair count from
//! `r(r-1)/2` to roughly `r^2 / (2 * PART)` at the cost of never seeding
//! across a partition boundary. Pair lengths within a partition are computed
//! in parallel; retention stays serial and single-owner.
//!
//! Two retention modes: a bounded min-heap that keeps only the best
//! `sch_block` triples, and a full sort that keeps every enumerated pair.
//! Both emit in descending length order under the same total ordering, so
//! heap mode returns a prefix of sort mode.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::BiclusterError;
use crate::lcs::lcs_length;
use crate::params::Params;

/// Number of contiguous row partitions pairs are enumerated within.
pub(crate) const PART: usize = 4;

/// Parallel-array record of seeds, sorted by `lcslen` descending.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedList {
    /// First row of each pair; always less than the matching `b`.
    pub a: Vec<usize>,
    /// Second row of each pair.
    pub b: Vec<usize>,
    /// LCS length of the pair.
    pub lcslen: Vec<usize>,
}

impl SeedList {
    pub fn len(&self) -> usize {
        self.lcslen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lcslen.is_empty()
    }

    fn push(&mut self, triple: SeedTriple) {
        self.a.push(triple.a);
        self.b.push(triple.b);
        self.lcslen.push(triple.len);
    }
}

/// One unordered row pair with its LCS length.
///
/// The ordering is total: length first, then smaller `a`, then smaller `b`
/// rank higher. A bounded min-heap over this ordering therefore evicts
/// deterministically and two runs retain identical seed sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SeedTriple {
    a: usize,
    b: usize,
    len: usize,
}

impl Ord for SeedTriple {
    fn cmp(&self, other: &Self) -> Ordering {
        self.len
            .cmp(&other.len)
            .then_with(|| other.a.cmp(&self.a))
            .then_with(|| other.b.cmp(&self.b))
    }
}

impl PartialOrd for SeedTriple {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Half-open row range of partition `p` when `rows` rows are split into
/// `PART` groups; the last partition absorbs the remainder.
pub(crate) fn partition_bounds(p: usize, rows: usize) -> (usize, usize) {
    let step = rows / PART;
    let start = p * step;
    let end = if p == PART - 1 { rows } else { (p + 1) * step };
    (start, end)
}

/// All within-partition row pairs of an integer matrix with their LCS
/// lengths, retained either through a bounded min-heap (`use_fib_heap`) or a
/// full sort, and emitted in descending length order.
pub fn calculate_lcs<T>(
    input: &Array2<T>,
    use_fib_heap: bool,
    params: &Params,
) -> Result<SeedList, BiclusterError>
where
    T: Clone + PartialEq + Sync,
{
    params.validate()?;
    let (rows, cols) = input.dim();
    if rows == 0 || cols == 0 {
        return Err(BiclusterError::EmptyInput);
    }
    let capacity = params.sch_block();

    let row_data: Vec<Vec<T>> = input.rows().into_iter().map(|r| r.to_vec()).collect();

    let mut heap: BinaryHeap<Reverse<SeedTriple>> = BinaryHeap::with_capacity(capacity + 1);
    let mut all: Vec<SeedTriple> = Vec::new();

    for p in 0..PART {
        let (start, end) = partition_bounds(p, rows);
        let pairs: Vec<(usize, usize)> = (start..end)
            .flat_map(|i| (i + 1..end).map(move |j| (i, j)))
            .collect();
        let triples: Vec<SeedTriple> = pairs
            .into_par_iter()
            .map(|(i, j)| SeedTriple {
                a: i,
                b: j,
                len: lcs_length(&row_data[i], &row_data[j]),
            })
            .collect();

        if use_fib_heap {
            for triple in triples {
                if heap.len() < capacity {
                    heap.push(Reverse(triple));
                } else if let Some(Reverse(min)) = heap.peek() {
                    if triple > *min {
                        heap.pop();
                        heap.push(Reverse(triple));
                    }
                }
            }
        } else {
            all.extend(triples);
        }
    }

    let mut seeds = SeedList::default();
    if use_fib_heap {
        let mut ascending = Vec::with_capacity(heap.len());
        while let Some(Reverse(triple)) = heap.pop() {
            ascending.push(triple);
        }
        for triple in ascending.into_iter().rev() {
            seeds.push(triple);
        }
    } else {
        all.sort_by(|x, y| y.cmp(x));
        for triple in all {
            seeds.push(triple);
        }
    }
    Ok(seeds)
}

//! Seed-driven bicluster expansion.
//!
//! Seeds are consumed in descending LCS-length order and each admitted seed
//! is grown into a candidate block in two phases. The forward phase extends
//! the seed pair greedily with rows whose regulated rank sequence shares a
//! long common subsequence with the seed reference, then seeds a column set
//! from per-column tag statistics and recruits further rows that agree on
//! enough of those columns. The reverse phase repeats the recruitment with
//! each remaining row's sequence reversed, which picks up negatively
//! correlated rows. Candidate blocks below the 5x4 minimum are dropped;
//! survivors go through the overlap post-filter.
//!
//! All LCS work here runs over *regulated rank sequences*: the columns of a
//! row in ascending-value order, keeping only columns whose discrete level
//! is nonzero. Elements are column indices, so the tag set of an LCS is
//! directly a set of columns. Per-row lengths, tag sets and reverse tag
//! sets are computed in parallel from read-only inputs; every loop that
//! mutates `genes`, `col_stat` or the candidate flags stays serial and
//! visits rows in ascending index order, so the output is deterministic.

use std::collections::BTreeSet;

use log::debug;
use ndarray::Array2;
use rayon::prelude::*;
use statrs::distribution::{DiscreteCDF, Poisson};

use crate::block::{BicBlock, BiclusterResult};
use crate::error::BiclusterError;
use crate::lcs::{backtrack_lcs, full_lcs_tags, lcs_length};
use crate::params::{Params, ResolvedParams};
use crate::postprocess::sort_and_filter;
use crate::seed::SeedList;

/// Rows beyond which seed admission only consults the used-rows set.
const USED_ROWS_FAST_PATH: usize = 250;

/// Grow biclusters from a sorted seed list.
///
/// `ranked` is the per-row column permutation from ranking, `discrete` the
/// signed rank-level matrix, `seeds` the `(a, b, lcslen)` record sorted by
/// length descending. `row_number` and `col_number` must agree with both
/// matrices.
pub fn cluster(
    ranked: &Array2<usize>,
    discrete: &Array2<i32>,
    seeds: &SeedList,
    row_number: usize,
    col_number: usize,
    params: &Params,
) -> Result<BiclusterResult, BiclusterError> {
    params.validate()?;
    if row_number == 0 || col_number == 0 {
        return Err(BiclusterError::EmptyInput);
    }
    if ranked.dim() != (row_number, col_number) {
        return Err(BiclusterError::DimensionMismatch(format!(
            "rank matrix is {:?}, expected ({}, {})",
            ranked.dim(),
            row_number,
            col_number
        )));
    }
    if discrete.dim() != (row_number, col_number) {
        return Err(BiclusterError::DimensionMismatch(format!(
            "discrete matrix is {:?}, expected ({}, {})",
            discrete.dim(),
            row_number,
            col_number
        )));
    }
    if seeds.a.len() != seeds.lcslen.len() || seeds.b.len() != seeds.lcslen.len() {
        return Err(BiclusterError::DimensionMismatch(format!(
            "seed arrays of unequal length: {} / {} / {}",
            seeds.a.len(),
            seeds.b.len(),
            seeds.lcslen.len()
        )));
    }
    if seeds.a.iter().chain(seeds.b.iter()).any(|&g| g >= row_number) {
        return Err(BiclusterError::DimensionMismatch(
            "seed row index out of range".into(),
        ));
    }
    if ranked.iter().any(|&c| c >= col_number) {
        return Err(BiclusterError::DimensionMismatch(
            "rank matrix entry out of range".into(),
        ));
    }
    let resolved = params.resolve(row_number, col_number)?;

    let sequences = regulated_sequences(ranked, discrete);
    let expander = Expander {
        discrete,
        sequences: &sequences,
        rows: row_number,
        cols: col_number,
        resolved: &resolved,
    };

    let mut used_rows = vec![false; row_number];
    let mut candidate_blocks: Vec<BicBlock> = Vec::with_capacity(resolved.sch_block);
    let mut skipped_seeds = 0usize;
    let mut undersized = 0usize;

    for ind in 0..seeds.len() {
        let (seed_a, seed_b) = (seeds.a[ind], seeds.b[ind]);
        let admissible = if row_number > USED_ROWS_FAST_PATH {
            !(used_rows[seed_a] && used_rows[seed_b])
        } else {
            check_seed(seed_a, seed_b, &candidate_blocks, resolved.col_width)
        };
        if !admissible {
            skipped_seeds += 1;
            continue;
        }
        match expander.expand_seed(seed_a, seed_b, seeds.lcslen[ind]) {
            Some(block) => {
                for &gene in &block.genes[..block.block_rows_pre] {
                    used_rows[gene] = true;
                }
                candidate_blocks.push(block);
                if candidate_blocks.len() == resolved.sch_block {
                    break;
                }
            }
            None => undersized += 1,
        }
    }
    debug!(
        "expansion: {} candidate blocks, {} seeds skipped, {} blocks below minimum size",
        candidate_blocks.len(),
        skipped_seeds,
        undersized
    );

    let output = sort_and_filter(candidate_blocks, resolved.filter, resolved.rpt_block);
    Ok(BiclusterResult::from_blocks(output, row_number, col_number))
}

/// Column indices of each row in ascending-value order, restricted to
/// columns with a nonzero discrete level.
fn regulated_sequences(ranked: &Array2<usize>, discrete: &Array2<i32>) -> Vec<Vec<usize>> {
    (0..ranked.nrows())
        .into_par_iter()
        .map(|i| {
            ranked
                .row(i)
                .iter()
                .copied()
                .filter(|&c| discrete[[i, c]] != 0)
                .collect()
        })
        .collect()
}

/// Seed admission for small inputs: reject a pair whose rows already
/// co-occur in one candidate block, or whose total row overlap with the
/// candidate blocks found so far reaches `col_width - 1`.
fn check_seed(seed_a: usize, seed_b: usize, blocks: &[BicBlock], col_width: usize) -> bool {
    let mut overlap = 0usize;
    for block in blocks {
        let has_a = block.genes.contains(&seed_a);
        let has_b = block.genes.contains(&seed_b);
        if has_a && has_b {
            return false;
        }
        overlap += usize::from(has_a) + usize::from(has_b);
    }
    overlap < col_width - 1
}

/// Upper tail `P(X >= count)` of a Poisson with the given mean.
fn poisson_upper_tail(mean: f64, count: usize) -> f64 {
    if !(mean > 0.0) || count == 0 {
        return 1.0;
    }
    match Poisson::new(mean) {
        Ok(dist) => (1.0 - dist.cdf((count - 1) as u64)).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}

/// Shared read-only state for expanding the seeds of one run.
struct Expander<'a> {
    discrete: &'a Array2<i32>,
    sequences: &'a [Vec<usize>],
    rows: usize,
    cols: usize,
    resolved: &'a ResolvedParams,
}

impl Expander<'_> {
    fn expand_seed(&self, seed_a: usize, seed_b: usize, seed_len: usize) -> Option<BicBlock> {
        let tolerance = self.resolved.tolerance;
        let reference = backtrack_lcs(&self.sequences[seed_a], &self.sequences[seed_b]);

        // per-row LCS length against the seed reference and column tag set
        // against the first seed row; read-only, computed in parallel
        let (lengths, tags): (Vec<usize>, Vec<BTreeSet<usize>>) = (0..self.rows)
            .into_par_iter()
            .map(|k| {
                (
                    lcs_length(&reference, &self.sequences[k]),
                    full_lcs_tags(&self.sequences[seed_a], &self.sequences[k]),
                )
            })
            .unzip();

        let cand_threshold = ((self.resolved.col_width as f64 * tolerance).floor() as usize).max(2);
        let mut candidates = vec![true; self.rows];
        candidates[seed_a] = false;
        candidates[seed_b] = false;
        let mut genes = vec![seed_a, seed_b];
        let mut best = seed_len.min(2);
        let mut trace: Vec<usize> = vec![1, best];
        let mut pvalues: Vec<f64> = vec![1.0, 1.0];
        let mut block_pvalue = 1.0f64;

        // greedy growth against the fixed reference; ascending row order
        // breaks length ties
        loop {
            let mut max_len = 0usize;
            let mut max_row = None;
            let mut len_sum = 0usize;
            let mut len_count = 0usize;
            for k in 0..self.rows {
                if !candidates[k] {
                    continue;
                }
                let len = lengths[k];
                if len < cand_threshold {
                    candidates[k] = false;
                    continue;
                }
                len_sum += len;
                len_count += 1;
                if len > max_len {
                    max_len = len;
                    max_row = Some(k);
                }
            }
            let Some(chosen) = max_row else { break };
            if self.resolved.pvalue_scoring {
                let mean = len_sum as f64 / len_count as f64;
                let pvalue = poisson_upper_tail(mean, max_len);
                if pvalue < block_pvalue {
                    block_pvalue = pvalue;
                }
            }
            genes.push(chosen);
            trace.push(max_len);
            pvalues.push(block_pvalue);
            if max_len > best {
                best = max_len;
            }
            candidates[chosen] = false;
        }

        // track back to the prefix that reached the best score; a missing
        // successor counts as different, ending the scan at the last entry
        let mut cut = 0usize;
        while cut < genes.len() {
            if self.resolved.pvalue_scoring
                && cut >= 2
                && pvalues[cut] == block_pvalue
                && trace.get(cut + 1).map_or(true, |&next| next != trace[cut])
            {
                break;
            }
            if trace[cut] == best && trace.get(cut + 1).map_or(true, |&next| next != best) {
                break;
            }
            cut += 1;
        }
        let mut components = (cut + 1).min(genes.len());
        genes.truncate(components);

        for flag in candidates.iter_mut() {
            *flag = true;
        }
        for &gene in &genes {
            candidates[gene] = false;
        }

        // seed the column set from how often each column is tagged across
        // the retained rows
        let col_threshold = (((components as f64) * 0.7).floor() as i64 - 1).max(1) as usize;
        let mut col_stat = vec![0usize; self.cols];
        for &gene in &genes[1..] {
            for &col in &tags[gene] {
                col_stat[col] += 1;
            }
        }
        let colcand: BTreeSet<usize> = (0..self.cols)
            .filter(|&j| col_stat[j] >= col_threshold)
            .collect();
        let cand_cols = colcand.len();
        let m_threshold = (cand_cols as f64 * tolerance).floor() as i64 - 1;

        // forward growth
        for k in 0..self.rows {
            if !candidates[k] {
                continue;
            }
            let m_ct = colcand.intersection(&tags[k]).count() as i64;
            if m_ct < m_threshold {
                continue;
            }
            if columns_stay_supported(&colcand, &col_stat, &tags[k], components) {
                genes.push(k);
                components += 1;
                candidates[k] = false;
                for &t in &tags[k] {
                    if colcand.contains(&t) {
                        col_stat[t] += 1;
                    }
                }
            }
        }
        let block_rows_pre = components;

        // reverse growth: rows whose reversed sequence matches recruit the
        // negatively correlated side of the pattern
        let gene_first = genes[0];
        let tags_second = &tags[genes[1]];
        let g1: Vec<usize> = self.sequences[gene_first]
            .iter()
            .copied()
            .filter(|c| tags_second.contains(c))
            .collect();
        let support_threshold = (cand_cols as f64 * tolerance).floor() as i64;
        let reverse_info: Vec<Option<(i64, BTreeSet<usize>)>> = (0..self.rows)
            .into_par_iter()
            .map(|k| {
                if !candidates[k] {
                    return None;
                }
                let shared = (0..self.cols)
                    .filter(|&i| self.discrete[[gene_first, i]] * self.discrete[[k, i]] != 0)
                    .count() as i64;
                if shared < support_threshold {
                    return Some((shared, BTreeSet::new()));
                }
                let mut g2: Vec<usize> = self.sequences[k]
                    .iter()
                    .copied()
                    .filter(|c| tags_second.contains(c))
                    .collect();
                g2.reverse();
                Some((shared, full_lcs_tags(&g1, &g2)))
            })
            .collect();

        for k in 0..self.rows {
            if !candidates[k] {
                continue;
            }
            let Some((shared, reverse_tags)) = &reverse_info[k] else {
                continue;
            };
            if *shared < support_threshold {
                candidates[k] = false;
                continue;
            }
            let m_ct = colcand.intersection(reverse_tags).count() as i64;
            if m_ct < m_threshold {
                continue;
            }
            if columns_stay_supported(&colcand, &col_stat, reverse_tags, components) {
                genes.push(k);
                components += 1;
                candidates[k] = false;
                for &t in reverse_tags {
                    if colcand.contains(&t) {
                        col_stat[t] += 1;
                    }
                }
            }
        }

        let conds: Vec<usize> = colcand.into_iter().collect();
        let block_cols = conds.len();
        if block_cols < 4 || components < 5 {
            return None;
        }
        let block_rows = components;
        let score = if self.resolved.pvalue_scoring {
            -100.0 * block_pvalue.max(f64::MIN_POSITIVE).ln()
        } else {
            (block_rows * block_cols) as f64
        };
        Some(BicBlock {
            genes,
            conds,
            score,
            pvalue: block_pvalue,
            block_rows,
            block_cols,
            block_rows_pre,
        })
    }
}

/// Every candidate column must keep enough row support after adding the
/// row's tags; the floor loosens to nothing while the block is small.
fn columns_stay_supported(
    colcand: &BTreeSet<usize>,
    col_stat: &[usize],
    row_tags: &BTreeSet<usize>,
    components: usize,
) -> bool {
    let needed = ((components as f64) * 0.1).floor() as i64 - 1;
    colcand.iter().all(|&t| {
        let mut count = col_stat[t] as i64;
        if row_tags.contains(&t) {
            count += 1;
        }
        count >= needed
    })
}

//! Candidate ranking and overlap filtering.

use log::debug;

use crate::block::BicBlock;

/// Sort candidates by score descending (stable, so equal scores keep their
/// discovery order) and emit up to `rpt_block` of them, rejecting any block
/// whose row/column intersection with an already-emitted block exceeds
/// `filter` times its own area.
pub(crate) fn sort_and_filter(
    mut candidates: Vec<BicBlock>,
    filter: f64,
    rpt_block: usize,
) -> Vec<BicBlock> {
    candidates.sort_by(|x, y| {
        y.score
            .partial_cmp(&x.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let wanted = candidates.len().min(rpt_block);
    let mut output: Vec<BicBlock> = Vec::with_capacity(wanted);
    let mut rejected = 0usize;
    for candidate in candidates {
        if output.len() == wanted {
            break;
        }
        let area = (candidate.block_rows * candidate.block_cols) as f64;
        let overlaps = output.iter().any(|emitted| {
            let inter_rows = emitted
                .genes
                .iter()
                .filter(|&g| candidate.genes.contains(g))
                .count();
            let inter_cols = emitted
                .conds
                .iter()
                .filter(|&c| candidate.conds.contains(c))
                .count();
            (inter_rows * inter_cols) as f64 > filter * area
        });
        if overlaps {
            rejected += 1;
        } else {
            output.push(candidate);
        }
    }
    if rejected > 0 {
        debug!("overlap filter rejected {} candidate blocks", rejected);
    }
    output
}

//! Bicluster block values and output assembly.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// One bicluster candidate: a row set, an ascending column set, and its
/// score.
///
/// The first two entries of `genes` are always the seed pair.
/// `block_rows_pre` remembers how many rows the block had after forward
/// growth, before negatively correlated rows were recruited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BicBlock {
    pub genes: Vec<usize>,
    pub conds: Vec<usize>,
    pub score: f64,
    pub pvalue: f64,
    pub block_rows: usize,
    pub block_cols: usize,
    pub block_rows_pre: usize,
}

/// Final engine output: block membership as two boolean matrices.
#[derive(Debug, Clone)]
pub struct BiclusterResult {
    /// `rows x number`: `[g, i]` is true iff row `g` belongs to block `i`.
    pub row_by_block: Array2<bool>,
    /// `number x cols`: `[i, j]` is true iff column `j` belongs to block `i`.
    pub block_by_col: Array2<bool>,
    /// Number of emitted blocks.
    pub number: usize,
    /// The emitted blocks themselves, highest score first.
    pub blocks: Vec<BicBlock>,
}

impl BiclusterResult {
    pub(crate) fn from_blocks(blocks: Vec<BicBlock>, rows: usize, cols: usize) -> Self {
        let number = blocks.len();
        let mut row_by_block = Array2::from_elem((rows, number), false);
        let mut block_by_col = Array2::from_elem((number, cols), false);
        for (i, block) in blocks.iter().enumerate() {
            for &gene in &block.genes {
                row_by_block[[gene, i]] = true;
            }
            for &cond in &block.conds {
                block_by_col[[i, cond]] = true;
            }
        }
        Self {
            row_by_block,
            block_by_col,
            number,
            blocks,
        }
    }

    /// Short human-readable account of the result.
    pub fn summary(&self) -> String {
        let mut summary = format!("Found {} biclusters", self.number);
        for (i, block) in self.blocks.iter().take(5).enumerate() {
            summary.push_str(&format!(
                "\n  #{}: {}x{}, score: {:.1}",
                i + 1,
                block.block_rows,
                block.block_cols,
                block.score
            ));
        }
        if self.number > 5 {
            summary.push_str(&format!("\n  ... and {} more", self.number - 5));
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(genes: Vec<usize>, conds: Vec<usize>) -> BicBlock {
        let block_rows = genes.len();
        let block_cols = conds.len();
        BicBlock {
            genes,
            conds,
            score: (block_rows * block_cols) as f64,
            pvalue: 1.0,
            block_rows,
            block_cols,
            block_rows_pre: block_rows,
        }
    }

    #[test]
    fn test_membership_matrices() {
        let blocks = vec![block(vec![0, 2], vec![1, 3]), block(vec![1], vec![0])];
        let result = BiclusterResult::from_blocks(blocks, 4, 4);
        assert_eq!(result.number, 2);
        assert_eq!(result.row_by_block.dim(), (4, 2));
        assert_eq!(result.block_by_col.dim(), (2, 4));
        assert!(result.row_by_block[[0, 0]]);
        assert!(result.row_by_block[[2, 0]]);
        assert!(!result.row_by_block[[1, 0]]);
        assert!(result.row_by_block[[1, 1]]);
        assert!(result.block_by_col[[0, 1]]);
        assert!(result.block_by_col[[0, 3]]);
        assert!(result.block_by_col[[1, 0]]);
        assert!(!result.block_by_col[[1, 2]]);
    }

    #[test]
    fn test_empty_result() {
        let result = BiclusterResult::from_blocks(Vec::new(), 3, 5);
        assert_eq!(result.number, 0);
        assert_eq!(result.row_by_block.dim(), (3, 0));
        assert_eq!(result.block_by_col.dim(), (0, 5));
        assert!(result.summary().contains("0 biclusters"));
    }
}

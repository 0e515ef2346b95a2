//! Run parameters.
//!
//! A [`Params`] value is constructed once per run and threaded through every
//! stage; there is no process-wide mutable parameter state. Limits that
//! depend on the matrix shape (`col_width`, the effective number of rank
//! levels) are resolved against the dimensions when a stage first sees the
//! data.

use serde::{Deserialize, Serialize};

use crate::error::BiclusterError;

/// User-settable tunables for a biclustering run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Required consistency fraction within a block, in `(0.5, 1.0]`.
    pub tolerance: f64,
    /// Quantile controlling the discretization regime, in `[0, 1]`.
    /// `>= 0.5` selects the one-sided up-regulation regime.
    pub quantile: f64,
    /// Overlap rejection fraction for post-processing, in `[0, 1]`.
    /// `1.0` disables overlap filtering.
    pub filter: f64,
    /// Maximum number of biclusters returned.
    pub rpt_block: usize,
    /// Number of discrete rank levels; `0` means "use the column count".
    pub divided: usize,
    /// Score blocks by `-100 * ln(pvalue)` instead of `rows * cols`.
    pub pvalue_scoring: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            tolerance: 0.85,
            quantile: 0.5,
            filter: 1.0,
            rpt_block: 100,
            divided: 0,
            pvalue_scoring: false,
        }
    }
}

impl Params {
    /// Create a validated parameter set.
    ///
    /// The argument order mirrors the classic parameter call:
    /// consistency level, discretization quantile, overlap filter,
    /// maximum reported biclusters, number of rank levels.
    pub fn new(
        tolerance: f64,
        quantile: f64,
        filter: f64,
        rpt_block: usize,
        divided: usize,
    ) -> Result<Self, BiclusterError> {
        let params = Self {
            tolerance,
            quantile,
            filter,
            rpt_block,
            divided,
            pvalue_scoring: false,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check every tunable against its admissible range.
    pub fn validate(&self) -> Result<(), BiclusterError> {
        if !(self.tolerance > 0.5 && self.tolerance <= 1.0) {
            return Err(BiclusterError::InvalidParameter(format!(
                "tolerance {} not in (0.5, 1.0]",
                self.tolerance
            )));
        }
        if !(0.0..=1.0).contains(&self.quantile) {
            return Err(BiclusterError::InvalidParameter(format!(
                "quantile {} not in [0, 1]",
                self.quantile
            )));
        }
        if !(0.0..=1.0).contains(&self.filter) {
            return Err(BiclusterError::InvalidParameter(format!(
                "filter {} not in [0, 1]",
                self.filter
            )));
        }
        if self.rpt_block == 0 {
            return Err(BiclusterError::InvalidParameter(
                "rpt_block must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Upper bound on candidate blocks searched before post-processing.
    pub fn sch_block(&self) -> usize {
        2 * self.rpt_block
    }

    /// Resolve the shape-dependent limits for a concrete matrix.
    pub(crate) fn resolve(
        &self,
        _rows: usize,
        cols: usize,
    ) -> Result<ResolvedParams, BiclusterError> {
        let divided = if self.divided == 0 { cols } else { self.divided };
        if divided == 0 {
            return Err(BiclusterError::ZeroDivide);
        }
        Ok(ResolvedParams {
            tolerance: self.tolerance,
            quantile: self.quantile,
            filter: self.filter,
            rpt_block: self.rpt_block,
            sch_block: self.sch_block(),
            divided,
            col_width: (cols / 20).max(2),
            pvalue_scoring: self.pvalue_scoring,
        })
    }
}

/// Parameters with the shape-derived limits filled in, valid for one run.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedParams {
    pub tolerance: f64,
    pub quantile: f64,
    pub filter: f64,
    pub rpt_block: usize,
    pub sch_block: usize,
    pub divided: usize,
    pub col_width: usize,
    pub pvalue_scoring: bool,
}

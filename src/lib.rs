//! Rank-based biclustering of numeric matrices.
//!
//! Given a real-valued matrix whose rows are objects (genes) and columns
//! are conditions, the engine finds submatrices in which the selected rows
//! follow a coherent ordering across the selected columns. Coherence is
//! measured through the longest common subsequence between per-row rank
//! encodings, so the result is robust to monotone distortions of the raw
//! values.
//!
//! The engine runs in four stages: quantile discretization into signed rank
//! levels ([`discretize`]), per-row rank encoding ([`unisort`]), all-pairs
//! LCS with top-K seed retention ([`calculate_lcs`]), and seed-driven
//! expansion with overlap filtering ([`cluster`]). The stages can be called
//! individually or chained through [`BiclusterPipeline`]:
//!
//! ```no_run
//! use fast_bicluster::{BiclusterPipeline, Params};
//! use ndarray::Array2;
//!
//! # fn main() -> Result<(), fast_bicluster::BiclusterError> {
//! let matrix = Array2::from_shape_fn((60, 20), |(i, j)| (i * j) as f64);
//! let pipeline = BiclusterPipeline::builder()
//!     .with_params(Params::new(0.85, 0.0, 1.0, 50, 0)?)
//!     .build()?;
//! let run = pipeline.run(&matrix)?;
//! println!("{}", run.result.summary());
//! # Ok(())
//! # }
//! ```

pub mod block;
pub mod discretize;
pub mod error;
pub mod expand;
pub mod lcs;
pub mod params;
pub mod pipeline;
mod postprocess;
pub mod rank;
pub mod seed;

pub use block::{BicBlock, BiclusterResult};
pub use discretize::discretize;
pub use error::BiclusterError;
pub use expand::cluster;
pub use lcs::{backtrack_lcs, full_lcs_tags, lcs_length, pairwise_lcs};
pub use params::Params;
pub use pipeline::{BiclusterPipeline, PipelineBuilder, PipelineConfig, PipelineStats, RunResult};
pub use rank::unisort;
pub use seed::{calculate_lcs, SeedList};

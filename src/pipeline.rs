//! End-to-end biclustering pipeline.
//!
//! Chains the four engine stages — discretization, rank encoding, seed
//! generation, expansion — over one numeric matrix, with per-phase timing
//! and logging. Built through [`BiclusterPipeline::builder`].

use std::time::{Duration, Instant};

use log::{debug, info};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::block::BiclusterResult;
use crate::discretize::discretize;
use crate::error::BiclusterError;
use crate::expand::cluster;
use crate::params::Params;
use crate::rank::{rank_rows, unisort};
use crate::seed::calculate_lcs;

/// Pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Engine tunables.
    pub params: Params,
    /// Retain seeds through the bounded min-heap instead of a full sort.
    pub use_fib_heap: bool,
    /// Collect per-phase statistics.
    pub collect_stats: bool,
    /// Worker threads for the data-parallel regions; `None` uses the
    /// global rayon pool.
    pub num_threads: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            params: Params::default(),
            use_fib_heap: true,
            collect_stats: true,
            num_threads: Some(num_cpus::get()),
        }
    }
}

/// Per-phase timings and counters of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStats {
    pub total_duration: Duration,
    pub discretize_duration: Duration,
    pub ranking_duration: Duration,
    pub seeding_duration: Duration,
    pub expansion_duration: Duration,
    pub seed_count: usize,
    pub block_count: usize,
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub result: BiclusterResult,
    pub stats: Option<PipelineStats>,
}

/// Four-stage biclustering pipeline over a numeric matrix.
pub struct BiclusterPipeline {
    config: PipelineConfig,
}

impl BiclusterPipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn with_config(config: PipelineConfig) -> Result<Self, BiclusterError> {
        config.params.validate()?;
        Ok(Self { config })
    }

    /// Run the full pipeline on a numeric matrix.
    pub fn run(&self, matrix: &Array2<f64>) -> Result<RunResult, BiclusterError> {
        self.install(|| self.execute(matrix))
    }

    /// Run on an already-discretized matrix, skipping the quantile
    /// discretizer: the input doubles as the discrete matrix and is ranked
    /// directly.
    pub fn run_discrete(&self, matrix: &Array2<i32>) -> Result<RunResult, BiclusterError> {
        self.install(|| {
            let start = Instant::now();
            let ranked = rank_rows(matrix)?;
            let ranking_duration = start.elapsed();
            self.execute_from(
                matrix.clone(),
                ranked,
                Duration::default(),
                ranking_duration,
                start,
            )
        })
    }

    fn install<T>(
        &self,
        body: impl FnOnce() -> Result<T, BiclusterError> + Send,
    ) -> Result<T, BiclusterError>
    where
        T: Send,
    {
        match self.config.num_threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| {
                        BiclusterError::InvalidParameter(format!("thread pool: {}", e))
                    })?;
                pool.install(body)
            }
            None => body(),
        }
    }

    fn execute(&self, matrix: &Array2<f64>) -> Result<RunResult, BiclusterError> {
        let start = Instant::now();
        let (rows, cols) = matrix.dim();
        info!("starting bicluster pipeline on a {}x{} matrix", rows, cols);

        let phase = Instant::now();
        let discrete = discretize(matrix, &self.config.params)?;
        let discretize_duration = phase.elapsed();
        debug!("discretization done in {:?}", discretize_duration);

        let phase = Instant::now();
        let ranked = unisort(matrix)?;
        let ranking_duration = phase.elapsed();
        debug!("rank encoding done in {:?}", ranking_duration);

        self.execute_from(discrete, ranked, discretize_duration, ranking_duration, start)
    }

    fn execute_from(
        &self,
        discrete: Array2<i32>,
        ranked: Array2<usize>,
        discretize_duration: Duration,
        ranking_duration: Duration,
        start: Instant,
    ) -> Result<RunResult, BiclusterError> {
        let (rows, cols) = ranked.dim();

        let phase = Instant::now();
        let seeds = calculate_lcs(&ranked, self.config.use_fib_heap, &self.config.params)?;
        let seeding_duration = phase.elapsed();
        info!(
            "seed generation retained {} seeds in {:?}",
            seeds.len(),
            seeding_duration
        );

        let phase = Instant::now();
        let result = cluster(&ranked, &discrete, &seeds, rows, cols, &self.config.params)?;
        let expansion_duration = phase.elapsed();

        let total_duration = start.elapsed();
        info!(
            "pipeline finished in {:?}: {} biclusters",
            total_duration, result.number
        );

        let stats = if self.config.collect_stats {
            Some(PipelineStats {
                total_duration,
                discretize_duration,
                ranking_duration,
                seeding_duration,
                expansion_duration,
                seed_count: seeds.len(),
                block_count: result.number,
            })
        } else {
            None
        };
        Ok(RunResult { result, stats })
    }
}

/// Builder for [`BiclusterPipeline`].
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.config.params = params;
        self
    }

    pub fn use_fib_heap(mut self, use_fib_heap: bool) -> Self {
        self.config.use_fib_heap = use_fib_heap;
        self
    }

    pub fn collect_stats(mut self, collect_stats: bool) -> Self {
        self.config.collect_stats = collect_stats;
        self
    }

    pub fn num_threads(mut self, num_threads: Option<usize>) -> Self {
        self.config.num_threads = num_threads;
        self
    }

    pub fn build(self) -> Result<BiclusterPipeline, BiclusterError> {
        BiclusterPipeline::with_config(self.config)
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

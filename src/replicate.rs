//! Independent replications with Student-t confidence intervals.

use rayon::prelude::*;
use tracing::debug;

use crate::error::SimError;
use crate::stats;
use crate::system::{QueueSystem, SimOpts};

/// Options for a replication fan-out.
#[derive(Clone, Debug)]
pub struct ReplicateOpts {
    /// Independent runs; at least 2.
    pub n_replications: usize,
    /// System departures per run.
    pub num_events: u64,
    /// Base seed; each run's seed is derived from it with SplitMix64.
    pub seed: u64,
    pub warmup: u64,
    /// Confidence level in (0, 1).
    pub confidence: f64,
    /// Worker threads for the fan-out; `None` uses the rayon default.
    pub n_threads: Option<usize>,
}

impl Default for ReplicateOpts {
    fn default() -> ReplicateOpts {
        ReplicateOpts {
            n_replications: 30,
            num_events: 1_000_000,
            seed: 0,
            warmup: 0,
            confidence: 0.95,
            n_threads: None,
        }
    }
}

/// Aggregated output of multiple independent simulation replications.
#[derive(Clone, Debug)]
pub struct ReplicationResult {
    pub mean_n: f64,
    pub mean_t: f64,
    pub ci_half_n: f64,
    pub ci_half_t: f64,
    pub confidence_level: f64,
    pub n_replications: usize,
    /// Per-replication `mean_N`, ordered by replication index.
    pub raw_n: Vec<f64>,
    /// Per-replication `mean_T`, ordered by replication index.
    pub raw_t: Vec<f64>,
}

impl ReplicationResult {
    /// Confidence interval for E[N] as `(lower, upper)`.
    pub fn ci_n(&self) -> (f64, f64) {
        (self.mean_n - self.ci_half_n, self.mean_n + self.ci_half_n)
    }

    /// Confidence interval for E[T] as `(lower, upper)`.
    pub fn ci_t(&self) -> (f64, f64) {
        (self.mean_t - self.ci_half_t, self.mean_t + self.ci_half_t)
    }
}

impl QueueSystem {
    /// Run independent replications and aggregate the results.
    ///
    /// Each replication receives its own SplitMix64-derived seed and its
    /// own fresh copy of the topology, and the raw vectors are ordered
    /// by replication index, so the output is identical for every thread
    /// count. Aggregation happens on the calling thread once all workers
    /// have finished.
    pub fn replicate(&self, opts: &ReplicateOpts) -> Result<ReplicationResult, SimError> {
        if opts.n_replications < 2 {
            return Err(SimError::Config(format!(
                "n_replications must be >= 2, got {}",
                opts.n_replications
            )));
        }
        if !(0.0 < opts.confidence && opts.confidence < 1.0) {
            return Err(SimError::Config(format!(
                "confidence must be in (0, 1), got {}",
                opts.confidence
            )));
        }
        debug!(
            n_replications = opts.n_replications,
            num_events = opts.num_events,
            seed = opts.seed,
            threads = ?opts.n_threads,
            "replication fan-out started"
        );

        let run_one = |i: usize| -> (f64, f64) {
            let mut system = self.fresh();
            system.sim_with(&SimOpts {
                num_events: opts.num_events,
                seed: stats::derive_seed(opts.seed, i as u64),
                warmup: opts.warmup,
                track_response_times: false,
                track_events: false,
            })
        };

        let raw: Vec<(f64, f64)> = match opts.n_threads {
            Some(1) => (0..opts.n_replications).map(run_one).collect(),
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| SimError::Config(format!("thread pool: {e}")))?;
                pool.install(|| (0..opts.n_replications).into_par_iter().map(run_one).collect())
            }
            None => (0..opts.n_replications).into_par_iter().map(run_one).collect(),
        };

        let raw_n: Vec<f64> = raw.iter().map(|r| r.0).collect();
        let raw_t: Vec<f64> = raw.iter().map(|r| r.1).collect();
        Ok(ReplicationResult {
            mean_n: stats::mean(&raw_n),
            mean_t: stats::mean(&raw_t),
            ci_half_n: stats::ci_half_width(&raw_n, opts.confidence)?,
            ci_half_t: stats::ci_half_width(&raw_t, opts.confidence)?,
            confidence_level: opts.confidence,
            n_replications: opts.n_replications,
            raw_n,
            raw_t,
        })
    }
}

use noisy_float::prelude::*;
use rand::rngs::StdRng;

use crate::dist::Dist;

/// Processor sharing over `k` channels. With `n` resident jobs each job
/// is served at rate `min(k, n) / n`, so every job has a dedicated
/// channel while `n <= k` and the channels are split evenly otherwise.
#[derive(Clone, Debug, Default)]
pub(crate) struct Ps {
    /// `(remaining, arrival_time)` in insertion order.
    jobs: Vec<(f64, f64)>,
}

impl Ps {
    fn recalc(&self, k: usize, ttnc: &mut f64) {
        if self.jobs.is_empty() {
            *ttnc = f64::INFINITY;
            return;
        }
        let n = self.jobs.len();
        let min_rem = self.jobs.iter().map(|j| j.0).fold(f64::INFINITY, f64::min);
        *ttnc = min_rem * n as f64 / k.min(n) as f64;
    }

    pub(crate) fn arrival(
        &mut self,
        clock: f64,
        k: usize,
        ttnc: &mut f64,
        dist: &Dist,
        rng: &mut StdRng,
    ) {
        self.jobs.push((dist.sample(rng), clock));
        self.recalc(k, ttnc);
    }

    pub(crate) fn update(&mut self, dt: f64, clock: f64, k: usize, ttnc: &mut f64) -> Option<f64> {
        let n = self.jobs.len();
        let work = dt * k.min(n) as f64 / n as f64;
        for job in &mut self.jobs {
            job.0 -= work;
        }
        if *ttnc > 0.0 {
            return None;
        }
        let idx = self
            .jobs
            .iter()
            .enumerate()
            .min_by_key(|(_, j)| n64(j.0))
            .map(|(i, _)| i)
            .unwrap();
        let (_, arrived) = self.jobs.remove(idx);
        self.recalc(k, ttnc);
        Some(clock - arrived)
    }
}

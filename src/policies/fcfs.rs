use std::collections::VecDeque;

use noisy_float::prelude::*;
use rand::rngs::StdRng;

use crate::dist::Dist;

/// First-come-first-served with one register: a FIFO line, service time
/// drawn when a job reaches the head.
#[derive(Clone, Debug, Default)]
pub(crate) struct Single {
    arrival_times: VecDeque<f64>,
}

impl Single {
    pub(crate) fn arrival(&mut self, clock: f64, ttnc: &mut f64, dist: &Dist, rng: &mut StdRng) {
        self.arrival_times.push_back(clock);
        if self.arrival_times.len() == 1 {
            *ttnc = dist.sample(rng);
        }
    }

    pub(crate) fn update(
        &mut self,
        clock: f64,
        ttnc: &mut f64,
        dist: &Dist,
        rng: &mut StdRng,
    ) -> Option<f64> {
        if *ttnc > 0.0 {
            return None;
        }
        let arrived = self.arrival_times.pop_front().unwrap();
        *ttnc = if self.arrival_times.is_empty() {
            f64::INFINITY
        } else {
            dist.sample(rng)
        };
        Some(clock - arrived)
    }
}

/// One FIFO line feeding up to `k` registers. A waiting job has no size
/// yet; the size is drawn when it enters a channel. Jobs may depart out
/// of arrival order, so response times are computed per completion.
#[derive(Clone, Debug, Default)]
pub(crate) struct Multi {
    /// `(remaining, arrival_time)` for each busy channel.
    channels: Vec<(f64, f64)>,
    waiting: VecDeque<f64>,
}

impl Multi {
    fn recalc(&self, ttnc: &mut f64) {
        *ttnc = self
            .channels
            .iter()
            .map(|c| c.0)
            .fold(f64::INFINITY, f64::min);
    }

    pub(crate) fn arrival(
        &mut self,
        clock: f64,
        k: usize,
        ttnc: &mut f64,
        dist: &Dist,
        rng: &mut StdRng,
    ) {
        if self.channels.len() < k {
            self.channels.push((dist.sample(rng), clock));
        } else {
            self.waiting.push_back(clock);
        }
        self.recalc(ttnc);
    }

    pub(crate) fn update(
        &mut self,
        dt: f64,
        clock: f64,
        ttnc: &mut f64,
        dist: &Dist,
        rng: &mut StdRng,
    ) -> Option<f64> {
        for channel in &mut self.channels {
            channel.0 -= dt;
        }
        if *ttnc > 0.0 {
            return None;
        }
        let idx = self
            .channels
            .iter()
            .enumerate()
            .min_by_key(|(_, c)| n64(c.0))
            .map(|(i, _)| i)
            .unwrap();
        let (_, arrived) = self.channels.remove(idx);
        if let Some(waiter) = self.waiting.pop_front() {
            self.channels.push((dist.sample(rng), waiter));
        }
        self.recalc(ttnc);
        Some(clock - arrived)
    }
}

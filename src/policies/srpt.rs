use std::cmp::Reverse;
use std::collections::BinaryHeap;

use noisy_float::prelude::*;
use rand::rngs::StdRng;

use crate::dist::Dist;

/// Shortest remaining processing time, single server, preemptive.
///
/// Queued jobs sit in a min-heap keyed by remaining size. The running
/// job is *not* in the heap: its remaining work is the station's TTNC,
/// decremented continuously by the engine, so only its arrival stamp is
/// kept here. An arrival pushes the running job back and pops the new
/// minimum, which preempts in O(log n).
#[derive(Clone, Debug, Default)]
pub(crate) struct Srpt {
    /// `(remaining, arrival_time)` min-heap.
    queued: BinaryHeap<Reverse<(N64, N64)>>,
    running_arrival: f64,
}

impl Srpt {
    pub(crate) fn arrival(&mut self, clock: f64, ttnc: &mut f64, dist: &Dist, rng: &mut StdRng) {
        if ttnc.is_finite() {
            self.queued
                .push(Reverse((n64(*ttnc), n64(self.running_arrival))));
        }
        self.queued.push(Reverse((n64(dist.sample(rng)), n64(clock))));
        let Reverse((remaining, arrived)) = self.queued.pop().unwrap();
        *ttnc = remaining.raw();
        self.running_arrival = arrived.raw();
    }

    pub(crate) fn update(&mut self, clock: f64, ttnc: &mut f64) -> Option<f64> {
        if *ttnc > 0.0 {
            return None;
        }
        let response = clock - self.running_arrival;
        match self.queued.pop() {
            Some(Reverse((remaining, arrived))) => {
                *ttnc = remaining.raw();
                self.running_arrival = arrived.raw();
            }
            None => *ttnc = f64::INFINITY,
        }
        Some(response)
    }
}

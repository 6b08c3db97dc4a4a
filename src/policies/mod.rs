//! The per-station scheduling disciplines.
//!
//! Each machine keeps its own job containers and answers two questions
//! for the engine: what happens when a job arrives, and what happens
//! when the station advances by `dt`. The shared station record (clock,
//! occupancy, counters, `ttnc`) lives in [`crate::server::Server`]; the
//! machines receive the pieces they need as arguments and report a
//! completed job's response time back up.

pub(crate) mod fb;
pub(crate) mod fcfs;
pub(crate) mod ps;
pub(crate) mod srpt;

use rand::rngs::StdRng;

use crate::dist::Dist;
use crate::server::Policy;

#[derive(Clone, Debug)]
pub(crate) enum Discipline {
    Fcfs(fcfs::Single),
    MultiFcfs(fcfs::Multi),
    Ps(ps::Ps),
    Fb(fb::Fb),
    Srpt(srpt::Srpt),
}

impl Discipline {
    pub(crate) fn new(kind: Policy, num_servers: usize) -> Self {
        match kind {
            Policy::Fcfs if num_servers > 1 => Discipline::MultiFcfs(fcfs::Multi::default()),
            Policy::Fcfs => Discipline::Fcfs(fcfs::Single::default()),
            Policy::Ps => Discipline::Ps(ps::Ps::default()),
            Policy::Fb => Discipline::Fb(fb::Fb::default()),
            Policy::Srpt => Discipline::Srpt(srpt::Srpt::default()),
        }
    }

    /// Admit one job, sampled from `dist`, arriving at `clock`.
    pub(crate) fn arrival(
        &mut self,
        clock: f64,
        k: usize,
        ttnc: &mut f64,
        dist: &Dist,
        rng: &mut StdRng,
    ) {
        match self {
            Discipline::Fcfs(q) => q.arrival(clock, ttnc, dist, rng),
            Discipline::MultiFcfs(q) => q.arrival(clock, k, ttnc, dist, rng),
            Discipline::Ps(q) => q.arrival(clock, k, ttnc, dist, rng),
            Discipline::Fb(q) => q.arrival(clock, ttnc, dist, rng),
            Discipline::Srpt(q) => q.arrival(clock, ttnc, dist, rng),
        }
    }

    /// Deduct `dt` of service. `ttnc` has already been decremented and
    /// `clock` advanced by the caller; the station is known non-empty.
    /// Returns the completed job's response time, if one completed.
    pub(crate) fn update(
        &mut self,
        dt: f64,
        clock: f64,
        k: usize,
        ttnc: &mut f64,
        dist: &Dist,
        rng: &mut StdRng,
    ) -> Option<f64> {
        match self {
            Discipline::Fcfs(q) => q.update(clock, ttnc, dist, rng),
            Discipline::MultiFcfs(q) => q.update(dt, clock, ttnc, dist, rng),
            Discipline::Ps(q) => q.update(dt, clock, k, ttnc),
            Discipline::Fb(q) => q.update(dt, clock, ttnc),
            Discipline::Srpt(q) => q.update(clock, ttnc),
        }
    }
}

use rand::rngs::StdRng;

use crate::dist::Dist;
use crate::error::SimError;
use crate::policies::Discipline;

/// Service disciplines available to a station.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Policy {
    /// First come, first served. Multi-server with `with_servers`.
    Fcfs,
    /// Processor sharing. Multi-server with `with_servers`.
    Ps,
    /// Foreground-background / least attained service. Single server.
    Fb,
    /// Shortest remaining processing time, preemptive. Single server.
    Srpt,
}

/// One service station: the shared record (local clock, occupancy,
/// counters, response-time statistics, time to next completion) composed
/// with the policy state machine that owns the actual jobs.
///
/// A station reports its TTNC to the engine, is advanced via `update`,
/// and admits jobs via `offer`. `reset` restores the initial state so
/// the same instance can be reused across runs.
#[derive(Clone, Debug)]
pub struct Server {
    kind: Policy,
    dist: Dist,
    num_servers: usize,
    capacity: Option<usize>,
    discipline: Discipline,
    clock: f64,
    state: usize,
    ttnc: f64,
    num_arrivals: u64,
    num_completions: u64,
    num_rejected: u64,
    mean_response: f64,
    last_response: f64,
}

impl Server {
    /// A single-server, unbounded station drawing job sizes from `dist`.
    pub fn new(kind: Policy, dist: Dist) -> Server {
        Server {
            kind,
            dist,
            num_servers: 1,
            capacity: None,
            discipline: Discipline::new(kind, 1),
            clock: 0.0,
            state: 0,
            ttnc: f64::INFINITY,
            num_arrivals: 0,
            num_completions: 0,
            num_rejected: 0,
            mean_response: 0.0,
            last_response: 0.0,
        }
    }

    /// Run `k` parallel service channels. FB and SRPT are inherently
    /// single-server disciplines and reject `k > 1`.
    pub fn with_servers(mut self, k: usize) -> Result<Server, SimError> {
        if k == 0 {
            return Err(SimError::Config("num_servers must be >= 1".into()));
        }
        if k > 1 && matches!(self.kind, Policy::Fb | Policy::Srpt) {
            return Err(SimError::Policy(format!(
                "{:?} supports only num_servers = 1",
                self.kind
            )));
        }
        self.num_servers = k;
        self.discipline = Discipline::new(self.kind, k);
        Ok(self)
    }

    /// Bound the station at `capacity` resident jobs (queued plus in
    /// service). Arrivals offered while full are rejected.
    pub fn with_capacity(mut self, capacity: usize) -> Result<Server, SimError> {
        if capacity == 0 {
            return Err(SimError::Config("buffer capacity must be >= 1".into()));
        }
        self.capacity = Some(capacity);
        Ok(self)
    }

    pub fn policy(&self) -> Policy {
        self.kind
    }

    pub fn num_servers(&self) -> usize {
        self.num_servers
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Jobs currently resident (queued + in service).
    pub fn state(&self) -> usize {
        self.state
    }

    /// Arrival attempts offered to this station, accepted or not.
    pub fn num_arrivals(&self) -> u64 {
        self.num_arrivals
    }

    pub fn num_completions(&self) -> u64 {
        self.num_completions
    }

    pub fn num_rejected(&self) -> u64 {
        self.num_rejected
    }

    /// Incremental mean of response times completed at this station.
    pub fn mean_response_time(&self) -> f64 {
        self.mean_response
    }

    /// Response time of the most recent completion.
    pub fn last_response_time(&self) -> f64 {
        self.last_response
    }

    pub fn is_full(&self) -> bool {
        self.capacity.map_or(false, |c| self.state >= c)
    }

    /// Time until this station's next completion, `+inf` when idle.
    pub fn ttnc(&self) -> f64 {
        self.ttnc
    }

    /// Clear all mutable state back to the initial values.
    pub fn reset(&mut self) {
        self.discipline = Discipline::new(self.kind, self.num_servers);
        self.clock = 0.0;
        self.state = 0;
        self.ttnc = f64::INFINITY;
        self.num_arrivals = 0;
        self.num_completions = 0;
        self.num_rejected = 0;
        self.mean_response = 0.0;
        self.last_response = 0.0;
    }

    /// Configuration-only deep clone with runtime state reset; gives each
    /// replication worker its own topology.
    pub fn fresh(&self) -> Server {
        let mut copy = self.clone();
        copy.reset();
        copy
    }

    /// Offer one job: count the attempt, reject when buffered to
    /// capacity, admit otherwise. Returns whether the job was admitted.
    pub(crate) fn offer(&mut self, rng: &mut StdRng) -> bool {
        self.num_arrivals += 1;
        if self.is_full() {
            self.num_rejected += 1;
            return false;
        }
        self.discipline
            .arrival(self.clock, self.num_servers, &mut self.ttnc, &self.dist, rng);
        self.state += 1;
        true
    }

    /// Advance the station by `dt`, deducting work from active jobs.
    /// Returns true iff a job completed this step.
    pub(crate) fn update(&mut self, dt: f64, rng: &mut StdRng) -> bool {
        self.clock += dt;
        self.ttnc -= dt;
        if self.state == 0 {
            return false;
        }
        let completed = self.discipline.update(
            dt,
            self.clock,
            self.num_servers,
            &mut self.ttnc,
            &self.dist,
            rng,
        );
        match completed {
            Some(response) => {
                self.state -= 1;
                self.num_completions += 1;
                self.last_response = response;
                let n = self.num_completions as f64;
                self.mean_response += (response - self.mean_response) / n;
                true
            }
            None => false,
        }
    }

    pub(crate) fn zero_flow_counters(&mut self) {
        self.num_arrivals = 0;
        self.num_rejected = 0;
    }
}

//! Driver that coordinates the progress of all stations.
//!
//! The execution is event driven: instead of progressing in real time,
//! each station reports the time until its next completion back to the
//! system, and the engine advances a global clock by the minimum of
//! those and the time to the next external arrival. Completed jobs are
//! then routed onward, out of the system, or into a full buffer.

use rand::prelude::*;
use tracing::debug;

use crate::dist::Dist;
use crate::error::SimError;
use crate::event_log::{EventKind, EventLog, EXTERNAL, SYSTEM_EXIT};
use crate::server::Server;

const ROW_SUM_TOL: f64 = 1e-9;

/// Options for a single simulation run.
#[derive(Clone, Debug)]
pub struct SimOpts {
    /// System departures to simulate in the measurement phase.
    pub num_events: u64,
    pub seed: u64,
    /// System departures to discard before measurement begins. The PRNG
    /// stream runs straight through the phase boundary.
    pub warmup: u64,
    /// Record each exiting job's response time at its final station.
    pub track_response_times: bool,
    /// Record the full event trace.
    pub track_events: bool,
}

impl Default for SimOpts {
    fn default() -> SimOpts {
        SimOpts {
            num_events: 1_000_000,
            seed: 0,
            warmup: 0,
            track_response_times: false,
            track_events: false,
        }
    }
}

/// An open network of service stations fed by external arrivals at
/// station 0, with deterministic tandem or probabilistic routing.
#[derive(Debug)]
pub struct QueueSystem {
    servers: Vec<Server>,
    arrival: Dist,
    transition: Option<Vec<Vec<f64>>>,
    mean_t: f64,
    response_times: Option<Vec<f64>>,
    event_log: Option<EventLog>,
}

/// Mutable loop state for one `sim` call.
struct Run {
    rng: StdRng,
    clock: f64,
    area_n: f64,
    state_total: u64,
    ttna: f64,
    departures: u64,
}

impl QueueSystem {
    /// Deterministic tandem routing: a job completing at station `i`
    /// moves to station `i + 1`, or exits after the last station.
    pub fn new(servers: Vec<Server>, arrival: Dist) -> Result<QueueSystem, SimError> {
        if servers.is_empty() {
            return Err(SimError::Config("at least one server is required".into()));
        }
        Ok(QueueSystem {
            servers,
            arrival,
            transition: None,
            mean_t: 0.0,
            response_times: None,
            event_log: None,
        })
    }

    /// Probabilistic routing by an `n x (n + 1)` transition matrix whose
    /// final column is the probability of exiting the system.
    pub fn with_routing(
        servers: Vec<Server>,
        arrival: Dist,
        matrix: Vec<Vec<f64>>,
    ) -> Result<QueueSystem, SimError> {
        let mut system = QueueSystem::new(servers, arrival)?;
        validate_matrix(&matrix, system.servers.len())?;
        system.transition = Some(matrix);
        Ok(system)
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub fn num_servers(&self) -> usize {
        self.servers.len()
    }

    /// System E[T] from the most recent `sim` call.
    pub fn mean_response_time(&self) -> f64 {
        self.mean_t
    }

    /// Per-job response times recorded at system exit, when tracking was
    /// enabled for the most recent run.
    pub fn response_times(&self) -> Option<&[f64]> {
        self.response_times.as_deref()
    }

    /// The event trace of the most recent run, when tracking was enabled.
    pub fn event_log(&self) -> Option<&EventLog> {
        self.event_log.as_ref()
    }

    /// Configuration-only copy with all runtime state reset.
    pub(crate) fn fresh(&self) -> QueueSystem {
        QueueSystem {
            servers: self.servers.iter().map(Server::fresh).collect(),
            arrival: self.arrival,
            transition: self.transition.clone(),
            mean_t: 0.0,
            response_times: None,
            event_log: None,
        }
    }

    /// Simulate `num_events` system departures. Returns `(mean_N, mean_T)`.
    pub fn sim(&mut self, num_events: u64, seed: u64) -> (f64, f64) {
        self.sim_with(&SimOpts {
            num_events,
            seed,
            ..SimOpts::default()
        })
    }

    /// Simulate with full options. Returns `(mean_N, mean_T)`, where
    /// `mean_N` is the time average of the system occupancy over the
    /// measurement window and `mean_T` is `area_N / departures`
    /// (Little's law applied at the system boundary).
    pub fn sim_with(&mut self, opts: &SimOpts) -> (f64, f64) {
        debug!(
            num_events = opts.num_events,
            seed = opts.seed,
            warmup = opts.warmup,
            "simulation run started"
        );
        for server in &mut self.servers {
            server.reset();
        }
        self.response_times = opts
            .track_response_times
            .then(|| Vec::with_capacity(opts.num_events as usize));
        // Like the response times, the trace covers only the measurement
        // window; warmup events are not kept.
        self.event_log = None;

        let mut rng = StdRng::seed_from_u64(opts.seed);
        let ttna = self.arrival.sample(&mut rng);
        let mut run = Run {
            rng,
            clock: 0.0,
            area_n: 0.0,
            state_total: 0,
            ttna,
            departures: 0,
        };

        if opts.warmup > 0 {
            self.run_phase(&mut run, opts.warmup, false);
            run.area_n = 0.0;
            run.departures = 0;
            for server in &mut self.servers {
                server.zero_flow_counters();
            }
        }
        self.event_log = opts.track_events.then(EventLog::default);
        let measure_start = run.clock;
        self.run_phase(&mut run, opts.num_events, opts.track_response_times);

        let mean_n = run.area_n / (run.clock - measure_start);
        self.mean_t = run.area_n / run.departures.max(1) as f64;
        debug!(
            mean_n,
            mean_t = self.mean_t,
            clock = run.clock,
            "simulation run finished"
        );
        (mean_n, self.mean_t)
    }

    fn run_phase(&mut self, run: &mut Run, target: u64, record: bool) {
        let mut completed: Vec<usize> = Vec::with_capacity(self.servers.len());
        while run.departures < target {
            let ttnc_min = self
                .servers
                .iter()
                .map(Server::ttnc)
                .fold(f64::INFINITY, f64::min);
            // ttnc <= 0 means "complete now"; floating-point drift below
            // zero must not pull the clock backwards.
            let dt = ttnc_min.min(run.ttna).max(0.0);
            run.clock += dt;
            run.area_n += run.state_total as f64 * dt;

            completed.clear();
            for (i, server) in self.servers.iter_mut().enumerate() {
                if server.update(dt, &mut run.rng) {
                    completed.push(i);
                }
            }

            for &from in &completed {
                let dest = self.next_server(from, &mut run.rng);
                if dest == self.servers.len() {
                    run.departures += 1;
                    run.state_total -= 1;
                    if record {
                        let response = self.servers[from].last_response_time();
                        if let Some(times) = &mut self.response_times {
                            times.push(response);
                        }
                    }
                    self.log(
                        run.clock,
                        EventKind::Departure,
                        from as i32,
                        SYSTEM_EXIT,
                        run.state_total,
                    );
                } else if self.servers[dest].offer(&mut run.rng) {
                    self.log(
                        run.clock,
                        EventKind::Route,
                        from as i32,
                        dest as i32,
                        run.state_total,
                    );
                } else {
                    // Finite-buffer loss is terminal: the job leaves the
                    // system here and counts toward the departure target.
                    run.departures += 1;
                    run.state_total -= 1;
                    self.log(
                        run.clock,
                        EventKind::Rejection,
                        from as i32,
                        dest as i32,
                        run.state_total,
                    );
                }
            }

            // Completions at the same instant were handled above; the
            // arrival is processed second.
            if run.ttna <= ttnc_min {
                if self.servers[0].offer(&mut run.rng) {
                    run.state_total += 1;
                    self.log(run.clock, EventKind::Arrival, EXTERNAL, 0, run.state_total);
                } else {
                    self.log(run.clock, EventKind::Rejection, EXTERNAL, 0, run.state_total);
                }
                run.ttna = self.arrival.sample(&mut run.rng);
            } else {
                run.ttna -= dt;
            }
        }
    }

    /// Destination of a job completing at `from`; an index equal to the
    /// station count means the system exit. Draws one uniform per routed
    /// job under probabilistic routing, none under tandem.
    fn next_server(&self, from: usize, rng: &mut StdRng) -> usize {
        match &self.transition {
            None => from + 1,
            Some(matrix) => {
                let u: f64 = rng.gen();
                let row = &matrix[from];
                let mut acc = 0.0;
                for (j, p) in row.iter().enumerate() {
                    acc += p;
                    if u < acc {
                        return j;
                    }
                }
                row.len() - 1
            }
        }
    }

    fn log(&mut self, time: f64, kind: EventKind, from: i32, to: i32, state: u64) {
        if let Some(log) = &mut self.event_log {
            log.push(time, kind, from, to, state);
        }
    }
}

fn validate_matrix(matrix: &[Vec<f64>], n: usize) -> Result<(), SimError> {
    if matrix.len() != n {
        return Err(SimError::Topology(format!(
            "expected {n} rows, one per server, got {}",
            matrix.len()
        )));
    }
    for (i, row) in matrix.iter().enumerate() {
        if row.len() != n + 1 {
            return Err(SimError::Topology(format!(
                "row {i} must have {} entries, the last being the exit probability, got {}",
                n + 1,
                row.len()
            )));
        }
        if let Some(p) = row.iter().find(|&&p| p < 0.0) {
            return Err(SimError::Topology(format!(
                "row {i} contains a negative probability {p}"
            )));
        }
        let sum: f64 = row.iter().sum();
        if (sum - 1.0).abs() > ROW_SUM_TOL {
            return Err(SimError::Topology(format!(
                "row {i} sums to {sum}, expected 1"
            )));
        }
    }
    Ok(())
}

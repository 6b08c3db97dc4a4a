//! Parallel-vector trace of everything that happens during a run.

use crate::error::SimError;

/// Sentinel station index for an external arrival source.
pub const EXTERNAL: i32 = -1;
/// Sentinel station index for a departure out of the system.
pub const SYSTEM_EXIT: i32 = -1;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// External arrival accepted at `to`; `from` is [`EXTERNAL`].
    Arrival,
    /// Job left the system from `from`; `to` is [`SYSTEM_EXIT`].
    Departure,
    /// Job left `from` and entered `to` (both station indices).
    Route,
    /// Job refused at `to` because the buffer was full; `from` is
    /// [`EXTERNAL`] for external rejections, the source station otherwise.
    Rejection,
}

/// Column-oriented event record: five parallel vectors of equal length,
/// append-only while a simulation runs. `states` holds the system
/// occupancy *after* each event.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    pub times: Vec<f64>,
    pub kinds: Vec<EventKind>,
    pub from_servers: Vec<i32>,
    pub to_servers: Vec<i32>,
    pub states: Vec<u64>,
}

impl EventLog {
    pub(crate) fn push(&mut self, time: f64, kind: EventKind, from: i32, to: i32, state: u64) {
        self.times.push(time);
        self.kinds.push(kind);
        self.from_servers.push(from);
        self.to_servers.push(to);
        self.states.push(state);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Per-station occupancy trajectories reconstructed from an [`EventLog`].
#[derive(Clone, Debug)]
pub struct ServerStates {
    pub times: Vec<f64>,
    /// `server_states[s][i]` is the occupancy of station `s` after event `i`.
    pub server_states: Vec<Vec<i64>>,
}

/// Replay a log into per-station occupancy counts.
///
/// When `n_servers` is `None` the station count is inferred from the
/// largest index appearing in the log.
pub fn per_server_states(
    log: &EventLog,
    n_servers: Option<usize>,
) -> Result<ServerStates, SimError> {
    if log.is_empty() {
        return Err(SimError::EmptyLog);
    }

    let n_servers = n_servers.unwrap_or_else(|| {
        let max_idx = log
            .from_servers
            .iter()
            .chain(log.to_servers.iter())
            .copied()
            .filter(|&v| v >= 0)
            .max()
            .unwrap_or(-1);
        (max_idx + 1) as usize
    });

    let mut pops = vec![0i64; n_servers];
    let mut server_states: Vec<Vec<i64>> = vec![Vec::with_capacity(log.len()); n_servers];

    for i in 0..log.len() {
        let from = log.from_servers[i];
        let to = log.to_servers[i];
        match log.kinds[i] {
            EventKind::Arrival => pops[to as usize] += 1,
            EventKind::Departure => pops[from as usize] -= 1,
            EventKind::Route => {
                pops[from as usize] -= 1;
                pops[to as usize] += 1;
            }
            // A routed rejection removes the job from its source; an
            // external rejection never entered any station.
            EventKind::Rejection => {
                if from >= 0 {
                    pops[from as usize] -= 1;
                }
            }
        }
        for s in 0..n_servers {
            server_states[s].push(pops[s]);
        }
    }

    Ok(ServerStates {
        times: log.times.clone(),
        server_states,
    })
}

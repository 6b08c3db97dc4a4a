//! Discrete-event simulation of open queueing networks.
//!
//! A [`QueueSystem`] owns an ordered list of [`Server`] stations fed by
//! external arrivals at station 0. Jobs flow through the network under
//! deterministic tandem or probabilistic routing and eventually depart;
//! the engine skips time from event to event and accumulates
//! time-weighted statistics (mean number in system, mean response time),
//! optional per-job response-time samples, and an optional full event
//! trace.
//!
//! Stations schedule their jobs with one of four disciplines
//! ([`Policy`]): FCFS (single or multi server), processor sharing,
//! foreground-background (least attained service), and preemptive
//! shortest remaining processing time. Runs are deterministic per seed,
//! and [`QueueSystem::replicate`] fans independent replications out
//! across threads without disturbing that determinism.
//!
//! ```
//! use queue_sim::{Dist, Policy, QueueSystem, Server};
//!
//! // M/M/1: Poisson(1) arrivals, Exp(2) service.
//! let server = Server::new(Policy::Fcfs, Dist::Exp(2.0));
//! let mut system = QueueSystem::new(vec![server], Dist::Exp(1.0)).unwrap();
//! let (mean_n, mean_t) = system.sim(100_000, 42);
//! assert!(mean_n > 0.0 && mean_t > 0.0);
//! ```

mod dist;
mod error;
mod event_log;
mod policies;
mod replicate;
mod server;
mod stats;
mod system;

pub use dist::Dist;
pub use error::SimError;
pub use event_log::{per_server_states, EventKind, EventLog, ServerStates, EXTERNAL, SYSTEM_EXIT};
pub use replicate::{ReplicateOpts, ReplicationResult};
pub use server::{Policy, Server};
pub use system::{QueueSystem, SimOpts};

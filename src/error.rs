use thiserror::Error;

/// Validation failures surfaced before any simulation state is mutated.
///
/// There are no retriable errors inside the main loop; numerical edge
/// cases are absorbed in-loop and malformed sampler output is treated as
/// programmer error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// Invalid scalar configuration: buffer capacity, server multiplicity,
    /// replication count, confidence level, t-quantile arguments.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Transition matrix of the wrong shape, with a negative entry, or
    /// with a row that does not sum to 1.
    #[error("invalid transition matrix: {0}")]
    Topology(String),

    /// A policy combined with options it does not support, e.g. FB or
    /// SRPT with more than one server.
    #[error("unsupported policy variant: {0}")]
    Policy(String),

    /// Per-server state reconstruction was asked for an empty event log.
    #[error("event log is empty")]
    EmptyLog,
}

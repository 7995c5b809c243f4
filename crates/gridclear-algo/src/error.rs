use gridclear_core::GridError;
use thiserror::Error;

/// Clearing engine errors
///
/// Only `Grid` and `HourOutOfRange` abort a clearing run. Solver variants are
/// produced by [`crate::LpBackend`] implementations and downgraded to
/// diagnostics by the engine.
#[derive(Debug, Error)]
pub enum ClearingError {
    /// Invalid network, document or configuration
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Backend rejected or failed on the problem
    #[error("LP solver failed: {0}")]
    Solver(String),

    /// Backend proved the problem has no feasible point
    #[error("LP infeasible: {0}")]
    Infeasible(String),

    /// Hour index outside the trading day
    #[error("Hour {0} is outside the valid range 0-23")]
    HourOutOfRange(usize),

    /// Requested backend is not compiled in
    #[error("unknown lp solver '{name}'; supported values: {supported}")]
    UnknownSolver { name: String, supported: String },
}

pub type ClearingResult<T> = Result<T, ClearingError>;

use thiserror::Error;

use crate::data::SolverKind;

/// Errors surfaced to the caller of a tournament solve.
///
/// Non-optimal or infeasible results are not errors; they are reported
/// through the result record and its status.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("team count must be even and at least 4, got {0}")]
    InvalidTeamCount(usize),

    #[error("solver must be 'highs' or 'cbc', got '{0}'")]
    UnsupportedSolver(String),

    #[error("solver {solver} could not be invoked: {reason}")]
    SolverInvocation { solver: SolverKind, reason: String },
}

impl TournamentError {
    /// Whether the error was raised before any model was built.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            TournamentError::InvalidTeamCount(_) | TournamentError::UnsupportedSolver(_)
        )
    }
}

/// A backend failed to run at all (missing binary, unreadable output, ...).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct InvocationError(pub String);

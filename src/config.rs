use crate::data::{SolveRequest, SolverKind};
use crate::error::TournamentError;
use std::env;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Validated settings for one tournament solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveSettings {
    pub n: usize,
    pub solver: SolverKind,
    pub time_limit: u64,
    pub verbose: bool,
}

impl SolveSettings {
    pub fn new(n: usize, solver: SolverKind, time_limit: u64, verbose: bool) -> Result<Self, TournamentError> {
        if n < 4 || n % 2 != 0 {
            return Err(TournamentError::InvalidTeamCount(n));
        }
        Ok(SolveSettings {
            n,
            solver,
            time_limit,
            verbose,
        })
    }
}

impl TryFrom<&SolveRequest> for SolveSettings {
    type Error = TournamentError;

    fn try_from(request: &SolveRequest) -> Result<Self, Self::Error> {
        let solver = request.solver.parse()?;
        SolveSettings::new(request.n, solver, request.time_limit, request.verbose)
    }
}

/// Process-level settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        ServerConfig {
            bind_addr: env::var("STS_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        }
    }
}

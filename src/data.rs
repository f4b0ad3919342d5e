use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TournamentError;

// Type aliases for clarity
pub type Team = u32;
pub type Week = u32;
pub type Period = u32;

/// An unordered pair of distinct teams, always stored with `first < second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Match {
    pub first: Team,
    pub second: Team,
}

impl Match {
    pub fn new(a: Team, b: Team) -> Self {
        if a < b {
            Match { first: a, second: b }
        } else {
            Match { first: b, second: a }
        }
    }

    pub fn involves(&self, team: Team) -> bool {
        self.first == team || self.second == team
    }

    /// `[home, away]` for the given orientation.
    pub fn oriented(&self, first_is_home: bool) -> [Team; 2] {
        if first_is_home {
            [self.first, self.second]
        } else {
            [self.second, self.first]
        }
    }
}

/// The two MIP backends a tournament can be solved with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    Highs,
    Cbc,
}

impl SolverKind {
    /// The backend tried when this one cannot be invoked.
    pub fn alternate(self) -> SolverKind {
        match self {
            SolverKind::Highs => SolverKind::Cbc,
            SolverKind::Cbc => SolverKind::Highs,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SolverKind::Highs => "highs",
            SolverKind::Cbc => "cbc",
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolverKind {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "highs" => Ok(SolverKind::Highs),
            "cbc" => Ok(SolverKind::Cbc),
            _ => Err(TournamentError::UnsupportedSolver(s.to_string())),
        }
    }
}

/// Outcome vocabulary reported by a solver backend. Only `Optimal` counts as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SolveStatus {
    Optimal,
    #[serde(rename = "Not Solved")]
    NotSolved,
    Infeasible,
    Unbounded,
    Undefined,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SolveStatus::Optimal => "Optimal",
            SolveStatus::NotSolved => "Not Solved",
            SolveStatus::Infeasible => "Infeasible",
            SolveStatus::Unbounded => "Unbounded",
            SolveStatus::Undefined => "Undefined",
        };
        f.write_str(label)
    }
}

/// `grid[period - 1][week - 1]` holds `[home, away]`.
pub type ScheduleGrid = Vec<Vec<Option<[Team; 2]>>>;

/// The input for a single tournament solve.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveRequest {
    pub n: usize,
    #[serde(default = "default_solver_name")]
    pub solver: String,
    #[serde(default = "default_time_limit")]
    pub time_limit: u64,
    #[serde(default)]
    pub verbose: bool,
}

pub fn default_solver_name() -> String {
    SolverKind::Highs.name().to_string()
}

pub fn default_time_limit() -> u64 {
    300
}

/// The normalized result of one solve, as persisted by downstream tooling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub time: u64,
    pub optimal: bool,
    pub obj: Option<i64>,
    pub sol: Option<ScheduleGrid>,
    /// Backend that actually produced the result, after any fallback.
    pub solver: SolverKind,
}

/// A result record together with the status that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TournamentOutcome {
    #[serde(flatten)]
    pub record: ResultRecord,
    pub status: SolveStatus,
}

impl fmt::Display for TournamentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let obj = match self.record.obj {
            Some(obj) => obj.to_string(),
            None => "None".to_string(),
        };
        write!(
            f,
            "Solver={} | Status={} | Optimal={} | Obj={} | Time={}s",
            self.record.solver, self.status, self.record.optimal, obj, self.record.time
        )
    }
}

use crate::data::{SolveStatus, SolverKind};
use crate::error::InvocationError;
use crate::model::TournamentModel;
use good_lp::solvers::SolutionStatus;
use good_lp::solvers::highs::highs;
use good_lp::solvers::lp_solvers::LpSolver;
use good_lp::{Expression, ResolutionError, Solution, SolverModel, Variable};
use log::{debug, info};
use lp_solvers::lp_format::LpProblem;
use lp_solvers::solvers::{
    CbcSolver, Solution as LpRunSolution, SolverTrait, Status, WithMaxSeconds, WithNbThreads,
};
use std::sync::{Arc, Mutex};

/// Raw values handed back by a backend, before any rounding.
///
/// `y` and `h` are empty when the solver returned no assignment at all.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSolution {
    pub status: SolveStatus,
    pub objective: Option<f64>,
    pub y: Vec<Vec<f64>>,
    pub h: Vec<f64>,
}

impl RawSolution {
    pub fn without_values(status: SolveStatus) -> Self {
        RawSolution {
            status,
            objective: None,
            y: Vec::new(),
            h: Vec::new(),
        }
    }
}

/// A MIP solver the tournament model can be handed to.
///
/// One blocking, time-bounded call per model; the model is consumed.
pub trait SolverBackend {
    fn kind(&self) -> SolverKind;

    fn solve(
        &self,
        model: TournamentModel,
        time_limit: u64,
        verbose: bool,
    ) -> Result<RawSolution, InvocationError>;
}

/// HiGHS, linked in-process.
pub struct HighsBackend;

impl SolverBackend for HighsBackend {
    fn kind(&self) -> SolverKind {
        SolverKind::Highs
    }

    fn solve(
        &self,
        model: TournamentModel,
        time_limit: u64,
        verbose: bool,
    ) -> Result<RawSolution, InvocationError> {
        let TournamentModel {
            vars,
            y,
            h,
            constraints,
            objective,
            ..
        } = model;

        let mut problem = vars
            .minimise(objective.clone())
            .using(highs)
            .set_option("threads", 1) // limit to 1 thread for reproducibility
            .set_option("random_seed", 1234) //set seed for reproducibility
            .set_option("time_limit", time_limit as f64)
            .set_option("output_flag", verbose);
        for c in constraints {
            problem.add_constraint(c);
        }

        info!("Starting HiGHS with a {}s budget...", time_limit);
        collect(problem.solve(), &y, &h, &objective)
    }
}

/// CBC, run as an external executable (`cbc` on `PATH` by default).
pub struct CbcBackend {
    command: String,
}

impl CbcBackend {
    pub fn with_command(command: impl Into<String>) -> Self {
        CbcBackend {
            command: command.into(),
        }
    }
}

impl Default for CbcBackend {
    fn default() -> Self {
        CbcBackend::with_command("cbc")
    }
}

impl SolverBackend for CbcBackend {
    fn kind(&self) -> SolverKind {
        SolverKind::Cbc
    }

    fn solve(
        &self,
        model: TournamentModel,
        time_limit: u64,
        verbose: bool,
    ) -> Result<RawSolution, InvocationError> {
        let TournamentModel {
            vars,
            y,
            h,
            constraints,
            objective,
            ..
        } = model;

        let seconds = u32::try_from(time_limit).unwrap_or(u32::MAX);
        let cbc = CbcSolver::new()
            .command_name(self.command.clone())
            .with_max_seconds(seconds)
            .with_nb_threads(1);
        let run = RecordedRun::default();
        let mut problem = vars.minimise(objective.clone()).using(LpSolver(StatusRecorder {
            inner: cbc,
            run: run.clone(),
        }));
        for c in constraints {
            problem.add_constraint(c);
        }

        // cbc output is captured by the runner, only our own progress is shown
        if verbose {
            info!("Starting CBC with a {}s budget...", time_limit);
        }
        let raw = collect(problem.solve(), &y, &h, &objective)?;

        // good_lp reports every returned cbc solution as optimal
        let recorded = run.lock().ok().and_then(|slot| *slot);
        match recorded {
            Some((status, _)) if raw.y.is_empty() => {
                debug!("cbc finished with {}", status);
                Ok(raw)
            }
            Some((status, false)) => Ok(RawSolution::without_values(status)),
            Some((status, true)) => Ok(RawSolution { status, ..raw }),
            None => Ok(raw),
        }
    }
}

/// Status and presence of values from the last cbc run.
type RecordedRun = Arc<Mutex<Option<(SolveStatus, bool)>>>;

/// Passes runs through to cbc, keeping the status good_lp would discard.
#[derive(Clone)]
struct StatusRecorder {
    inner: CbcSolver,
    run: RecordedRun,
}

impl SolverTrait for StatusRecorder {
    fn run<'a, P: LpProblem<'a>>(&self, problem: &'a P) -> Result<LpRunSolution, String> {
        let solution = self.inner.run(problem)?;
        let status = match solution.status {
            Status::Optimal => SolveStatus::Optimal,
            Status::SubOptimal | Status::MipGap => SolveStatus::NotSolved,
            Status::Infeasible => SolveStatus::Infeasible,
            Status::Unbounded => SolveStatus::Unbounded,
            Status::NotSolved => SolveStatus::Undefined,
            #[allow(unreachable_patterns)]
            _ => SolveStatus::Undefined,
        };
        if let Ok(mut slot) = self.run.lock() {
            *slot = Some((status, !solution.results.is_empty()));
        }
        Ok(solution)
    }
}

pub fn backend_for(kind: SolverKind) -> Box<dyn SolverBackend> {
    match kind {
        SolverKind::Highs => Box::new(HighsBackend),
        SolverKind::Cbc => Box::new(CbcBackend::default()),
    }
}

/// Reads the values back out of a finished solve.
///
/// A solver that could not run at all is an invocation error; every other
/// outcome, including infeasibility, is a status.
fn collect<S: Solution>(
    solved: Result<S, ResolutionError>,
    y: &[Vec<Variable>],
    h: &[Variable],
    objective: &Expression,
) -> Result<RawSolution, InvocationError> {
    let solution = match solved {
        Ok(solution) => solution,
        Err(ResolutionError::Infeasible) => {
            return Ok(RawSolution::without_values(SolveStatus::Infeasible));
        }
        Err(ResolutionError::Unbounded) => {
            return Ok(RawSolution::without_values(SolveStatus::Unbounded));
        }
        Err(ResolutionError::Str(reason)) => return Err(InvocationError(reason)),
        Err(e) => {
            debug!("Solver stopped without a solution: {}", e);
            return Ok(RawSolution::without_values(SolveStatus::Undefined));
        }
    };

    let status = match solution.status() {
        SolutionStatus::Optimal => SolveStatus::Optimal,
        _ => SolveStatus::NotSolved,
    };
    Ok(RawSolution {
        status,
        objective: Some(solution.eval(objective.clone())),
        y: y
            .iter()
            .map(|row| row.iter().map(|&v| solution.value(v)).collect())
            .collect(),
        h: h.iter().map(|&v| solution.value(v)).collect(),
    })
}

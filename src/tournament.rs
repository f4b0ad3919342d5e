use crate::config::SolveSettings;
use crate::data::{ResultRecord, SolveStatus, TournamentOutcome};
use crate::decode::decode;
use crate::error::TournamentError;
use crate::model::TournamentModel;
use crate::pairing::Pairing;
use crate::solver::{SolverBackend, backend_for};
use log::{info, warn};
use std::time::Instant;

/// Builds, solves and decodes one tournament with the production backends.
pub fn solve_tournament(settings: &SolveSettings) -> Result<TournamentOutcome, TournamentError> {
    let primary = backend_for(settings.solver);
    let alternate = backend_for(settings.solver.alternate());
    solve_with_backends(settings, primary.as_ref(), alternate.as_ref())
}

/// Same pipeline with explicit backends.
///
/// If `primary` cannot be invoked, `alternate` gets one attempt on a freshly
/// built model and is reported as the solver used.
pub fn solve_with_backends(
    settings: &SolveSettings,
    primary: &dyn SolverBackend,
    alternate: &dyn SolverBackend,
) -> Result<TournamentOutcome, TournamentError> {
    let pairing = Pairing::new(settings.n)?;
    let model = TournamentModel::build(&pairing);

    let start_time = Instant::now();
    let (raw, used) = match primary.solve(model, settings.time_limit, settings.verbose) {
        Ok(raw) => (raw, primary.kind()),
        Err(e) => {
            warn!(
                "{} could not be invoked ({}), falling back to {}",
                primary.kind(),
                e,
                alternate.kind()
            );
            let model = TournamentModel::build(&pairing);
            let raw = alternate
                .solve(model, settings.time_limit, settings.verbose)
                .map_err(|e| TournamentError::SolverInvocation {
                    solver: alternate.kind(),
                    reason: e.to_string(),
                })?;
            (raw, alternate.kind())
        }
    };
    let elapsed = start_time.elapsed();

    let optimal = raw.status == SolveStatus::Optimal;
    // non-optimal runs are always reported at the full budget
    let time = if optimal {
        elapsed.as_secs()
    } else {
        settings.time_limit
    };

    let decoded = decode(&raw, &pairing);
    let outcome = TournamentOutcome {
        record: ResultRecord {
            time,
            optimal,
            obj: decoded.objective,
            sol: decoded.grid,
            solver: used,
        },
        status: raw.status,
    };
    info!("{} (solved in {:.2?})", outcome, elapsed);
    Ok(outcome)
}

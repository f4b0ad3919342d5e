use crate::config::SolveSettings;
use crate::data::{ResultRecord, SolverKind, default_time_limit};
use crate::error::TournamentError;
use crate::tournament::solve_tournament;
use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TEAM_COUNTS: [usize; 5] = [6, 8, 10, 12, 14];

/// Input for a HiGHS-vs-CBC comparison over several team counts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyRequest {
    #[serde(default = "default_team_counts")]
    pub ns: Vec<usize>,
    #[serde(default = "default_time_limit")]
    pub time_limit: u64,
}

fn default_team_counts() -> Vec<usize> {
    DEFAULT_TEAM_COUNTS.to_vec()
}

/// One line of the comparison: each solver's time, optimality and objective for `n`.
///
/// `solver_highs` / `solver_cbc` name the backend that actually ran, which
/// differs from the column's solver after a fallback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyRow {
    pub n: usize,
    pub time_highs: u64,
    pub optimal_highs: bool,
    pub obj_highs: Option<i64>,
    pub solver_highs: SolverKind,
    pub time_cbc: u64,
    pub optimal_cbc: bool,
    pub obj_cbc: Option<i64>,
    pub solver_cbc: SolverKind,
}

impl StudyRow {
    fn from_records(n: usize, highs: &ResultRecord, cbc: &ResultRecord) -> Self {
        StudyRow {
            n,
            time_highs: highs.time,
            optimal_highs: highs.optimal,
            obj_highs: highs.obj,
            solver_highs: highs.solver,
            time_cbc: cbc.time,
            optimal_cbc: cbc.optimal,
            obj_cbc: cbc.obj,
            solver_cbc: cbc.solver,
        }
    }
}

/// Solves every team count with HiGHS then CBC, one after the other.
pub fn run_study(request: &StudyRequest) -> Result<Vec<StudyRow>, TournamentError> {
    // reject the whole batch up front rather than halfway through
    for &n in &request.ns {
        SolveSettings::new(n, SolverKind::Highs, request.time_limit, false)?;
    }

    let mut rows = Vec::with_capacity(request.ns.len());
    for &n in &request.ns {
        info!("running n={} using highs", n);
        let highs = solve_tournament(&SolveSettings::new(n, SolverKind::Highs, request.time_limit, false)?)?;
        info!("running n={} using cbc", n);
        let cbc = solve_tournament(&SolveSettings::new(n, SolverKind::Cbc, request.time_limit, false)?)?;
        if cbc.record.solver != SolverKind::Cbc {
            warn!("n={}: cbc column holds {} results", n, cbc.record.solver);
        }
        info!(
            "n={}: highs time is {}s, cbc time is {}s",
            n, highs.record.time, cbc.record.time
        );
        rows.push(StudyRow::from_records(n, &highs.record, &cbc.record));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_to_reference_sizes() {
        let request: StudyRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.ns, vec![6, 8, 10, 12, 14]);
        assert_eq!(request.time_limit, 300);
    }

    #[test]
    fn invalid_team_count_rejects_whole_study() {
        let request = StudyRequest {
            ns: vec![4, 7],
            time_limit: 5,
        };
        assert!(matches!(
            run_study(&request),
            Err(TournamentError::InvalidTeamCount(7))
        ));
    }

    #[test]
    fn small_study_produces_one_row_per_size() {
        let request = StudyRequest {
            ns: vec![4],
            time_limit: 60,
        };
        let rows = run_study(&request).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.n, 4);
        assert!(row.optimal_highs);
        assert_eq!(row.obj_highs, Some(2));
        assert_eq!(row.solver_highs, SolverKind::Highs);
        assert_eq!(row.obj_cbc, Some(2));
    }

    #[test]
    fn rows_name_the_solver_that_ran() {
        let highs = ResultRecord {
            time: 1,
            optimal: true,
            obj: Some(3),
            sol: None,
            solver: SolverKind::Highs,
        };
        let fallback = ResultRecord {
            time: 2,
            ..highs.clone()
        };
        let row = StudyRow::from_records(6, &highs, &fallback);
        assert_eq!(row.solver_highs, SolverKind::Highs);
        assert_eq!(row.solver_cbc, SolverKind::Highs);
        assert_eq!(row.time_cbc, 2);

        let cbc = ResultRecord {
            solver: SolverKind::Cbc,
            ..fallback
        };
        assert_eq!(StudyRow::from_records(6, &highs, &cbc).solver_cbc, SolverKind::Cbc);
    }

    #[test]
    fn rows_serialize_with_column_names() {
        let row = StudyRow {
            n: 6,
            time_highs: 0,
            optimal_highs: true,
            obj_highs: Some(3),
            solver_highs: SolverKind::Highs,
            time_cbc: 300,
            optimal_cbc: false,
            obj_cbc: None,
            solver_cbc: SolverKind::Cbc,
        };
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            serde_json::json!({
                "n": 6,
                "time_highs": 0,
                "optimal_highs": true,
                "obj_highs": 3,
                "solver_highs": "highs",
                "time_cbc": 300,
                "optimal_cbc": false,
                "obj_cbc": null,
                "solver_cbc": "cbc"
            })
        );
    }
}

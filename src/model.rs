use crate::data::Team;
use crate::pairing::Pairing;
use good_lp::variable;
use good_lp::{Constraint, Expression, ProblemVariables, Variable, constraint};
use itertools::Itertools;
use log::{info, trace};
use std::collections::HashMap;

/// A freshly built tournament MIP, owned by exactly one solve.
///
/// Indexing: `y[m][p]` and `h[m]` follow `Pairing::matches()` order, periods
/// and teams are stored 0-based (`home_count[t - 1]` is team `t`).
pub struct TournamentModel {
    pub vars: ProblemVariables,
    pub y: Vec<Vec<Variable>>,
    pub h: Vec<Variable>,
    pub home_count: Vec<Variable>,
    pub d_plus: Vec<Variable>,
    pub d_minus: Vec<Variable>,
    // range trackers: bounded, referenced by no constraint or objective term
    #[allow(dead_code)]
    pub z_min: Variable,
    #[allow(dead_code)]
    pub z_max: Variable,
    pub constraints: Vec<Constraint>,
    pub objective: Expression,
}

impl TournamentModel {
    pub fn build(pairing: &Pairing) -> Self {
        let n = pairing.team_count();
        let weeks = pairing.week_count();
        let periods = pairing.period_count();
        let matches: Vec<_> = pairing.matches().copied().collect();
        let target = (n as f64 - 1.0) / 2.0;

        info!(
            "Setting up STS model with {} teams, {} weeks, {} periods and {} matches...",
            n,
            weeks,
            periods,
            matches.len()
        );
        let mut vars = ProblemVariables::new();

        // y_mp = 1 if match m is played in period p
        let y: Vec<Vec<Variable>> = matches
            .iter()
            .map(|_| vars.add_vector(variable().binary(), periods))
            .collect();
        // h_m = 1 if the first team of match m is home
        let h = vars.add_vector(variable().binary(), matches.len());
        let home_count = vars.add_vector(variable().min(0).max(weeks as f64), n);
        let z_min = vars.add(variable().min(0));
        let z_max = vars.add(variable().min(0).max(weeks as f64));
        let d_plus = vars.add_vector(variable().min(0), n);
        let d_minus = vars.add_vector(variable().min(0), n);

        let match_index: HashMap<_, usize> =
            matches.iter().enumerate().map(|(i, m)| (*m, i)).collect();
        let team_matches: HashMap<Team, Vec<usize>> = matches
            .iter()
            .enumerate()
            .flat_map(|(i, m)| [(m.first, i), (m.second, i)])
            .into_group_map();

        let mut constraints = Vec::new();

        // every match is played in exactly one period
        for row in &y {
            let placed: Expression = row.iter().copied().sum();
            constraints.push(constraint!(placed == 1));
        }
        trace!("{} single placement constraints", matches.len());

        // every period of every week hosts exactly one of that week's matches
        for week in pairing.weeks() {
            for p in 0..periods {
                let occupied: Expression = week.iter().map(|m| y[match_index[m]][p]).sum();
                constraints.push(constraint!(occupied == 1));
            }
        }
        trace!("{} period exclusivity constraints", weeks * periods);

        // no team plays more than twice in the same period
        for t in 1..=n as Team {
            let own = team_matches.get(&t).map(Vec::as_slice).unwrap_or_default();
            for p in 0..periods {
                let appearances: Expression = own.iter().map(|&i| y[i][p]).sum();
                constraints.push(constraint!(appearances <= 2));
            }
        }
        trace!("{} team period cap constraints", n * periods);

        // home_count_t = #(t first and home) + #(t second and not home)
        for t in 1..=n as Team {
            let own = team_matches.get(&t).map(Vec::as_slice).unwrap_or_default();
            let as_first: Expression = own
                .iter()
                .filter(|&&i| matches[i].first == t)
                .map(|&i| h[i])
                .sum();
            let second: Vec<usize> = own
                .iter()
                .copied()
                .filter(|&i| matches[i].second == t)
                .collect();
            let away_flags: Expression = second.iter().map(|&i| h[i]).sum();
            let homes = as_first + second.len() as f64 - away_flags;
            let count = home_count[t as usize - 1];
            constraints.push(constraint!(count == homes));
        }

        // symmetry break: team 1's week-1 match goes to period 1
        let anchor = y[match_index[&pairing.anchor_match()]][0];
        constraints.push(constraint!(anchor == 1));

        // home_count_t - target = d_plus_t - d_minus_t
        for t in 0..n {
            let (count, plus, minus) = (home_count[t], d_plus[t], d_minus[t]);
            constraints.push(constraint!(count - target == plus - minus));
        }

        let objective: Expression = d_plus.iter().chain(d_minus.iter()).copied().sum();

        let model = TournamentModel {
            vars,
            y,
            h,
            home_count,
            d_plus,
            d_minus,
            z_min,
            z_max,
            constraints,
            objective,
        };
        info!(
            "Model ready: {} variables, {} constraints, home target {}",
            model.variable_count(),
            model.constraint_count(),
            target
        );
        model
    }

    pub fn variable_count(&self) -> usize {
        self.vars.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}

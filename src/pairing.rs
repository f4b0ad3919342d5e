use crate::data::{Match, Team, Week};
use crate::error::TournamentError;
use std::collections::HashMap;

/// Week-by-week round robin for `n` teams: a 1-factorization of `K_n`.
///
/// Built with the circle method. Team 1 sits at the centre and teams `2..=n`
/// around the circle; each week the centre meets the team opposite it and the
/// remaining teams meet their mirror image across that diameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    n: usize,
    weeks: Vec<Vec<Match>>,
    week_of: HashMap<Match, Week>,
}

impl Pairing {
    pub fn new(n: usize) -> Result<Self, TournamentError> {
        let weeks = round_robin_weeks(n)?;
        let week_of = weeks
            .iter()
            .enumerate()
            .flat_map(|(w, pairs)| pairs.iter().map(move |m| (*m, w as Week + 1)))
            .collect();
        Ok(Pairing { n, weeks, week_of })
    }

    pub fn team_count(&self) -> usize {
        self.n
    }

    pub fn week_count(&self) -> usize {
        self.weeks.len()
    }

    pub fn period_count(&self) -> usize {
        self.n / 2
    }

    pub fn weeks(&self) -> &[Vec<Match>] {
        &self.weeks
    }

    pub fn week_of(&self, m: &Match) -> Option<Week> {
        self.week_of.get(m).copied()
    }

    /// All matches, in week order.
    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.weeks.iter().flatten()
    }

    pub fn match_count(&self) -> usize {
        self.week_of.len()
    }

    /// The week-1 match involving team 1, pinned to period 1 by the model.
    pub fn anchor_match(&self) -> Match {
        let first_week = &self.weeks[0];
        *first_week.iter().find(|m| m.involves(1)).unwrap_or(&first_week[0])
    }
}

/// Generates the weekly matchings for an even `n >= 4`.
pub fn round_robin_weeks(n: usize) -> Result<Vec<Vec<Match>>, TournamentError> {
    if n < 4 || n % 2 != 0 {
        return Err(TournamentError::InvalidTeamCount(n));
    }
    let circle: Vec<Team> = (2..=n as Team).collect();
    let m = circle.len();

    let weeks = (0..m)
        .map(|w| {
            let centre = m - 1 - w;
            let mut pairs = Vec::with_capacity(n / 2);
            pairs.push(Match::new(1, circle[centre]));
            for k in 1..n / 2 {
                let left = circle[(centre + m - k) % m];
                let right = circle[(centre + k) % m];
                pairs.push(Match::new(left, right));
            }
            pairs
        })
        .collect();
    Ok(weeks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use std::collections::HashSet;

    #[test]
    fn four_teams_match_reference_factorization() {
        let weeks = round_robin_weeks(4).unwrap();
        assert_eq!(
            weeks,
            vec![
                vec![Match::new(1, 4), Match::new(2, 3)],
                vec![Match::new(1, 3), Match::new(2, 4)],
                vec![Match::new(1, 2), Match::new(3, 4)],
            ]
        );
    }

    #[test]
    fn every_even_n_is_a_one_factorization() {
        for n in (4..=20).step_by(2) {
            let weeks = round_robin_weeks(n).unwrap();
            assert_eq!(weeks.len(), n - 1, "n={n}");

            for pairs in &weeks {
                assert_eq!(pairs.len(), n / 2, "n={n}");
                let teams: Vec<Team> = pairs.iter().flat_map(|m| [m.first, m.second]).sorted().collect();
                assert_eq!(teams, (1..=n as Team).collect::<Vec<_>>(), "n={n}");
                assert!(pairs.iter().all(|m| m.first < m.second));
            }

            let seen: HashSet<Match> = weeks.iter().flatten().copied().collect();
            assert_eq!(seen.len(), n * (n - 1) / 2, "duplicate pair for n={n}");
            let expected: HashSet<Match> = (1..=n as Team)
                .tuple_combinations()
                .map(|(a, b)| Match::new(a, b))
                .collect();
            assert_eq!(seen, expected, "n={n}");
        }
    }

    #[test]
    fn pairing_is_deterministic_and_indexed() {
        let a = Pairing::new(10).unwrap();
        let b = Pairing::new(10).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.match_count(), 45);
        assert_eq!(a.week_count(), 9);
        assert_eq!(a.period_count(), 5);
        for (w, pairs) in a.weeks().iter().enumerate() {
            for m in pairs {
                assert_eq!(a.week_of(m), Some(w as Week + 1));
            }
        }
        assert_eq!(a.week_of(&Match::new(1, 1)), None);
    }

    #[test]
    fn anchor_is_team_one_in_week_one() {
        for n in (4..=12).step_by(2) {
            let pairing = Pairing::new(n).unwrap();
            let anchor = pairing.anchor_match();
            assert!(anchor.involves(1));
            assert_eq!(pairing.week_of(&anchor), Some(1));
        }
    }

    #[test]
    fn rejects_odd_and_small_team_counts() {
        for n in [0, 1, 2, 3, 5, 7, 11] {
            assert!(matches!(
                round_robin_weeks(n),
                Err(TournamentError::InvalidTeamCount(bad)) if bad == n
            ));
        }
        assert!(Pairing::new(9).is_err());
    }
}

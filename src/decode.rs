use crate::data::{Period, ScheduleGrid};
use crate::pairing::Pairing;
use crate::solver::RawSolution;

const THRESHOLD: f64 = 0.5;

/// Binarized view of a raw solve: the schedule grid and the rounded objective.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSolution {
    pub grid: Option<ScheduleGrid>,
    pub objective: Option<i64>,
}

/// A solve counts as feasible as soon as one match has a period.
pub fn is_feasible(raw: &RawSolution) -> bool {
    raw.y.iter().flatten().any(|&v| v > THRESHOLD)
}

pub fn decode(raw: &RawSolution, pairing: &Pairing) -> DecodedSolution {
    DecodedSolution {
        grid: build_grid(raw, pairing),
        objective: raw.objective.map(|obj| obj.round() as i64),
    }
}

fn build_grid(raw: &RawSolution, pairing: &Pairing) -> Option<ScheduleGrid> {
    if !is_feasible(raw) {
        return None;
    }
    let mut grid: ScheduleGrid = vec![vec![None; pairing.week_count()]; pairing.period_count()];

    for (i, m) in pairing.matches().enumerate() {
        let Some(week) = pairing.week_of(m) else {
            continue;
        };
        // lowest period wins if a degenerate solve placed the match twice
        let Some(period) = raw.y[i].iter().position(|&v| v > THRESHOLD) else {
            continue;
        };
        let first_is_home = raw.h.get(i).is_some_and(|&v| v > THRESHOLD);
        grid[period][week as usize - 1] = Some(m.oriented(first_is_home));
    }
    Some(grid)
}

/// 1-based period of every cell holding `team`, for fairness checks.
#[cfg(test)]
pub fn periods_of(grid: &ScheduleGrid, team: u32) -> Vec<Period> {
    grid.iter()
        .enumerate()
        .flat_map(|(p, row)| {
            row.iter()
                .flatten()
                .filter(move |cell| cell.contains(&team))
                .map(move |_| p as Period + 1)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SolveStatus;

    // y rows follow pairing order for n = 4:
    // (1,4) (2,3) | (1,3) (2,4) | (1,2) (3,4)
    fn four_team_raw() -> RawSolution {
        RawSolution {
            status: SolveStatus::Optimal,
            objective: Some(2.0000001),
            y: vec![
                vec![0.9999, 0.0],
                vec![0.0, 1.0],
                vec![0.0, 1.0],
                vec![1.0, 0.0],
                vec![1.0, 0.0],
                vec![0.0001, 1.0],
            ],
            h: vec![1.0, 0.0, 0.9, 1.0, 0.2, 1.0],
        }
    }

    #[test]
    fn decodes_grid_with_orientation() {
        let pairing = Pairing::new(4).unwrap();
        let decoded = decode(&four_team_raw(), &pairing);
        assert_eq!(decoded.objective, Some(2));
        assert_eq!(
            decoded.grid,
            Some(vec![
                vec![Some([1, 4]), Some([2, 4]), Some([2, 1])],
                vec![Some([3, 2]), Some([1, 3]), Some([3, 4])],
            ])
        );
    }

    #[test]
    fn no_placed_match_means_no_grid() {
        let pairing = Pairing::new(4).unwrap();
        let mut raw = four_team_raw();
        raw.y.iter_mut().flatten().for_each(|v| *v = 0.5);
        raw.objective = Some(3.4);
        assert!(!is_feasible(&raw));
        let decoded = decode(&raw, &pairing);
        assert_eq!(decoded.grid, None);
        assert_eq!(decoded.objective, Some(3));

        let empty = RawSolution::without_values(SolveStatus::Infeasible);
        assert_eq!(
            decode(&empty, &pairing),
            DecodedSolution {
                grid: None,
                objective: None
            }
        );
    }

    #[test]
    fn degenerate_placement_takes_first_period() {
        let pairing = Pairing::new(4).unwrap();
        let mut raw = four_team_raw();
        raw.y[1] = vec![1.0, 1.0];
        let grid = decode(&raw, &pairing).grid.unwrap();
        assert_eq!(grid[0][0], Some([3, 2]));
    }

    #[test]
    fn periods_of_lists_every_appearance() {
        let pairing = Pairing::new(4).unwrap();
        let grid = decode(&four_team_raw(), &pairing).grid.unwrap();
        assert_eq!(periods_of(&grid, 1), vec![1, 1, 2]);
        assert_eq!(periods_of(&grid, 4), vec![1, 1, 2]);
        assert_eq!(periods_of(&grid, 2), vec![1, 1, 2]);
        assert_eq!(periods_of(&grid, 3), vec![2, 2, 2]);
    }
}

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::action::ActionType;
use crate::error::Result;
use crate::stats_db::all_player_ids;
use crate::summary::{PlayerSummary, player_summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankMetric {
    TotalShotAttempts,
    TotalPoints,
    TotalPasses,
    TotalPotentialAssists,
    TotalTurnovers,
    TotalPassingTurnovers,
    PickAndRollCount,
    IsolationCount,
    PostUpCount,
    OffBallScreenCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherBetter,
    LowerBetter,
}

impl Direction {
    /// Strictly better than `target`; equal values never count.
    fn is_ahead(self, value: i64, target: i64) -> bool {
        match self {
            Direction::HigherBetter => value > target,
            Direction::LowerBetter => value < target,
        }
    }
}

impl RankMetric {
    pub const ALL: [RankMetric; 10] = [
        RankMetric::TotalShotAttempts,
        RankMetric::TotalPoints,
        RankMetric::TotalPasses,
        RankMetric::TotalPotentialAssists,
        RankMetric::TotalTurnovers,
        RankMetric::TotalPassingTurnovers,
        RankMetric::PickAndRollCount,
        RankMetric::IsolationCount,
        RankMetric::PostUpCount,
        RankMetric::OffBallScreenCount,
    ];

    /// Only total turnovers ranks fewer-is-better. Passing turnovers keep the
    /// higher-ranks-first ordering the reports have always used.
    pub fn direction(self) -> Direction {
        match self {
            RankMetric::TotalTurnovers => Direction::LowerBetter,
            _ => Direction::HigherBetter,
        }
    }

    pub fn value(self, summary: &PlayerSummary) -> i64 {
        let t = &summary.totals;
        match self {
            RankMetric::TotalShotAttempts => t.total_shot_attempts,
            RankMetric::TotalPoints => t.total_points,
            RankMetric::TotalPasses => t.total_passes,
            RankMetric::TotalPotentialAssists => t.total_potential_assists,
            RankMetric::TotalTurnovers => t.total_turnovers,
            RankMetric::TotalPassingTurnovers => t.total_passing_turnovers,
            RankMetric::PickAndRollCount => summary.count(ActionType::PickAndRoll),
            RankMetric::IsolationCount => summary.count(ActionType::Isolation),
            RankMetric::PostUpCount => summary.count(ActionType::PostUp),
            RankMetric::OffBallScreenCount => summary.count(ActionType::OffBallScreen),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RankMetric::TotalShotAttempts => "Shot Attempts",
            RankMetric::TotalPoints => "Points",
            RankMetric::TotalPasses => "Passes",
            RankMetric::TotalPotentialAssists => "Potential Assists",
            RankMetric::TotalTurnovers => "Turnovers",
            RankMetric::TotalPassingTurnovers => "Passing Turnovers",
            RankMetric::PickAndRollCount => "Pick & Roll",
            RankMetric::IsolationCount => "Isolation",
            RankMetric::PostUpCount => "Post-up",
            RankMetric::OffBallScreenCount => "Off-Ball Screen",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRanks {
    pub total_shot_attempts_rank: u32,
    pub total_points_rank: u32,
    pub total_passes_rank: u32,
    pub total_potential_assists_rank: u32,
    pub total_turnovers_rank: u32,
    pub total_passing_turnovers_rank: u32,
    pub pick_and_roll_count_rank: u32,
    pub isolation_count_rank: u32,
    pub post_up_count_rank: u32,
    pub off_ball_screen_count_rank: u32,
}

impl PlayerRanks {
    fn all_first() -> Self {
        Self {
            total_shot_attempts_rank: 1,
            total_points_rank: 1,
            total_passes_rank: 1,
            total_potential_assists_rank: 1,
            total_turnovers_rank: 1,
            total_passing_turnovers_rank: 1,
            pick_and_roll_count_rank: 1,
            isolation_count_rank: 1,
            post_up_count_rank: 1,
            off_ball_screen_count_rank: 1,
        }
    }

    pub fn get(&self, metric: RankMetric) -> u32 {
        match metric {
            RankMetric::TotalShotAttempts => self.total_shot_attempts_rank,
            RankMetric::TotalPoints => self.total_points_rank,
            RankMetric::TotalPasses => self.total_passes_rank,
            RankMetric::TotalPotentialAssists => self.total_potential_assists_rank,
            RankMetric::TotalTurnovers => self.total_turnovers_rank,
            RankMetric::TotalPassingTurnovers => self.total_passing_turnovers_rank,
            RankMetric::PickAndRollCount => self.pick_and_roll_count_rank,
            RankMetric::IsolationCount => self.isolation_count_rank,
            RankMetric::PostUpCount => self.post_up_count_rank,
            RankMetric::OffBallScreenCount => self.off_ball_screen_count_rank,
        }
    }

    fn slot_mut(&mut self, metric: RankMetric) -> &mut u32 {
        match metric {
            RankMetric::TotalShotAttempts => &mut self.total_shot_attempts_rank,
            RankMetric::TotalPoints => &mut self.total_points_rank,
            RankMetric::TotalPasses => &mut self.total_passes_rank,
            RankMetric::TotalPotentialAssists => &mut self.total_potential_assists_rank,
            RankMetric::TotalTurnovers => &mut self.total_turnovers_rank,
            RankMetric::TotalPassingTurnovers => &mut self.total_passing_turnovers_rank,
            RankMetric::PickAndRollCount => &mut self.pick_and_roll_count_rank,
            RankMetric::IsolationCount => &mut self.isolation_count_rank,
            RankMetric::PostUpCount => &mut self.post_up_count_rank,
            RankMetric::OffBallScreenCount => &mut self.off_ball_screen_count_rank,
        }
    }
}

/// One player's summary with the ranks computed against the same snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerReport {
    pub summary: PlayerSummary,
    pub ranks: PlayerRanks,
}

/// Competition ranking: 1 + number of summaries strictly ahead of `target`.
/// `population` may include `target` itself; it never moves its own rank.
pub fn compute_ranks(target: &PlayerSummary, population: &[PlayerSummary]) -> PlayerRanks {
    let mut ranks = PlayerRanks::all_first();
    for other in population {
        for metric in RankMetric::ALL {
            if metric
                .direction()
                .is_ahead(metric.value(other), metric.value(target))
            {
                *ranks.slot_mut(metric) += 1;
            }
        }
    }
    ranks
}

/// Rank one player against every player currently in the store.
///
/// Rebuilds every summary on each call; use [`rank_all_players`] when ranks
/// for many players are needed at once.
pub fn player_ranks(
    conn: &Connection,
    player_id: i64,
    summary: &PlayerSummary,
) -> Result<PlayerRanks> {
    let population = all_player_summaries(conn)?;
    let ranks = compute_ranks(summary, &population);
    tracing::debug!(player_id, population = population.len(), "computed player ranks");
    Ok(ranks)
}

pub fn all_player_summaries(conn: &Connection) -> Result<Vec<PlayerSummary>> {
    let ids = all_player_ids(conn)?;
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        out.push(player_summary(conn, id)?);
    }
    Ok(out)
}

/// Summaries and ranks for every player from a single pass over the store.
pub fn rank_all_players(conn: &Connection) -> Result<Vec<PlayerReport>> {
    let summaries = all_player_summaries(conn)?;
    let reports = summaries
        .iter()
        .map(|s| PlayerReport {
            ranks: compute_ranks(s, &summaries),
            summary: s.clone(),
        })
        .collect::<Vec<_>>();
    tracing::info!(players = reports.len(), "ranked all players");
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{ActionSection, EventTotals};

    fn empty_section() -> ActionSection {
        ActionSection {
            totals: EventTotals::default(),
            shots: Vec::new(),
            passes: Vec::new(),
            turnovers: Vec::new(),
        }
    }

    fn summary(id: i64, totals: EventTotals) -> PlayerSummary {
        PlayerSummary {
            name: format!("P{id}"),
            player_id: id,
            totals,
            pick_and_roll_count: 0,
            isolation_count: 0,
            post_up_count: 0,
            off_ball_screen_count: 0,
            pick_and_roll: empty_section(),
            isolation: empty_section(),
            post_up: empty_section(),
            off_ball_screen: empty_section(),
        }
    }

    fn with_points(id: i64, points: i64) -> PlayerSummary {
        summary(
            id,
            EventTotals {
                total_points: points,
                ..EventTotals::default()
            },
        )
    }

    #[test]
    fn ties_share_the_best_rank() {
        let pop = vec![with_points(1, 10), with_points(2, 20), with_points(3, 20)];
        assert_eq!(compute_ranks(&pop[0], &pop).total_points_rank, 3);
        assert_eq!(compute_ranks(&pop[1], &pop).total_points_rank, 1);
        assert_eq!(compute_ranks(&pop[2], &pop).total_points_rank, 1);
    }

    #[test]
    fn self_exclusion_does_not_change_ranks() {
        let pop = vec![with_points(1, 10), with_points(2, 20), with_points(3, 20)];
        for (idx, target) in pop.iter().enumerate() {
            let others = pop
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != idx)
                .map(|(_, s)| s.clone())
                .collect::<Vec<_>>();
            assert_eq!(compute_ranks(target, &pop), compute_ranks(target, &others));
        }
    }

    #[test]
    fn fewest_turnovers_ranks_first() {
        let mk = |id, tov, ptov| {
            summary(
                id,
                EventTotals {
                    total_turnovers: tov,
                    total_passing_turnovers: ptov,
                    ..EventTotals::default()
                },
            )
        };
        let pop = vec![mk(1, 1, 1), mk(2, 4, 3), mk(3, 2, 0)];
        let r1 = compute_ranks(&pop[0], &pop);
        let r2 = compute_ranks(&pop[1], &pop);
        assert_eq!(r1.total_turnovers_rank, 1);
        assert_eq!(r2.total_turnovers_rank, 3);
        // Passing turnovers keep the higher-first ordering.
        assert_eq!(r2.total_passing_turnovers_rank, 1);
        assert_eq!(r1.total_passing_turnovers_rank, 2);
    }

    #[test]
    fn empty_population_ranks_first() {
        let target = with_points(1, 5);
        let ranks = compute_ranks(&target, &[]);
        for metric in RankMetric::ALL {
            assert_eq!(ranks.get(metric), 1);
        }
    }

    #[test]
    fn serializes_rank_keys() {
        let pop = vec![with_points(1, 1)];
        let value = serde_json::to_value(compute_ranks(&pop[0], &pop)).unwrap();
        for key in [
            "totalShotAttemptsRank",
            "totalPointsRank",
            "totalPassesRank",
            "totalPotentialAssistsRank",
            "totalTurnoversRank",
            "totalPassingTurnoversRank",
            "pickAndRollCountRank",
            "isolationCountRank",
            "postUpCountRank",
            "offBallScreenCountRank",
        ] {
            assert_eq!(value[key], 1, "key {key}");
        }
    }
}

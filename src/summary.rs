use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

use crate::action::ActionType;
use crate::error::{Result, StatsError};

/// Counting totals shared by the whole-player summary and each action section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTotals {
    pub total_shot_attempts: i64,
    pub total_points: i64,
    pub total_passes: i64,
    pub total_potential_assists: i64,
    pub total_turnovers: i64,
    pub total_passing_turnovers: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotRecord {
    pub loc: [f64; 2],
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassRecord {
    pub start_loc: [f64; 2],
    pub end_loc: [f64; 2],
    pub is_completed: bool,
    pub is_potential_assist: bool,
    /// A turnover by the same player points back at this pass.
    pub is_turnover: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnoverRecord {
    pub loc: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSection {
    #[serde(flatten)]
    pub totals: EventTotals,
    pub shots: Vec<ShotRecord>,
    pub passes: Vec<PassRecord>,
    pub turnovers: Vec<TurnoverRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub name: String,
    #[serde(rename = "playerID")]
    pub player_id: i64,
    #[serde(flatten)]
    pub totals: EventTotals,
    pub pick_and_roll_count: i64,
    pub isolation_count: i64,
    pub post_up_count: i64,
    pub off_ball_screen_count: i64,
    pub pick_and_roll: ActionSection,
    pub isolation: ActionSection,
    pub post_up: ActionSection,
    pub off_ball_screen: ActionSection,
}

impl PlayerSummary {
    /// Shots plus passes recorded under `action`.
    pub fn count(&self, action: ActionType) -> i64 {
        match action {
            ActionType::PickAndRoll => self.pick_and_roll_count,
            ActionType::Isolation => self.isolation_count,
            ActionType::PostUp => self.post_up_count,
            ActionType::OffBallScreen => self.off_ball_screen_count,
        }
    }

    pub fn section(&self, action: ActionType) -> &ActionSection {
        match action {
            ActionType::PickAndRoll => &self.pick_and_roll,
            ActionType::Isolation => &self.isolation,
            ActionType::PostUp => &self.post_up,
            ActionType::OffBallScreen => &self.off_ball_screen,
        }
    }

    pub fn sections(&self) -> impl Iterator<Item = (ActionType, &ActionSection)> {
        ActionType::ALL.into_iter().map(|a| (a, self.section(a)))
    }
}

/// Build the full summary for one player straight from the event tables.
pub fn player_summary(conn: &Connection, player_id: i64) -> Result<PlayerSummary> {
    let name = conn
        .query_row(
            "SELECT name FROM players WHERE player_id = ?1",
            params![player_id],
            |row| row.get::<_, String>(0),
        )
        .optional()?
        .ok_or(StatsError::PlayerNotFound(player_id))?;

    let totals = event_totals(conn, player_id, None)?;

    let pick_and_roll = action_section(conn, player_id, ActionType::PickAndRoll)?;
    let isolation = action_section(conn, player_id, ActionType::Isolation)?;
    let post_up = action_section(conn, player_id, ActionType::PostUp)?;
    let off_ball_screen = action_section(conn, player_id, ActionType::OffBallScreen)?;

    tracing::debug!(player_id, shots = totals.total_shot_attempts, "built player summary");

    Ok(PlayerSummary {
        name,
        player_id,
        totals,
        pick_and_roll_count: action_count(&pick_and_roll),
        isolation_count: action_count(&isolation),
        post_up_count: action_count(&post_up),
        off_ball_screen_count: action_count(&off_ball_screen),
        pick_and_roll,
        isolation,
        post_up,
        off_ball_screen,
    })
}

fn action_count(section: &ActionSection) -> i64 {
    section.totals.total_shot_attempts + section.totals.total_passes
}

/// Totals for a player, optionally scoped to one action type. Rows with an
/// action type outside the closed set only show up in the unscoped totals.
pub fn event_totals(
    conn: &Connection,
    player_id: i64,
    action: Option<ActionType>,
) -> Result<EventTotals> {
    let action = action.map(ActionType::as_str);

    let (total_shot_attempts, total_points) = conn.query_row(
        r#"
        SELECT COUNT(*), COALESCE(SUM(points), 0)
        FROM shots
        WHERE player_id = ?1 AND (?2 IS NULL OR action_type = ?2)
        "#,
        params![player_id, action],
        |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
    )?;

    let (total_passes, total_potential_assists) = conn.query_row(
        r#"
        SELECT COUNT(*), COALESCE(SUM(CASE WHEN potential_assist THEN 1 ELSE 0 END), 0)
        FROM passes
        WHERE player_id = ?1 AND (?2 IS NULL OR action_type = ?2)
        "#,
        params![player_id, action],
        |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
    )?;

    // COUNT(pass_id) skips NULLs, leaving only pass-caused turnovers.
    let (total_turnovers, total_passing_turnovers) = conn.query_row(
        r#"
        SELECT COUNT(*), COUNT(pass_id)
        FROM turnovers
        WHERE player_id = ?1 AND (?2 IS NULL OR action_type = ?2)
        "#,
        params![player_id, action],
        |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
    )?;

    Ok(EventTotals {
        total_shot_attempts,
        total_points,
        total_passes,
        total_potential_assists,
        total_turnovers,
        total_passing_turnovers,
    })
}

fn action_section(conn: &Connection, player_id: i64, action: ActionType) -> Result<ActionSection> {
    let totals = event_totals(conn, player_id, Some(action))?;
    Ok(ActionSection {
        totals,
        shots: load_shots(conn, player_id, action)?,
        passes: load_passes(conn, player_id, action)?,
        turnovers: load_turnovers(conn, player_id, action)?,
    })
}

fn load_shots(conn: &Connection, player_id: i64, action: ActionType) -> Result<Vec<ShotRecord>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT shot_loc_x, shot_loc_y, points
        FROM shots
        WHERE player_id = ?1 AND action_type = ?2
        ORDER BY shot_id
        "#,
    )?;
    let rows = stmt.query_map(params![player_id, action.as_str()], |row| {
        Ok(ShotRecord {
            loc: [row.get(0)?, row.get(1)?],
            points: row.get(2)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn load_passes(conn: &Connection, player_id: i64, action: ActionType) -> Result<Vec<PassRecord>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT
            p.ball_start_loc_x, p.ball_start_loc_y,
            p.ball_end_loc_x, p.ball_end_loc_y,
            p.completed_pass, p.potential_assist,
            EXISTS (
                SELECT 1
                FROM turnovers t
                WHERE t.pass_id = p.pass_id
                  AND t.player_id = p.player_id
            ) AS is_turnover
        FROM passes p
        WHERE p.player_id = ?1 AND p.action_type = ?2
        ORDER BY p.pass_id
        "#,
    )?;
    let rows = stmt.query_map(params![player_id, action.as_str()], |row| {
        Ok(PassRecord {
            start_loc: [row.get(0)?, row.get(1)?],
            end_loc: [row.get(2)?, row.get(3)?],
            is_completed: row.get(4)?,
            is_potential_assist: row.get(5)?,
            is_turnover: row.get(6)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn load_turnovers(
    conn: &Connection,
    player_id: i64,
    action: ActionType,
) -> Result<Vec<TurnoverRecord>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT tov_loc_x, tov_loc_y
        FROM turnovers
        WHERE player_id = ?1 AND action_type = ?2
        ORDER BY turnover_id
        "#,
    )?;
    let rows = stmt.query_map(params![player_id, action.as_str()], |row| {
        Ok(TurnoverRecord {
            loc: [row.get(0)?, row.get(1)?],
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

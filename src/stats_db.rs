use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::error::StatsError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRow {
    pub player_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotRow {
    pub shot_id: i64,
    pub player_id: i64,
    pub action_type: String,
    pub shot_loc_x: f64,
    pub shot_loc_y: f64,
    pub points: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassRow {
    pub pass_id: i64,
    pub player_id: i64,
    pub action_type: String,
    pub ball_start_loc_x: f64,
    pub ball_start_loc_y: f64,
    pub ball_end_loc_x: f64,
    pub ball_end_loc_y: f64,
    pub completed_pass: bool,
    pub potential_assist: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnoverRow {
    pub turnover_id: i64,
    pub player_id: i64,
    pub action_type: String,
    pub tov_loc_x: f64,
    pub tov_loc_y: f64,
    /// Pass that caused the turnover, if any.
    #[serde(default)]
    pub pass_id: Option<i64>,
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    conn.execute_batch("PRAGMA journal_mode = WAL;")
        .context("enable wal journal")?;
    init_schema(&conn)?;
    Ok(conn)
}

/// In-memory store with the schema applied, for tests and benches.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("open in-memory sqlite db")?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS players (
            player_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS shots (
            shot_id INTEGER PRIMARY KEY,
            player_id INTEGER NOT NULL,
            action_type TEXT NOT NULL,
            shot_loc_x REAL NOT NULL,
            shot_loc_y REAL NOT NULL,
            points INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_shots_player ON shots(player_id, action_type);

        CREATE TABLE IF NOT EXISTS passes (
            pass_id INTEGER PRIMARY KEY,
            player_id INTEGER NOT NULL,
            action_type TEXT NOT NULL,
            ball_start_loc_x REAL NOT NULL,
            ball_start_loc_y REAL NOT NULL,
            ball_end_loc_x REAL NOT NULL,
            ball_end_loc_y REAL NOT NULL,
            completed_pass INTEGER NOT NULL,
            potential_assist INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_passes_player ON passes(player_id, action_type);

        CREATE TABLE IF NOT EXISTS turnovers (
            turnover_id INTEGER PRIMARY KEY,
            player_id INTEGER NOT NULL,
            action_type TEXT NOT NULL,
            tov_loc_x REAL NOT NULL,
            tov_loc_y REAL NOT NULL,
            pass_id INTEGER NULL
        );
        CREATE INDEX IF NOT EXISTS idx_turnovers_player ON turnovers(player_id, action_type);
        CREATE INDEX IF NOT EXISTS idx_turnovers_pass ON turnovers(pass_id);

        CREATE TABLE IF NOT EXISTS ingest_runs (
            run_id INTEGER PRIMARY KEY AUTOINCREMENT,
            started_at TEXT NOT NULL,
            finished_at TEXT NULL,
            source TEXT NOT NULL,
            players_upserted INTEGER NOT NULL,
            events_upserted INTEGER NOT NULL,
            skipped INTEGER NOT NULL
        );
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

/// Every player id in the store, ascending.
pub fn all_player_ids(conn: &Connection) -> Result<Vec<i64>, StatsError> {
    let mut stmt = conn.prepare("SELECT player_id FROM players ORDER BY player_id")?;
    let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn player_exists(conn: &Connection, player_id: i64) -> Result<bool, StatsError> {
    let found = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM players WHERE player_id = ?1)",
        params![player_id],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(found)
}

pub fn upsert_player(conn: &Connection, p: &PlayerRow) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO players (player_id, name) VALUES (?1, ?2)
        ON CONFLICT(player_id) DO UPDATE SET name = excluded.name
        "#,
        params![p.player_id, p.name],
    )
    .context("upsert player")?;
    Ok(())
}

pub fn upsert_shot(conn: &Connection, s: &ShotRow) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO shots (shot_id, player_id, action_type, shot_loc_x, shot_loc_y, points)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT(shot_id) DO UPDATE SET
            player_id = excluded.player_id,
            action_type = excluded.action_type,
            shot_loc_x = excluded.shot_loc_x,
            shot_loc_y = excluded.shot_loc_y,
            points = excluded.points
        "#,
        params![
            s.shot_id,
            s.player_id,
            s.action_type,
            s.shot_loc_x,
            s.shot_loc_y,
            s.points
        ],
    )
    .context("upsert shot")?;
    Ok(())
}

pub fn upsert_pass(conn: &Connection, p: &PassRow) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO passes (
            pass_id, player_id, action_type,
            ball_start_loc_x, ball_start_loc_y, ball_end_loc_x, ball_end_loc_y,
            completed_pass, potential_assist
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        ON CONFLICT(pass_id) DO UPDATE SET
            player_id = excluded.player_id,
            action_type = excluded.action_type,
            ball_start_loc_x = excluded.ball_start_loc_x,
            ball_start_loc_y = excluded.ball_start_loc_y,
            ball_end_loc_x = excluded.ball_end_loc_x,
            ball_end_loc_y = excluded.ball_end_loc_y,
            completed_pass = excluded.completed_pass,
            potential_assist = excluded.potential_assist
        "#,
        params![
            p.pass_id,
            p.player_id,
            p.action_type,
            p.ball_start_loc_x,
            p.ball_start_loc_y,
            p.ball_end_loc_x,
            p.ball_end_loc_y,
            bool_to_i64(p.completed_pass),
            bool_to_i64(p.potential_assist),
        ],
    )
    .context("upsert pass")?;
    Ok(())
}

pub fn upsert_turnover(conn: &Connection, t: &TurnoverRow) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO turnovers (turnover_id, player_id, action_type, tov_loc_x, tov_loc_y, pass_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT(turnover_id) DO UPDATE SET
            player_id = excluded.player_id,
            action_type = excluded.action_type,
            tov_loc_x = excluded.tov_loc_x,
            tov_loc_y = excluded.tov_loc_y,
            pass_id = excluded.pass_id
        "#,
        params![
            t.turnover_id,
            t.player_id,
            t.action_type,
            t.tov_loc_x,
            t.tov_loc_y,
            t.pass_id
        ],
    )
    .context("upsert turnover")?;
    Ok(())
}

fn bool_to_i64(v: bool) -> i64 {
    if v { 1 } else { 0 }
}

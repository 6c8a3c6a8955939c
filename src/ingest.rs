use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::action::ActionType;
use crate::stats_db::{
    PassRow, PlayerRow, ShotRow, TurnoverRow, all_player_ids, upsert_pass, upsert_player,
    upsert_shot, upsert_turnover,
};

/// Raw event tables as exchanged in JSON dumps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDataset {
    #[serde(default)]
    pub players: Vec<PlayerRow>,
    #[serde(default)]
    pub shots: Vec<ShotRow>,
    #[serde(default)]
    pub passes: Vec<PassRow>,
    #[serde(default)]
    pub turnovers: Vec<TurnoverRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub players_upserted: usize,
    pub shots_upserted: usize,
    pub passes_upserted: usize,
    pub turnovers_upserted: usize,
    /// Events whose player is in neither the dataset nor the store.
    pub skipped: usize,
    /// Stored events tagged with an action type outside the closed set.
    pub unlisted_action_types: usize,
}

impl IngestSummary {
    pub fn events_upserted(&self) -> usize {
        self.shots_upserted + self.passes_upserted + self.turnovers_upserted
    }
}

pub fn parse_dataset_json(raw: &str) -> Result<EventDataset> {
    serde_json::from_str::<EventDataset>(raw.trim()).context("invalid event dataset json")
}

/// Upsert the dataset in one transaction and record an `ingest_runs` row.
pub fn ingest_dataset(
    conn: &mut Connection,
    source: &str,
    dataset: &EventDataset,
) -> Result<IngestSummary> {
    let started_at = Utc::now().to_rfc3339();
    let mut summary = IngestSummary::default();

    let tx = conn.transaction().context("begin ingest transaction")?;
    for player in &dataset.players {
        upsert_player(&tx, player)?;
        summary.players_upserted += 1;
    }

    let known: HashSet<i64> = all_player_ids(&tx)
        .context("load known player ids")?
        .into_iter()
        .collect();

    for shot in &dataset.shots {
        if !accept_event(&known, shot.player_id, "shot", shot.shot_id, &mut summary) {
            continue;
        }
        note_action_type(&shot.action_type, &mut summary);
        upsert_shot(&tx, shot)?;
        summary.shots_upserted += 1;
    }
    for pass in &dataset.passes {
        if !accept_event(&known, pass.player_id, "pass", pass.pass_id, &mut summary) {
            continue;
        }
        note_action_type(&pass.action_type, &mut summary);
        upsert_pass(&tx, pass)?;
        summary.passes_upserted += 1;
    }
    for tov in &dataset.turnovers {
        if !accept_event(&known, tov.player_id, "turnover", tov.turnover_id, &mut summary) {
            continue;
        }
        note_action_type(&tov.action_type, &mut summary);
        upsert_turnover(&tx, tov)?;
        summary.turnovers_upserted += 1;
    }

    tx.execute(
        "INSERT INTO ingest_runs(started_at, finished_at, source, players_upserted, events_upserted, skipped)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            started_at,
            Utc::now().to_rfc3339(),
            source,
            summary.players_upserted as i64,
            summary.events_upserted() as i64,
            summary.skipped as i64,
        ],
    )
    .context("insert ingest run")?;
    tx.commit().context("commit ingest transaction")?;

    if summary.unlisted_action_types > 0 {
        tracing::warn!(
            count = summary.unlisted_action_types,
            "events with unlisted action types only count toward overall totals"
        );
    }
    tracing::info!(
        source,
        players = summary.players_upserted,
        events = summary.events_upserted(),
        skipped = summary.skipped,
        "ingest complete"
    );
    Ok(summary)
}

fn accept_event(
    known: &HashSet<i64>,
    player_id: i64,
    kind: &str,
    event_id: i64,
    summary: &mut IngestSummary,
) -> bool {
    if known.contains(&player_id) {
        return true;
    }
    tracing::warn!(kind, event_id, player_id, "skipping event for unknown player");
    summary.skipped += 1;
    false
}

fn note_action_type(raw: &str, summary: &mut IngestSummary) {
    if raw.parse::<ActionType>().is_err() {
        summary.unlisted_action_types += 1;
    }
}

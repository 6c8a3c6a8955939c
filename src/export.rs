use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::action::ActionType;
use crate::ranks::{PlayerReport, RankMetric};

pub struct ExportReport {
    pub players: usize,
    pub action_rows: usize,
}

/// Write reports as pretty JSON, swapping in a temp file so readers never
/// see a half-written report.
pub fn write_reports_json(path: &Path, reports: &[PlayerReport]) -> Result<()> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(reports).context("serialize player reports")?;
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap in {}", path.display()))?;
    tracing::info!(players = reports.len(), path = %path.display(), "wrote json reports");
    Ok(())
}

pub fn export_reports_xlsx(path: &Path, reports: &[PlayerReport]) -> Result<ExportReport> {
    let mut summary_rows = vec![
        [
            "Player ID",
            "Player",
            "Shot Attempts",
            "Points",
            "Passes",
            "Potential Assists",
            "Turnovers",
            "Passing Turnovers",
        ]
        .iter()
        .map(|s| s.to_string())
        .chain(ActionType::ALL.iter().map(|a| a.label().to_string()))
        .collect::<Vec<_>>(),
    ];

    let mut rank_rows = vec![
        ["Player ID", "Player"]
            .iter()
            .map(|s| s.to_string())
            .chain(RankMetric::ALL.iter().map(|m| m.label().to_string()))
            .collect::<Vec<_>>(),
    ];

    let mut action_rows = vec![vec![
        "Player ID".to_string(),
        "Player".to_string(),
        "Action".to_string(),
        "Shot Attempts".to_string(),
        "Points".to_string(),
        "Passes".to_string(),
        "Potential Assists".to_string(),
        "Turnovers".to_string(),
        "Passing Turnovers".to_string(),
        "Pass Turnovers Flagged".to_string(),
    ]];

    for report in reports {
        let s = &report.summary;
        let mut row = vec![
            s.player_id.to_string(),
            s.name.clone(),
            s.totals.total_shot_attempts.to_string(),
            s.totals.total_points.to_string(),
            s.totals.total_passes.to_string(),
            s.totals.total_potential_assists.to_string(),
            s.totals.total_turnovers.to_string(),
            s.totals.total_passing_turnovers.to_string(),
        ];
        row.extend(ActionType::ALL.iter().map(|a| s.count(*a).to_string()));
        summary_rows.push(row);

        let mut row = vec![s.player_id.to_string(), s.name.clone()];
        row.extend(
            RankMetric::ALL
                .iter()
                .map(|m| report.ranks.get(*m).to_string()),
        );
        rank_rows.push(row);

        for (action, section) in s.sections() {
            let flagged = section.passes.iter().filter(|p| p.is_turnover).count();
            action_rows.push(vec![
                s.player_id.to_string(),
                s.name.clone(),
                action.label().to_string(),
                section.totals.total_shot_attempts.to_string(),
                section.totals.total_points.to_string(),
                section.totals.total_passes.to_string(),
                section.totals.total_potential_assists.to_string(),
                section.totals.total_turnovers.to_string(),
                section.totals.total_passing_turnovers.to_string(),
                flagged.to_string(),
            ]);
        }
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Summary")?;
        write_rows(sheet, &summary_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Ranks")?;
        write_rows(sheet, &rank_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Actions")?;
        write_rows(sheet, &action_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    tracing::info!(players = reports.len(), path = %path.display(), "wrote xlsx reports");
    Ok(ExportReport {
        players: summary_rows.len().saturating_sub(1),
        action_rows: action_rows.len().saturating_sub(1),
    })
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

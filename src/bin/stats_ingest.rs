use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use hoops_stats::config::{self, StatsConfig, flag_value};
use hoops_stats::ingest;
use hoops_stats::stats_db;

fn main() -> Result<()> {
    config::load_dotenv();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let config = StatsConfig::from_env().with_args(&args);
    config::init_tracing(&config);

    let dataset_path = flag_value(&args, "--dataset")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("usage: stats_ingest --dataset <events.json> [--db <path>]"))?;
    let db_path = config
        .db_path
        .clone()
        .context("unable to resolve sqlite path")?;

    let raw = fs::read_to_string(&dataset_path)
        .with_context(|| format!("read dataset {}", dataset_path.display()))?;
    let dataset = ingest::parse_dataset_json(&raw)?;

    let mut conn = stats_db::open_db(&db_path)?;
    let source = dataset_path.display().to_string();
    let summary = ingest::ingest_dataset(&mut conn, &source, &dataset)?;

    println!("Event ingest complete");
    println!("DB: {}", db_path.display());
    println!("Players upserted: {}", summary.players_upserted);
    println!(
        "Events upserted: {} (shots {}, passes {}, turnovers {})",
        summary.events_upserted(),
        summary.shots_upserted,
        summary.passes_upserted,
        summary.turnovers_upserted
    );
    if summary.skipped > 0 {
        println!("Skipped (unknown player): {}", summary.skipped);
    }
    if summary.unlisted_action_types > 0 {
        println!(
            "Unlisted action types (overall totals only): {}",
            summary.unlisted_action_types
        );
    }
    Ok(())
}

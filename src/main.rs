use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use serde::Serialize;

use hoops_stats::config::{self, StatsConfig, flag_value};
use hoops_stats::export::{export_reports_xlsx, write_reports_json};
use hoops_stats::ranks::{PlayerReport, player_ranks, rank_all_players};
use hoops_stats::stats_db::{self, all_player_ids};
use hoops_stats::summary::player_summary;

const USAGE: &str = "usage: hoops_stats [--db <path>] <ids | summary <id> | ranks <id> | report <id> | export [--json <path>] [--xlsx <path>]>";

/// Flags that consume the following argument.
const VALUE_FLAGS: &[&str] = &["--db", "--json", "--xlsx"];

fn main() -> ExitCode {
    config::load_dotenv();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let config = StatsConfig::from_env().with_args(&args);
    config::init_tracing(&config);

    match run(&config, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &StatsConfig, args: &[String]) -> Result<()> {
    let positional = positional_args(args);
    let Some(command) = positional.first() else {
        return Err(anyhow!(USAGE));
    };

    let db_path = config
        .db_path
        .clone()
        .context("unable to resolve sqlite path (set HOOPS_DB_PATH or pass --db)")?;
    let conn = stats_db::open_db(&db_path)?;

    match command.as_str() {
        "ids" => print_json(&all_player_ids(&conn)?),
        "summary" => {
            let id = player_id_arg(&positional)?;
            print_json(&player_summary(&conn, id)?)
        }
        "ranks" => {
            let id = player_id_arg(&positional)?;
            let summary = player_summary(&conn, id)?;
            print_json(&player_ranks(&conn, id, &summary)?)
        }
        "report" => {
            let id = player_id_arg(&positional)?;
            print_json(&single_report(&conn, id)?)
        }
        "export" => export(config, &conn, args),
        other => Err(anyhow!("unknown command {other:?}\n{USAGE}")),
    }
}

fn single_report(conn: &Connection, player_id: i64) -> Result<PlayerReport> {
    let summary = player_summary(conn, player_id)?;
    let ranks = player_ranks(conn, player_id, &summary)?;
    Ok(PlayerReport { summary, ranks })
}

fn export(config: &StatsConfig, conn: &Connection, args: &[String]) -> Result<()> {
    let json_path = flag_value(args, "--json").map(PathBuf::from);
    let xlsx_path = flag_value(args, "--xlsx").map(PathBuf::from);
    let (json_path, xlsx_path) = if json_path.is_none() && xlsx_path.is_none() {
        (Some(config.export_dir.join("player_reports.json")), None)
    } else {
        (json_path, xlsx_path)
    };

    let reports = rank_all_players(conn)?;
    if let Some(path) = json_path {
        write_reports_json(&path, &reports)?;
        println!("JSON: {} ({} players)", path.display(), reports.len());
    }
    if let Some(path) = xlsx_path {
        let report = export_reports_xlsx(&path, &reports)?;
        println!(
            "XLSX: {} ({} players, {} action rows)",
            path.display(),
            report.players,
            report.action_rows
        );
    }
    Ok(())
}

fn player_id_arg(positional: &[String]) -> Result<i64> {
    let raw = positional
        .get(1)
        .ok_or_else(|| anyhow!("missing player id\n{USAGE}"))?;
    raw.trim()
        .parse::<i64>()
        .with_context(|| format!("invalid player id {raw:?}"))
}

fn positional_args(args: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
            continue;
        }
        if arg.starts_with("--") {
            continue;
        }
        out.push(arg.clone());
    }
    out
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{json}");
    Ok(())
}

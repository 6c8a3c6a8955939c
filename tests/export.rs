use std::fs;
use std::path::PathBuf;

use hoops_stats::export::{export_reports_xlsx, write_reports_json};
use hoops_stats::ingest::{ingest_dataset, parse_dataset_json};
use hoops_stats::ranks::{PlayerReport, rank_all_players};
use hoops_stats::stats_db::open_in_memory;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_reports() -> Vec<PlayerReport> {
    let mut conn = open_in_memory().expect("in-memory store");
    let dataset = parse_dataset_json(&read_fixture("events_small.json")).expect("fixture should parse");
    ingest_dataset(&mut conn, "events_small.json", &dataset).expect("ingest");
    rank_all_players(&conn).expect("rank all players")
}

#[test]
fn json_reports_round_trip_from_disk() {
    let reports = fixture_reports();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("reports.json");

    write_reports_json(&path, &reports).unwrap();
    assert!(!path.with_extension("json.tmp").exists());

    let raw = fs::read_to_string(&path).unwrap();
    let back: Vec<PlayerReport> = serde_json::from_str(&raw).unwrap();
    assert_eq!(back, reports);
}

#[test]
fn xlsx_export_counts_rows() {
    let reports = fixture_reports();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reports.xlsx");

    let report = export_reports_xlsx(&path, &reports).unwrap();
    assert_eq!(report.players, 3);
    assert_eq!(report.action_rows, 12);
    assert!(fs::metadata(&path).unwrap().len() > 0);
}

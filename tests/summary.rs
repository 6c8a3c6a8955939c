use std::fs;
use std::path::PathBuf;

use rusqlite::Connection;

use hoops_stats::ingest::{ingest_dataset, parse_dataset_json};
use hoops_stats::stats_db::{all_player_ids, open_in_memory};
use hoops_stats::summary::{PassRecord, ShotRecord, TurnoverRecord, player_summary};
use hoops_stats::{ActionType, StatsError};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn seeded_store() -> Connection {
    let mut conn = open_in_memory().expect("in-memory store");
    let dataset = parse_dataset_json(&read_fixture("events_small.json")).expect("fixture should parse");
    let summary = ingest_dataset(&mut conn, "events_small.json", &dataset).expect("ingest");
    assert_eq!(summary.skipped, 1);
    conn
}

#[test]
fn ids_are_listed_ascending() {
    let conn = seeded_store();
    assert_eq!(all_player_ids(&conn).unwrap(), vec![1, 2, 3]);
}

#[test]
fn unknown_player_is_not_found() {
    let conn = seeded_store();
    let err = player_summary(&conn, 42).unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, StatsError::PlayerNotFound(42)));
}

#[test]
fn overall_totals() {
    let conn = seeded_store();
    let alpha = player_summary(&conn, 1).unwrap();
    assert_eq!(alpha.name, "Alpha First");
    assert_eq!(alpha.player_id, 1);
    assert_eq!(alpha.totals.total_shot_attempts, 4);
    assert_eq!(alpha.totals.total_points, 7);
    assert_eq!(alpha.totals.total_passes, 3);
    assert_eq!(alpha.totals.total_potential_assists, 2);
    assert_eq!(alpha.totals.total_turnovers, 2);
    assert_eq!(alpha.totals.total_passing_turnovers, 1);

    let charlie = player_summary(&conn, 3).unwrap();
    assert_eq!(charlie.totals.total_shot_attempts, 0);
    assert_eq!(charlie.totals.total_points, 0);
    assert_eq!(charlie.totals.total_turnovers, 1);
    assert_eq!(charlie.totals.total_passing_turnovers, 1);
}

#[test]
fn per_action_counts_combine_shots_and_passes() {
    let conn = seeded_store();
    let alpha = player_summary(&conn, 1).unwrap();
    assert_eq!(alpha.pick_and_roll_count, 2);
    assert_eq!(alpha.isolation_count, 2);
    assert_eq!(alpha.post_up_count, 1);
    assert_eq!(alpha.off_ball_screen_count, 1);

    let bravo = player_summary(&conn, 2).unwrap();
    assert_eq!(bravo.count(ActionType::PickAndRoll), 1);
    assert_eq!(bravo.count(ActionType::Isolation), 1);
    assert_eq!(bravo.count(ActionType::PostUp), 2);
    assert_eq!(bravo.count(ActionType::OffBallScreen), 0);
}

#[test]
fn unlisted_action_types_only_count_overall() {
    let conn = seeded_store();

    // Alpha has one "transition" shot.
    let alpha = player_summary(&conn, 1).unwrap();
    let per_action: i64 = alpha
        .sections()
        .map(|(_, s)| s.totals.total_shot_attempts)
        .sum();
    assert_eq!(per_action, 3);
    assert_eq!(alpha.totals.total_shot_attempts, 4);

    // Bravo's shots are all in the closed set.
    let bravo = player_summary(&conn, 2).unwrap();
    let per_action: i64 = bravo
        .sections()
        .map(|(_, s)| s.totals.total_shot_attempts)
        .sum();
    assert_eq!(per_action, bravo.totals.total_shot_attempts);
}

#[test]
fn turnovers_cover_passing_turnovers() {
    let conn = seeded_store();
    for id in all_player_ids(&conn).unwrap() {
        let summary = player_summary(&conn, id).unwrap();
        assert!(summary.totals.total_turnovers >= summary.totals.total_passing_turnovers);
        for (_, section) in summary.sections() {
            assert!(section.totals.total_turnovers >= section.totals.total_passing_turnovers);
        }
    }
}

#[test]
fn section_records_are_ordered_and_shaped() {
    let conn = seeded_store();
    let alpha = player_summary(&conn, 1).unwrap();

    let iso = alpha.section(ActionType::Isolation);
    assert_eq!(iso.totals.total_shot_attempts, 2);
    assert_eq!(iso.totals.total_points, 3);
    assert_eq!(
        iso.shots,
        vec![
            ShotRecord {
                loc: [3.5, -1.0],
                points: 3
            },
            ShotRecord {
                loc: [0.0, 0.0],
                points: 0
            },
        ]
    );
    assert!(iso.passes.is_empty());
    assert_eq!(iso.turnovers, vec![TurnoverRecord { loc: [1.0, 1.0] }]);
    assert_eq!(iso.totals.total_passing_turnovers, 0);

    let post = alpha.section(ActionType::PostUp);
    assert_eq!(
        post.passes,
        vec![PassRecord {
            start_loc: [2.0, 2.0],
            end_loc: [3.0, 3.0],
            is_completed: false,
            is_potential_assist: false,
            is_turnover: true,
        }]
    );
    assert_eq!(post.totals.total_passing_turnovers, 1);
}

#[test]
fn pass_turnover_flag_requires_same_player() {
    let conn = seeded_store();
    // Charlie's turnover points at Alpha's pass 1, which does not make it
    // one of Alpha's turnovers.
    let alpha = player_summary(&conn, 1).unwrap();
    let pnr = alpha.section(ActionType::PickAndRoll);
    assert_eq!(pnr.passes.len(), 1);
    assert!(!pnr.passes[0].is_turnover);
    assert!(pnr.passes[0].is_completed);
    assert!(pnr.passes[0].is_potential_assist);

    let bravo = player_summary(&conn, 2).unwrap();
    let iso = bravo.section(ActionType::Isolation);
    assert!(iso.passes[0].is_turnover);
}

#[test]
fn summary_json_matches_payload_shape() {
    let conn = seeded_store();
    let alpha = player_summary(&conn, 1).unwrap();
    let value = serde_json::to_value(&alpha).unwrap();
    assert_eq!(value["playerID"], 1);
    assert_eq!(value["pickAndRollCount"], 2);
    assert_eq!(value["postUp"]["passes"][0]["isTurnover"], true);
    assert_eq!(value["postUp"]["passes"][0]["startLoc"][0], 2.0);
    assert_eq!(value["isolation"]["shots"][0]["loc"][0], 3.5);
    assert_eq!(value["isolation"]["turnovers"][0]["loc"][1], 1.0);
}

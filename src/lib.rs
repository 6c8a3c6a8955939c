//! Per-player half-court statistics and competition ranks built from the
//! shots, passes and turnovers tables.

pub mod action;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod ranks;
pub mod stats_db;
pub mod summary;

pub use action::ActionType;
pub use error::StatsError;
pub use ranks::{PlayerRanks, PlayerReport, compute_ranks, player_ranks, rank_all_players};
pub use stats_db::all_player_ids;
pub use summary::{PlayerSummary, player_summary};

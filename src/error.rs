use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatsError>;

/// Errors surfaced by the query layer.
#[derive(Error, Debug)]
pub enum StatsError {
    /// No row in `players` for the requested id.
    #[error("player {0} not found")]
    PlayerNotFound(i64),

    /// Action type label outside the closed set.
    #[error("unknown action type: {0}")]
    UnknownActionType(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl StatsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StatsError::PlayerNotFound(_))
    }
}

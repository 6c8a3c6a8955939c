use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StatsError;

/// Half-court action a shot, pass or turnover happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    PickAndRoll,
    Isolation,
    PostUp,
    OffBallScreen,
}

impl ActionType {
    pub const ALL: [ActionType; 4] = [
        ActionType::PickAndRoll,
        ActionType::Isolation,
        ActionType::PostUp,
        ActionType::OffBallScreen,
    ];

    /// Key stored in the `action_type` columns.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::PickAndRoll => "pickAndRoll",
            ActionType::Isolation => "isolation",
            ActionType::PostUp => "postUp",
            ActionType::OffBallScreen => "offBallScreen",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActionType::PickAndRoll => "Pick & Roll",
            ActionType::Isolation => "Isolation",
            ActionType::PostUp => "Post-up",
            ActionType::OffBallScreen => "Off-Ball Screen",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionType::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| StatsError::UnknownActionType(s.to_string()))
    }
}

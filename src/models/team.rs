//! Teams and the per-turn history log.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A competing team. Points only change through scoring actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub points: u32,
}

impl Team {
    /// Create a team with a fresh UUID and zero points
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            points: 0,
        }
    }
}

/// Immutable record of a completed turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub team_id: String,
    pub card_id: String,
    pub correct: u32,
    pub passed: bool,
    /// Unix time in milliseconds
    pub timestamp: i64,
}

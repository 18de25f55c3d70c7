//! Per-turn state and AI generation status.

use serde::{Deserialize, Serialize};

use crate::models::TurnPhase;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnState {
    pub current_team_index: usize,
    pub is_running: bool,
    #[serde(default)]
    pub started_at: Option<i64>,
    /// Seconds left on the countdown
    pub remaining: u32,
    #[serde(default)]
    pub current_card_id: Option<String>,
    /// Points scored on the active card
    #[serde(default)]
    pub current_card_points: u32,
    /// Points scored in the whole turn
    pub correct_this_turn: u32,
    /// Incremented on every started turn
    #[serde(default)]
    pub serial: u64,
    #[serde(default)]
    pub auto_pass_pending: bool,
}

impl TurnState {
    /// Stopped turn with no card, counters zeroed
    pub fn idle(current_team_index: usize, round_seconds: u32, serial: u64) -> Self {
        Self {
            current_team_index,
            is_running: false,
            started_at: None,
            remaining: round_seconds,
            current_card_id: None,
            current_card_points: 0,
            correct_this_turn: 0,
            serial,
            auto_pass_pending: false,
        }
    }

    pub fn is_card_drawn(&self) -> bool {
        self.current_card_id.is_some()
    }

    pub fn phase(&self) -> TurnPhase {
        if self.is_running {
            TurnPhase::Running
        } else if self.current_card_id.is_some() {
            TurnPhase::CardDrawn
        } else {
            TurnPhase::Idle
        }
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::idle(0, 60, 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiGenerationStatus {
    pub is_generating: bool,
    #[serde(default)]
    pub error: Option<String>,
    /// Unix millis of the last successful generation
    #[serde(default)]
    pub last_generated: Option<i64>,
}

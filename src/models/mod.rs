//! Data models for Mimica
//!
//! This module contains the core data structures:
//! - Cards and the static deck loader
//! - Teams and turn history
//! - Match settings
//! - Enums for classification and state management

pub mod card;
pub mod enums;
pub mod settings;
pub mod team;

// Re-exports for convenient access
pub use card::{load_pool, Card};
pub use enums::{Category, Difficulty, Language, Screen, TurnPhase};
pub use settings::{Settings, SettingsPatch};
pub use team::{HistoryItem, Team};

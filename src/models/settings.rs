//! Match settings
//!
//! A configuration snapshot read by the deck and turn logic. Gameplay never
//! mutates it; only explicit configuration actions apply a `SettingsPatch`.

use serde::{Deserialize, Serialize};

use super::{Difficulty, Language};
use crate::config::EnvConfig;

/// Selectable round durations on the setup screen
pub const ROUND_SECONDS_OPTIONS: [u32; 4] = [30, 45, 60, 90];

/// Selectable targets on the setup screen
pub const TARGET_POINTS_OPTIONS: [u32; 3] = [7, 10, 15];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub round_seconds: u32,
    pub target_points: u32,
    pub show_card_by_default: bool,
    pub use_ai: bool,
    pub ai_difficulty: Difficulty,
    pub gemini_api_key: String,
    pub max_points_per_card: u32,
    pub auto_pass_on_max_points: bool,
    pub ai_only_mode: bool,
    pub ai_language: Language,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            round_seconds: 60,
            target_points: 10,
            show_card_by_default: false,
            use_ai: false,
            ai_difficulty: Difficulty::Medium,
            gemini_api_key: String::new(),
            max_points_per_card: 5,
            auto_pass_on_max_points: true,
            ai_only_mode: false,
            ai_language: Language::PtBr,
        }
    }
}

impl Settings {
    /// Initial settings derived from environment defaults
    pub fn from_env(env: &EnvConfig) -> Self {
        Self {
            round_seconds: env.default_round_seconds,
            target_points: env.default_target_points,
            show_card_by_default: env.show_card_by_default,
            use_ai: env.has_gemini_api_key(),
            ai_difficulty: env.default_ai_difficulty,
            gemini_api_key: env.gemini_api_key.clone(),
            max_points_per_card: env.default_max_points_per_card,
            auto_pass_on_max_points: env.default_auto_pass_on_max_points,
            ai_only_mode: env.default_ai_only_mode,
            ai_language: env.default_ai_language,
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.gemini_api_key.is_empty()
    }

    /// Merge every `Some` field of `patch`
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(v) = patch.round_seconds {
            self.round_seconds = v;
        }
        if let Some(v) = patch.target_points {
            self.target_points = v;
        }
        if let Some(v) = patch.show_card_by_default {
            self.show_card_by_default = v;
        }
        if let Some(v) = patch.use_ai {
            self.use_ai = v;
        }
        if let Some(v) = patch.ai_difficulty {
            self.ai_difficulty = v;
        }
        if let Some(v) = patch.max_points_per_card {
            self.max_points_per_card = v;
        }
        if let Some(v) = patch.auto_pass_on_max_points {
            self.auto_pass_on_max_points = v;
        }
        if let Some(v) = patch.ai_only_mode {
            self.ai_only_mode = v;
        }
        if let Some(v) = patch.ai_language {
            self.ai_language = v;
        }
    }
}

/// Partial settings update. The API key is set through its own action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub round_seconds: Option<u32>,
    pub target_points: Option<u32>,
    pub show_card_by_default: Option<bool>,
    pub use_ai: Option<bool>,
    pub ai_difficulty: Option<Difficulty>,
    pub max_points_per_card: Option<u32>,
    pub auto_pass_on_max_points: Option<bool>,
    pub ai_only_mode: Option<bool>,
    pub ai_language: Option<Language>,
}

/// Step to the next (or previous) value in a fixed option list.
/// Values not in the list snap to the first option.
pub fn cycle_option(options: &[u32], current: u32, forward: bool) -> u32 {
    match options.iter().position(|&v| v == current) {
        Some(idx) if forward => options[(idx + 1) % options.len()],
        Some(idx) => options[(idx + options.len() - 1) % options.len()],
        None => options[0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_only_touches_some_fields() {
        let mut settings = Settings::default();
        settings.apply(&SettingsPatch {
            round_seconds: Some(90),
            ai_only_mode: Some(true),
            ..Default::default()
        });
        assert_eq!(settings.round_seconds, 90);
        assert!(settings.ai_only_mode);
        assert_eq!(settings.target_points, 10);
        assert_eq!(settings.max_points_per_card, 5);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"roundSeconds": 45}"#).unwrap();
        assert_eq!(settings.round_seconds, 45);
        assert!(settings.auto_pass_on_max_points);
        assert_eq!(settings.ai_language, Language::PtBr);
    }

    #[test]
    fn test_cycle_option() {
        assert_eq!(cycle_option(&ROUND_SECONDS_OPTIONS, 60, true), 90);
        assert_eq!(cycle_option(&ROUND_SECONDS_OPTIONS, 90, true), 30);
        assert_eq!(cycle_option(&ROUND_SECONDS_OPTIONS, 30, false), 90);
        assert_eq!(cycle_option(&TARGET_POINTS_OPTIONS, 12, true), 7);
    }

    #[test]
    fn test_from_env_uses_key_presence() {
        let env = EnvConfig::from_lookup(|name| match name {
            "MIMICA_GEMINI_API_KEY" => Some("abc".to_string()),
            "MIMICA_DEFAULT_ROUND_SECONDS" => Some("45".to_string()),
            _ => None,
        });
        let settings = Settings::from_env(&env);
        assert!(settings.use_ai);
        assert_eq!(settings.gemini_api_key, "abc");
        assert_eq!(settings.round_seconds, 45);
    }
}

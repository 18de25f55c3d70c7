//! Environment configuration.
//!
//! Defaults for a new match come from `MIMICA_*` environment variables.
//! A value falls back to its default only when absent or unparseable;
//! out-of-range values are reported as warnings and used as given.

use std::time::Duration;

use crate::models::{Difficulty, Language};

/// Default grace period between hitting the per-card cap and the auto-pass
pub const DEFAULT_AUTO_PASS_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct EnvConfig {
    pub gemini_api_key: String,
    pub default_ai_difficulty: Difficulty,
    pub default_ai_language: Language,
    pub default_round_seconds: u32,
    pub default_target_points: u32,
    pub show_card_by_default: bool,
    pub default_max_points_per_card: u32,
    pub default_auto_pass_on_max_points: bool,
    pub default_ai_only_mode: bool,
    pub auto_pass_delay: Duration,
    pub enable_debug_logs: bool,
}

/// Result of the usability check shown on the setup screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigCheck {
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

impl ConfigCheck {
    pub fn is_valid(&self) -> bool {
        self.warnings.is_empty()
    }
}

fn parse_number<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    match value {
        Some(v) if !v.is_empty() => v.trim().parse().unwrap_or(default),
        _ => default,
    }
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    match value {
        Some(v) if !v.is_empty() => v.eq_ignore_ascii_case("true"),
        _ => default,
    }
}

impl EnvConfig {
    /// Load configuration through `lookup` (variable name -> value)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_api_key = lookup("MIMICA_GEMINI_API_KEY")
            .filter(|v| !v.is_empty())
            .or_else(|| lookup("GEMINI_API_KEY"))
            .unwrap_or_default();

        Self {
            gemini_api_key: gemini_api_key.trim().to_string(),
            default_ai_difficulty: lookup("MIMICA_DEFAULT_AI_DIFFICULTY")
                .and_then(|v| Difficulty::parse(&v))
                .unwrap_or(Difficulty::Medium),
            default_ai_language: lookup("MIMICA_DEFAULT_AI_LANGUAGE")
                .and_then(|v| Language::parse(&v))
                .unwrap_or(Language::PtBr),
            default_round_seconds: parse_number(lookup("MIMICA_DEFAULT_ROUND_SECONDS"), 60),
            default_target_points: parse_number(lookup("MIMICA_DEFAULT_TARGET_POINTS"), 10),
            show_card_by_default: parse_bool(lookup("MIMICA_SHOW_CARD_BY_DEFAULT"), false),
            default_max_points_per_card: parse_number(
                lookup("MIMICA_DEFAULT_MAX_POINTS_PER_CARD"),
                5,
            ),
            default_auto_pass_on_max_points: parse_bool(
                lookup("MIMICA_DEFAULT_AUTO_PASS_ON_MAX_POINTS"),
                true,
            ),
            default_ai_only_mode: parse_bool(lookup("MIMICA_DEFAULT_AI_ONLY_MODE"), false),
            auto_pass_delay: Duration::from_millis(parse_number(
                lookup("MIMICA_AUTO_PASS_DELAY_MS"),
                DEFAULT_AUTO_PASS_DELAY_MS,
            )),
            enable_debug_logs: parse_bool(lookup("MIMICA_ENABLE_DEBUG_LOGS"), false),
        }
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn has_gemini_api_key(&self) -> bool {
        !self.gemini_api_key.is_empty()
    }

    /// Range problems in the loaded values. Never modifies them.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !(10..=300).contains(&self.default_round_seconds) {
            warnings.push(
                "Invalid MIMICA_DEFAULT_ROUND_SECONDS: must be between 10 and 300 seconds"
                    .to_string(),
            );
        }
        if !(1..=50).contains(&self.default_target_points) {
            warnings.push(
                "Invalid MIMICA_DEFAULT_TARGET_POINTS: must be between 1 and 50 points".to_string(),
            );
        }
        if !(1..=20).contains(&self.default_max_points_per_card) {
            warnings.push(
                "Invalid MIMICA_DEFAULT_MAX_POINTS_PER_CARD: must be between 1 and 20 points"
                    .to_string(),
            );
        }
        warnings
    }

    /// Log range warnings and, when debug logs are on, the loaded values
    pub fn log_summary(&self) {
        for warning in self.validate() {
            tracing::warn!("{}", warning);
        }
        tracing::debug!(
            has_gemini_key = self.has_gemini_api_key(),
            difficulty = self.default_ai_difficulty.label(),
            language = self.default_ai_language.label(),
            round_seconds = self.default_round_seconds,
            target_points = self.default_target_points,
            max_points_per_card = self.default_max_points_per_card,
            auto_pass = self.default_auto_pass_on_max_points,
            ai_only = self.default_ai_only_mode,
            "environment configuration loaded"
        );
    }

    /// Gameplay-quality hints about the configuration
    pub fn check(&self) -> ConfigCheck {
        let mut check = ConfigCheck::default();
        if !self.has_gemini_api_key() {
            check.warnings.push("Gemini API key not configured".to_string());
            check
                .suggestions
                .push("Set MIMICA_GEMINI_API_KEY to enable AI card generation".to_string());
        }
        if self.default_round_seconds < 30 {
            check.warnings.push("Round duration is quite short (< 30s)".to_string());
            check.suggestions.push(
                "Consider increasing MIMICA_DEFAULT_ROUND_SECONDS for better gameplay".to_string(),
            );
        }
        if self.default_target_points < 5 {
            check.warnings.push("Target points is quite low (< 5)".to_string());
            check.suggestions.push(
                "Consider increasing MIMICA_DEFAULT_TARGET_POINTS for longer games".to_string(),
            );
        }
        check
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> EnvConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = EnvConfig::default();
        assert_eq!(config.default_round_seconds, 60);
        assert_eq!(config.default_target_points, 10);
        assert_eq!(config.default_max_points_per_card, 5);
        assert!(config.default_auto_pass_on_max_points);
        assert!(!config.default_ai_only_mode);
        assert_eq!(config.default_ai_difficulty, Difficulty::Medium);
        assert_eq!(config.default_ai_language, Language::PtBr);
        assert_eq!(config.auto_pass_delay, Duration::from_millis(1000));
        assert!(!config.has_gemini_api_key());
    }

    #[test]
    fn test_unparseable_number_uses_default() {
        let config = config_with(&[("MIMICA_DEFAULT_ROUND_SECONDS", "sixty")]);
        assert_eq!(config.default_round_seconds, 60);
    }

    #[test]
    fn test_out_of_range_is_kept_and_warned() {
        let config = config_with(&[
            ("MIMICA_DEFAULT_ROUND_SECONDS", "500"),
            ("MIMICA_DEFAULT_MAX_POINTS_PER_CARD", "0"),
        ]);
        assert_eq!(config.default_round_seconds, 500);
        assert_eq!(config.default_max_points_per_card, 0);
        let warnings = config.validate();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("ROUND_SECONDS"));
        assert!(warnings[1].contains("MAX_POINTS_PER_CARD"));
    }

    #[test]
    fn test_bool_parsing() {
        let config = config_with(&[
            ("MIMICA_SHOW_CARD_BY_DEFAULT", "TRUE"),
            ("MIMICA_DEFAULT_AUTO_PASS_ON_MAX_POINTS", "yes"),
        ]);
        assert!(config.show_card_by_default);
        // Anything other than "true" is false once present
        assert!(!config.default_auto_pass_on_max_points);
    }

    #[test]
    fn test_invalid_enum_values_fall_back() {
        let config = config_with(&[
            ("MIMICA_DEFAULT_AI_DIFFICULTY", "insane"),
            ("MIMICA_DEFAULT_AI_LANGUAGE", "fr"),
        ]);
        assert_eq!(config.default_ai_difficulty, Difficulty::Medium);
        assert_eq!(config.default_ai_language, Language::PtBr);
    }

    #[test]
    fn test_api_key_fallback_variable() {
        let config = config_with(&[("GEMINI_API_KEY", " k-123 ")]);
        assert_eq!(config.gemini_api_key, "k-123");
        let config = config_with(&[("MIMICA_GEMINI_API_KEY", "primary"), ("GEMINI_API_KEY", "other")]);
        assert_eq!(config.gemini_api_key, "primary");
    }

    #[test]
    fn test_check_reports_missing_key_and_short_rounds() {
        let config = config_with(&[
            ("MIMICA_DEFAULT_ROUND_SECONDS", "20"),
            ("MIMICA_DEFAULT_TARGET_POINTS", "3"),
        ]);
        let check = config.check();
        assert!(!check.is_valid());
        assert_eq!(check.warnings.len(), 3);
        assert_eq!(check.suggestions.len(), 3);

        let config = config_with(&[("MIMICA_GEMINI_API_KEY", "k")]);
        assert!(config.check().is_valid());
    }
}

//! Card data structures
//!
//! Cards are immutable once created. The static pool ships embedded in the
//! binary and can be replaced with a JSON file passed on the command line.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Category;

/// Deck bundled with the binary
const EMBEDDED_DECK: &str = include_str!("../../data/cards.json");

/// A prompt card: a category and the words that can be mimed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub category: Category,
    pub prompts: Vec<String>,
}

impl Card {
    pub fn new(id: impl Into<String>, category: Category, prompts: Vec<String>) -> Self {
        Self {
            id: id.into(),
            category,
            prompts,
        }
    }

    /// Whether the card was produced by the AI generator
    pub fn is_generated(&self) -> bool {
        self.id.starts_with("gemini-")
    }

    /// One-line description "Category — first prompt", truncated to `max_width` chars
    pub fn summary(&self, max_width: usize) -> String {
        let first = self.prompts.first().map(String::as_str).unwrap_or("");
        let full = format!("{} — {}", self.category.label(), first);
        let char_count = full.chars().count();
        if char_count > max_width {
            let truncated: String = full.chars().take(max_width.saturating_sub(3)).collect();
            format!("{}...", truncated)
        } else {
            full
        }
    }
}

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("failed to read deck file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid deck JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("deck contains no cards")]
    Empty,

    #[error("duplicate card id: {0}")]
    DuplicateId(String),
}

/// Parse a deck from JSON text
pub fn parse_deck(content: &str) -> Result<Vec<Card>, DeckError> {
    let cards: Vec<Card> = serde_json::from_str(content)?;
    if cards.is_empty() {
        return Err(DeckError::Empty);
    }
    let mut seen = std::collections::HashSet::new();
    for card in &cards {
        if !seen.insert(card.id.as_str()) {
            return Err(DeckError::DuplicateId(card.id.clone()));
        }
    }
    Ok(cards)
}

/// Load the card pool from `path`, or the embedded deck when `None`
pub fn load_pool(path: Option<&Path>) -> Result<Vec<Card>, DeckError> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|source| DeckError::Io {
                path: path.display().to_string(),
                source,
            })?;
            parse_deck(&content)
        }
        None => parse_deck(EMBEDDED_DECK),
    }
}

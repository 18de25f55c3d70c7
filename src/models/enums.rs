//! Enums used throughout Mimica
//!
//! Card classification (category, difficulty, prompt language) plus the
//! screen and turn-phase enums used for state management and rendering.

use serde::{Deserialize, Serialize};

/// Card category. Serialized with the labels used by the bundled deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Pessoa/Personagem")]
    Person,
    #[serde(rename = "Lugar")]
    Place,
    #[serde(rename = "Objeto")]
    Object,
    #[serde(rename = "Ação")]
    Action,
    #[serde(rename = "Animal")]
    Animal,
    #[serde(rename = "Coisa")]
    Thing,
    #[serde(rename = "Livre")]
    Free,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Free,
        Category::Person,
        Category::Place,
        Category::Object,
        Category::Action,
        Category::Animal,
        Category::Thing,
    ];

    /// Categories eligible for a random pick when none is requested
    pub const CONCRETE: [Category; 6] = [
        Category::Person,
        Category::Place,
        Category::Object,
        Category::Action,
        Category::Animal,
        Category::Thing,
    ];

    /// Name as stored in deck files and sent to the AI provider
    pub fn wire_name(&self) -> &'static str {
        match self {
            Category::Person => "Pessoa/Personagem",
            Category::Place => "Lugar",
            Category::Object => "Objeto",
            Category::Action => "Ação",
            Category::Animal => "Animal",
            Category::Thing => "Coisa",
            Category::Free => "Livre",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Person => "Person/Character",
            Category::Place => "Place",
            Category::Object => "Object",
            Category::Action => "Action",
            Category::Animal => "Animal",
            Category::Thing => "Thing",
            Category::Free => "Free",
        }
    }

    /// Short description of what the category covers, used in AI prompts
    pub fn description(&self, language: Language) -> &'static str {
        match (self, language) {
            (Category::Person, Language::PtBr) => {
                "pessoas famosas, personagens de filmes, desenhos, livros, histórias"
            }
            (Category::Person, Language::En) => {
                "famous people, movie characters, cartoon characters, book characters"
            }
            (Category::Place, Language::PtBr) => {
                "lugares, cidades, países, pontos turísticos, ambientes"
            }
            (Category::Place, Language::En) => {
                "places, cities, countries, tourist attractions, environments"
            }
            (Category::Object, Language::PtBr) => {
                "objetos do dia a dia, utensílios, ferramentas, equipamentos"
            }
            (Category::Object, Language::En) => "everyday objects, utensils, tools, equipment",
            (Category::Action, Language::PtBr) => {
                "ações, verbos, atividades que podem ser representadas por gestos"
            }
            (Category::Action, Language::En) => {
                "actions, verbs, activities that can be represented by gestures"
            }
            (Category::Animal, Language::PtBr) => "animais domésticos, selvagens, marinhos, insetos",
            (Category::Animal, Language::En) => {
                "domestic animals, wild animals, marine animals, insects"
            }
            (Category::Thing, Language::PtBr) => {
                "conceitos abstratos, sentimentos, situações, fenômenos"
            }
            (Category::Thing, Language::En) => "abstract concepts, feelings, situations, phenomena",
            (Category::Free, Language::PtBr) => {
                "qualquer categoria, mistura de pessoas, lugares, objetos, ações, animais"
            }
            (Category::Free, Language::En) => {
                "any category, mix of people, places, objects, actions, animals"
            }
        }
    }

    /// Next category in `ALL` order, wrapping around
    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|c| c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        let idx = Self::ALL.iter().position(|c| c == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// AI generation difficulty (also used for estimated deck difficulty)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }
}

/// Language the AI prompts are written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en")]
    En,
}

impl Language {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pt-BR" => Some(Language::PtBr),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Language::PtBr => Language::En,
            Language::En => Language::PtBr,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::PtBr => "pt-BR",
            Language::En => "en",
        }
    }
}

/// Top-level screen shown by the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Setup,     // Team registration and rules
    Play,      // Active match
    Generator, // AI card generator
    Stats,     // Deck analytics
    ApiKey,    // API key entry modal
}

/// Phase of the current turn, derived from the turn state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,      // No card, timer stopped
    CardDrawn, // Card active, timer stopped
    Running,   // Timer counting down
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serializes_with_deck_labels() {
        let json = serde_json::to_string(&Category::Action).unwrap();
        assert_eq!(json, "\"Ação\"");
        let parsed: Category = serde_json::from_str("\"Pessoa/Personagem\"").unwrap();
        assert_eq!(parsed, Category::Person);
    }

    #[test]
    fn test_category_cycle_wraps() {
        assert_eq!(Category::Thing.next(), Category::Free);
        assert_eq!(Category::Free.prev(), Category::Thing);
        for c in Category::ALL {
            assert_eq!(c.next().prev(), c);
        }
    }

    #[test]
    fn test_concrete_excludes_free() {
        assert!(!Category::CONCRETE.contains(&Category::Free));
        assert_eq!(Category::CONCRETE.len(), 6);
    }

    #[test]
    fn test_difficulty_parse_and_default() {
        assert_eq!(Difficulty::parse("hard"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("HARD"), None);
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn test_language_wire_format() {
        assert_eq!(serde_json::to_string(&Language::PtBr).unwrap(), "\"pt-BR\"");
        assert_eq!(Language::parse("en"), Some(Language::En));
        assert_eq!(Language::En.toggle(), Language::PtBr);
    }

    #[test]
    fn test_screen_default() {
        assert_eq!(Screen::default(), Screen::Setup);
    }
}

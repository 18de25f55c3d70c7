//! Deck analytics: category balance, estimated difficulty and AI history.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Card, Category, Difficulty};

/// Maximum number of generation log entries kept
pub const MAX_GENERATION_LOG: usize = 100;

const ABSTRACT_MARKERS: [&str; 5] = ["conceito", "sentimento", "emoção", "ideia", "filosofia"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category: Category,
    pub count: usize,
    pub percentage: f64,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyStats {
    pub difficulty: Difficulty,
    pub count: usize,
    pub percentage: f64,
    pub categories: BTreeMap<Category, usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckComposition {
    pub traditional: usize,
    pub ai_generated: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardAnalytics {
    pub total_cards: usize,
    /// Present categories, most common first
    pub by_category: Vec<CategoryStats>,
    /// All difficulties, most common first
    pub by_difficulty: Vec<DifficultyStats>,
    pub average_prompts_per_card: f64,
    pub most_common_category: Category,
    pub least_common_category: Category,
    pub deck_composition: DeckComposition,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategorySuggestion {
    pub category: Category,
    /// How many cards the category is below the average
    pub priority: f64,
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

fn has_consecutive_capitals(text: &str) -> bool {
    let mut previous_upper = false;
    for c in text.chars() {
        let upper = c.is_ascii_uppercase();
        if upper && previous_upper {
            return true;
        }
        previous_upper = upper;
    }
    false
}

/// Guess how hard a card is from the shape of its prompts
pub fn estimate_difficulty(card: &Card) -> Difficulty {
    if card.prompts.is_empty() {
        return Difficulty::Easy;
    }

    let mut score = 0.0;
    for prompt in &card.prompts {
        let words: Vec<&str> = prompt.split_whitespace().collect();
        if !words.is_empty() {
            let total_len: usize = words.iter().map(|w| w.chars().count()).sum();
            let avg_len = total_len as f64 / words.len() as f64;

            // Longer words are harder to mime
            if avg_len > 8.0 {
                score += 2.0;
            } else if avg_len > 6.0 {
                score += 1.0;
            }

            if words.len() > 2 {
                score += 1.0;
            } else if words.len() > 1 {
                score += 0.5;
            }
        }

        let lower = prompt.to_lowercase();
        if ABSTRACT_MARKERS.iter().any(|m| lower.contains(m)) {
            score += 2.0;
        }

        if prompt.contains('-') || has_consecutive_capitals(prompt) {
            score += 1.0;
        }
    }

    let avg = score / card.prompts.len() as f64;
    if avg <= 1.0 {
        Difficulty::Easy
    } else if avg <= 2.5 {
        Difficulty::Medium
    } else {
        Difficulty::Hard
    }
}

/// Analyze the traditional pool together with generated cards
pub fn analyze(traditional: &[Card], ai_cards: &[Card]) -> CardAnalytics {
    let all: Vec<&Card> = traditional.iter().chain(ai_cards.iter()).collect();
    let total = all.len();
    let example_limit = if ai_cards.is_empty() { 3 } else { 5 };

    let mut counts: BTreeMap<Category, usize> = BTreeMap::new();
    let mut examples: BTreeMap<Category, Vec<String>> = BTreeMap::new();
    let mut by_difficulty: Vec<DifficultyStats> = Difficulty::ALL
        .iter()
        .map(|&difficulty| DifficultyStats {
            difficulty,
            count: 0,
            percentage: 0.0,
            categories: BTreeMap::new(),
        })
        .collect();

    for card in &all {
        *counts.entry(card.category).or_insert(0) += 1;
        let list = examples.entry(card.category).or_default();
        if let Some(first) = card.prompts.first() {
            if list.len() < example_limit {
                list.push(first.clone());
            }
        }

        let difficulty = estimate_difficulty(card);
        if let Some(stats) = by_difficulty.iter_mut().find(|s| s.difficulty == difficulty) {
            stats.count += 1;
            *stats.categories.entry(card.category).or_insert(0) += 1;
        }
    }

    let mut by_category: Vec<CategoryStats> = Category::ALL
        .iter()
        .filter_map(|category| {
            counts.get(category).map(|&count| CategoryStats {
                category: *category,
                count,
                percentage: percentage(count, total),
                examples: examples.remove(category).unwrap_or_default(),
            })
        })
        .collect();
    // Stable sort keeps Category::ALL order for ties
    by_category.sort_by(|a, b| b.count.cmp(&a.count));

    for stats in &mut by_difficulty {
        stats.percentage = percentage(stats.count, total);
    }
    by_difficulty.sort_by(|a, b| b.count.cmp(&a.count));

    let total_prompts: usize = all.iter().map(|c| c.prompts.len()).sum();
    let average_prompts_per_card = if total == 0 {
        0.0
    } else {
        (total_prompts as f64 / total as f64 * 10.0).round() / 10.0
    };

    CardAnalytics {
        total_cards: total,
        most_common_category: by_category.first().map(|s| s.category).unwrap_or(Category::Free),
        least_common_category: by_category.last().map(|s| s.category).unwrap_or(Category::Free),
        by_category,
        by_difficulty,
        average_prompts_per_card,
        deck_composition: DeckComposition {
            traditional: traditional.len(),
            ai_generated: ai_cards.len(),
        },
    }
}

/// Advice for evening out the deck
pub fn balance_recommendations(analytics: &CardAnalytics) -> Vec<String> {
    let mut recommendations = Vec::new();

    if !analytics.by_category.is_empty() {
        let threshold = 100.0 / analytics.by_category.len() as f64 * 0.5;
        for stat in &analytics.by_category {
            if stat.percentage < threshold {
                recommendations.push(format!(
                    "Consider generating more \"{}\" cards (only {} cards, {:.1}%)",
                    stat.category.label(),
                    stat.count,
                    stat.percentage
                ));
            }
        }
    }

    if analytics.deck_composition.ai_generated == 0 {
        recommendations.push("Configure the AI for endless, always-varied cards!".to_string());
    }

    if recommendations.is_empty() {
        recommendations.push("Your deck is well balanced!".to_string());
    }

    recommendations
}

/// Categories below the average count, largest deficit first
pub fn suggested_ai_categories(analytics: &CardAnalytics, count: usize) -> Vec<CategorySuggestion> {
    if analytics.by_category.is_empty() {
        return Vec::new();
    }
    let avg = analytics.total_cards as f64 / analytics.by_category.len() as f64;

    let mut suggestions: Vec<CategorySuggestion> = analytics
        .by_category
        .iter()
        .filter_map(|stat| {
            let deficit = avg - stat.count as f64;
            (deficit > 0.0).then_some(CategorySuggestion {
                category: stat.category,
                priority: deficit,
            })
        })
        .collect();
    suggestions.sort_by(|a, b| b.priority.total_cmp(&a.priority));
    suggestions.truncate(count);
    suggestions
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationEntry {
    pub timestamp: i64,
    pub category: Category,
    pub difficulty: Difficulty,
    pub prompt: String,
}

/// Rolling record of AI-generated cards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationLog {
    entries: Vec<GenerationEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiCardStats {
    pub total_generated: usize,
    pub by_category: BTreeMap<Category, usize>,
    pub by_difficulty: BTreeMap<Difficulty, usize>,
}

impl GenerationLog {
    pub fn record(&mut self, timestamp: i64, card: &Card, difficulty: Difficulty) {
        self.entries.push(GenerationEntry {
            timestamp,
            category: card.category,
            difficulty,
            prompt: card.prompts.first().cloned().unwrap_or_default(),
        });
        if self.entries.len() > MAX_GENERATION_LOG {
            let excess = self.entries.len() - MAX_GENERATION_LOG;
            self.entries.drain(0..excess);
        }
    }

    pub fn entries(&self) -> &[GenerationEntry] {
        &self.entries
    }

    pub fn summary(&self) -> AiCardStats {
        let mut by_category = BTreeMap::new();
        let mut by_difficulty = BTreeMap::new();
        for entry in &self.entries {
            *by_category.entry(entry.category).or_insert(0) += 1;
            *by_difficulty.entry(entry.difficulty).or_insert(0) += 1;
        }
        AiCardStats {
            total_generated: self.entries.len(),
            by_category,
            by_difficulty,
        }
    }
}

/// JSON export of all analytics
pub fn export_analytics(
    traditional: &[Card],
    ai_cards: &[Card],
    log: &GenerationLog,
    timestamp: i64,
) -> serde_json::Value {
    serde_json::json!({
        "traditional": analyze(traditional, &[]),
        "combined": analyze(traditional, ai_cards),
        "ai": log.summary(),
        "generationHistory": log.entries(),
        "timestamp": timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, category: Category, prompts: &[&str]) -> Card {
        Card::new(id, category, prompts.iter().map(|p| p.to_string()).collect())
    }

    #[test]
    fn test_estimate_easy() {
        let c = card("a", Category::Animal, &["Gato", "Leão", "Sapo"]);
        assert_eq!(estimate_difficulty(&c), Difficulty::Easy);
    }

    #[test]
    fn test_estimate_medium() {
        // "Escova de dentes": 3 words (+1); "Guarda-chuva": long word (+2) and hyphen (+1)
        let c = card("b", Category::Object, &["Escova de dentes", "Guarda-chuva"]);
        assert_eq!(estimate_difficulty(&c), Difficulty::Medium);
    }

    #[test]
    fn test_estimate_hard() {
        let c = card("c", Category::Thing, &["Sentimento de culpa", "Conceito de tempo"]);
        assert_eq!(estimate_difficulty(&c), Difficulty::Hard);
    }

    #[test]
    fn test_consecutive_capitals_count_as_technical() {
        assert!(has_consecutive_capitals("NASA"));
        assert!(!has_consecutive_capitals("Nasa"));
        let c = card("d", Category::Place, &["NASA"]);
        // 1 point per prompt stays easy
        assert_eq!(estimate_difficulty(&c), Difficulty::Easy);
    }

    #[test]
    fn test_analyze_counts_and_order() {
        let pool = vec![
            card("1", Category::Animal, &["Gato"]),
            card("2", Category::Animal, &["Cão", "Boi"]),
            card("3", Category::Place, &["Praia"]),
            card("4", Category::Animal, &["Rato"]),
        ];
        let analytics = analyze(&pool, &[]);

        assert_eq!(analytics.total_cards, 4);
        assert_eq!(analytics.by_category.len(), 2);
        assert_eq!(analytics.by_category[0].category, Category::Animal);
        assert_eq!(analytics.by_category[0].count, 3);
        assert!((analytics.by_category[0].percentage - 75.0).abs() < 1e-9);
        assert_eq!(analytics.by_category[0].examples, vec!["Gato", "Cão", "Rato"]);
        assert_eq!(analytics.most_common_category, Category::Animal);
        assert_eq!(analytics.least_common_category, Category::Place);
        assert_eq!(analytics.average_prompts_per_card, 1.3);
        assert_eq!(analytics.by_difficulty.len(), 3);
        assert_eq!(analytics.by_difficulty[0].difficulty, Difficulty::Easy);
        assert_eq!(analytics.by_difficulty[0].count, 4);
        assert_eq!(analytics.deck_composition, DeckComposition { traditional: 4, ai_generated: 0 });
    }

    #[test]
    fn test_analyze_empty() {
        let analytics = analyze(&[], &[]);
        assert_eq!(analytics.total_cards, 0);
        assert!(analytics.by_category.is_empty());
        assert_eq!(analytics.most_common_category, Category::Free);
        assert_eq!(analytics.average_prompts_per_card, 0.0);
    }

    #[test]
    fn test_analyze_with_ai_cards() {
        let pool = vec![card("1", Category::Animal, &["Gato"])];
        let ai = vec![card("gemini-1-0-0", Category::Place, &["Museu"])];
        let analytics = analyze(&pool, &ai);
        assert_eq!(analytics.total_cards, 2);
        assert_eq!(analytics.deck_composition.ai_generated, 1);
    }

    #[test]
    fn test_balance_recommendations() {
        let mut pool: Vec<Card> = (0..9)
            .map(|i| card(&format!("a{}", i), Category::Animal, &["Gato"]))
            .collect();
        pool.push(card("p", Category::Place, &["Praia"]));
        let analytics = analyze(&pool, &[]);
        let recs = balance_recommendations(&analytics);
        // Place is 10%, below half of the 50% average
        assert!(recs[0].contains("\"Place\""));
        assert!(recs[0].contains("10.0%"));
        assert!(recs.iter().any(|r| r.contains("Configure the AI")));
    }

    #[test]
    fn test_balanced_deck_message() {
        let pool = vec![card("1", Category::Animal, &["Gato"]), card("2", Category::Place, &["Praia"])];
        let ai = vec![card("gemini-x", Category::Object, &["Garfo"])];
        let recs = balance_recommendations(&analyze(&pool, &ai));
        assert_eq!(recs, vec!["Your deck is well balanced!".to_string()]);
    }

    #[test]
    fn test_suggested_categories_by_deficit() {
        let mut pool: Vec<Card> = (0..6)
            .map(|i| card(&format!("a{}", i), Category::Animal, &["x"]))
            .collect();
        pool.push(card("p1", Category::Place, &["x"]));
        pool.push(card("o1", Category::Object, &["x"]));
        pool.push(card("o2", Category::Object, &["x"]));
        // avg = 9 / 3 = 3
        let suggestions = suggested_ai_categories(&analyze(&pool, &[]), 5);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].category, Category::Place);
        assert_eq!(suggestions[0].priority, 2.0);
        assert_eq!(suggestions[1].category, Category::Object);

        let top = suggested_ai_categories(&analyze(&pool, &[]), 1);
        assert_eq!(top.len(), 1);
    }

    #[test]
    fn test_generation_log_caps_entries() {
        let mut log = GenerationLog::default();
        for i in 0..(MAX_GENERATION_LOG + 5) {
            let c = card(&format!("g{}", i), Category::Animal, &["Gato"]);
            log.record(i as i64, &c, Difficulty::Hard);
        }
        assert_eq!(log.entries().len(), MAX_GENERATION_LOG);
        assert_eq!(log.entries()[0].timestamp, 5);
        let summary = log.summary();
        assert_eq!(summary.total_generated, MAX_GENERATION_LOG);
        assert_eq!(summary.by_difficulty.get(&Difficulty::Hard), Some(&MAX_GENERATION_LOG));
    }

    #[test]
    fn test_export_contains_sections() {
        let pool = vec![card("1", Category::Animal, &["Gato"])];
        let json = export_analytics(&pool, &[], &GenerationLog::default(), 99);
        assert_eq!(json["timestamp"], 99);
        assert_eq!(json["traditional"]["totalCards"], 1);
        assert_eq!(json["ai"]["totalGenerated"], 0);
        assert_eq!(json["traditional"]["byCategory"][0]["category"], "Animal");
    }
}

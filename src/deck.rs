//! Deck management: draw order, discard pile and reshuffle policy.
//!
//! A card id lives in at most one of the deck, the discard pile or the
//! active slot held by the turn state.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::models::Card;

/// Result of a draw attempt
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOutcome {
    /// The first card of the deck was removed and returned
    Drawn(Card),
    /// The deck is empty and cards come from the AI generator instead
    NeedsGeneration,
    /// Nothing left to draw and no way to get more
    Empty,
}

/// Uniform in-place permutation (Fisher–Yates)
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    /// Undrawn cards; index 0 is drawn next
    pub cards: Vec<Card>,
    /// Ids of cards already played
    pub discard: Vec<String>,
}

impl Deck {
    /// Fresh deck holding a random permutation of `pool`
    pub fn shuffled<R: Rng + ?Sized>(pool: &[Card], rng: &mut R) -> Self {
        let mut cards = pool.to_vec();
        shuffle(&mut cards, rng);
        Self {
            cards,
            discard: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card_id: &str) -> bool {
        self.cards.iter().any(|c| c.id == card_id)
    }

    pub fn is_discarded(&self, card_id: &str) -> bool {
        self.discard.iter().any(|id| id == card_id)
    }

    /// Draw the next card.
    ///
    /// With an empty deck, `ai_available` short-circuits to
    /// `NeedsGeneration`; otherwise the discard pile is resolved against
    /// `known` and reshuffled into a new deck first.
    pub fn draw<'a, I, R>(&mut self, ai_available: bool, known: I, rng: &mut R) -> DrawOutcome
    where
        I: IntoIterator<Item = &'a Card>,
        R: Rng + ?Sized,
    {
        if self.is_empty() {
            if ai_available {
                return DrawOutcome::NeedsGeneration;
            }
            self.reshuffle_discard(known, rng);
        }

        if self.is_empty() {
            DrawOutcome::Empty
        } else {
            DrawOutcome::Drawn(self.cards.remove(0))
        }
    }

    /// Move every discarded card back into the deck in a new random order.
    /// Ids that don't resolve to a known card are dropped.
    pub fn reshuffle_discard<'a, I, R>(&mut self, known: I, rng: &mut R)
    where
        I: IntoIterator<Item = &'a Card>,
        R: Rng + ?Sized,
    {
        let mut back: Vec<Card> = Vec::with_capacity(self.discard.len());
        for card in known {
            if self.is_discarded(&card.id) && !back.iter().any(|c| c.id == card.id) {
                back.push(card.clone());
            }
        }
        if back.len() < self.discard.len() {
            tracing::warn!(
                dropped = self.discard.len() - back.len(),
                "discarded cards without a known definition were dropped"
            );
        }
        shuffle(&mut back, rng);
        tracing::debug!(cards = back.len(), "reshuffled discard pile into deck");
        self.cards.extend(back);
        self.discard.clear();
    }

    /// Record a played card. Idempotent.
    pub fn discard(&mut self, card_id: &str) {
        if !self.is_discarded(card_id) {
            self.discard.push(card_id.to_string());
        }
    }

    /// Put cards on top of the deck, keeping their order
    pub fn push_front(&mut self, cards: Vec<Card>) {
        self.cards.splice(0..0, cards);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn card(id: &str) -> Card {
        Card::new(id, Category::Object, vec![format!("prompt {}", id)])
    }

    fn pool(n: usize) -> Vec<Card> {
        (0..n).map(|i| card(&format!("c{:02}", i))).collect()
    }

    fn sorted_ids(cards: &[Card]) -> Vec<String> {
        let mut ids: Vec<String> = cards.iter().map(|c| c.id.clone()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let pool = pool(30);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let deck = Deck::shuffled(&pool, &mut rng);
            assert_eq!(deck.len(), pool.len());
            assert_eq!(sorted_ids(&deck.cards), sorted_ids(&pool));
        }
    }

    #[test]
    fn test_shuffle_same_seed_same_order() {
        let pool = pool(10);
        let a = Deck::shuffled(&pool, &mut StdRng::seed_from_u64(7));
        let b = Deck::shuffled(&pool, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_draw_takes_first_card() {
        let pool = pool(5);
        let mut rng = StdRng::seed_from_u64(1);
        let mut deck = Deck::shuffled(&pool, &mut rng);
        let first = deck.cards[0].clone();

        let outcome = deck.draw(false, &pool, &mut rng);
        assert_eq!(outcome, DrawOutcome::Drawn(first.clone()));
        assert_eq!(deck.len(), 4);
        assert!(!deck.contains(&first.id));
    }

    #[test]
    fn test_draw_single_card_reshuffles_discard() {
        let pool = pool(1);
        let mut rng = StdRng::seed_from_u64(3);
        let mut deck = Deck::shuffled(&pool, &mut rng);

        let DrawOutcome::Drawn(drawn) = deck.draw(false, &pool, &mut rng) else {
            panic!("expected a card");
        };
        deck.discard(&drawn.id);
        assert!(deck.is_empty());

        // Same card comes back since it's the only one available
        let again = deck.draw(false, &pool, &mut rng);
        assert_eq!(again, DrawOutcome::Drawn(drawn));
        assert!(deck.discard.is_empty());
        assert!(deck.is_empty());
    }

    #[test]
    fn test_draw_empty_without_ai() {
        let mut deck = Deck::default();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(deck.draw(false, &pool(3), &mut rng), DrawOutcome::Empty);
    }

    #[test]
    fn test_draw_empty_with_ai_requests_generation() {
        let pool = pool(2);
        let mut deck = Deck::default();
        deck.discard("c00");
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(deck.draw(true, &pool, &mut rng), DrawOutcome::NeedsGeneration);
        // Discard untouched in AI mode
        assert_eq!(deck.discard, vec!["c00".to_string()]);
    }

    #[test]
    fn test_discard_is_idempotent() {
        let mut deck = Deck::default();
        deck.discard("a");
        deck.discard("a");
        assert_eq!(deck.discard.len(), 1);
    }

    #[test]
    fn test_reshuffle_drops_unknown_ids() {
        let pool = pool(3);
        let mut deck = Deck::default();
        deck.discard("c00");
        deck.discard("ghost");
        deck.discard("c02");
        let mut rng = StdRng::seed_from_u64(9);
        deck.reshuffle_discard(&pool, &mut rng);
        assert_eq!(sorted_ids(&deck.cards), vec!["c00", "c02"]);
        assert!(deck.discard.is_empty());
    }

    #[test]
    fn test_push_front_keeps_order() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut deck = Deck::shuffled(&pool(2), &mut rng);
        deck.push_front(vec![card("g1"), card("g2")]);
        assert_eq!(deck.cards[0].id, "g1");
        assert_eq!(deck.cards[1].id, "g2");
        assert_eq!(deck.len(), 4);
    }

    #[test]
    fn test_draining_whole_deck_never_repeats_within_a_pass() {
        let pool = pool(8);
        let mut rng = StdRng::seed_from_u64(11);
        let mut deck = Deck::shuffled(&pool, &mut rng);
        let mut seen = Vec::new();
        for _ in 0..pool.len() {
            match deck.draw(false, &pool, &mut rng) {
                DrawOutcome::Drawn(c) => {
                    assert!(!seen.contains(&c.id));
                    seen.push(c.id.clone());
                    deck.discard(&c.id);
                }
                other => panic!("unexpected {:?}", other),
            }
        }
        assert_eq!(deck.discard.len(), pool.len());
    }
}

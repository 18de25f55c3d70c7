//! Match state machine.
//!
//! `Game` owns every piece of gameplay state. It is only mutated through
//! [`Game::dispatch`], which applies one [`Action`] and returns the side
//! effects the runtime has to carry out (timers, network calls, messages).
//! Results of those effects come back in as further actions.

mod turn;


use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::ai::{GenerateCardsOptions, GenerateCardsResponse, GenerationError, GenerationRequest};
use crate::analytics::GenerationLog;
use crate::clock::Clock;
use crate::config::DEFAULT_AUTO_PASS_DELAY_MS;
use crate::deck::{Deck, DrawOutcome};
use crate::models::{Card, Category, Difficulty, HistoryItem, Settings, SettingsPatch, Team, TurnPhase};

pub use turn::{AiGenerationStatus, TurnState};

const INVALID_KEY_MESSAGE: &str = "Invalid API key. Check the key and try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetSettings(SettingsPatch),
    AddTeam(String),
    RemoveTeam(String),
    StartMatch,
    ResetMatch,
    DrawCard,
    StartTurn,
    Tick,
    AddPoint { team_index: usize, amount: u32 },
    /// Deferred end of a turn whose card hit the point cap
    AutoPass { serial: u64 },
    EndTurn { passed: bool },
    NextTeam,
    SetApiKey(String),
    ValidateApiKey(String),
    ApiKeyValidated { key: String, valid: bool },
    GenerateCard {
        category: Option<Category>,
        difficulty: Option<Difficulty>,
    },
    CardGenerated(Result<Card, String>),
    GenerateBatch {
        category: Category,
        difficulty: Option<Difficulty>,
        count: usize,
    },
    BatchGenerated(GenerateCardsResponse),
    AcceptPreview,
    DiscardPreview,
    ClearAiError,
    ClearLastGeneratedCard,
}

impl Action {
    /// Short name for logs. Keeps keys and card text out of them.
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetSettings(_) => "set_settings",
            Action::AddTeam(_) => "add_team",
            Action::RemoveTeam(_) => "remove_team",
            Action::StartMatch => "start_match",
            Action::ResetMatch => "reset_match",
            Action::DrawCard => "draw_card",
            Action::StartTurn => "start_turn",
            Action::Tick => "tick",
            Action::AddPoint { .. } => "add_point",
            Action::AutoPass { .. } => "auto_pass",
            Action::EndTurn { .. } => "end_turn",
            Action::NextTeam => "next_team",
            Action::SetApiKey(_) => "set_api_key",
            Action::ValidateApiKey(_) => "validate_api_key",
            Action::ApiKeyValidated { .. } => "api_key_validated",
            Action::GenerateCard { .. } => "generate_card",
            Action::CardGenerated(_) => "card_generated",
            Action::GenerateBatch { .. } => "generate_batch",
            Action::BatchGenerated(_) => "batch_generated",
            Action::AcceptPreview => "accept_preview",
            Action::DiscardPreview => "discard_preview",
            Action::ClearAiError => "clear_ai_error",
            Action::ClearLastGeneratedCard => "clear_last_generated_card",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Countdown reached zero
    Timeout,
    /// Ended by the players without passing
    Finished,
    Passed,
    /// Card point cap reached; the next team is already active
    AutoPass,
}

/// Side effect requested by a dispatched action
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    TurnStarted,
    TurnEnded { reason: EndReason },
    /// Dispatch `action` once `delay` has elapsed
    Schedule { delay: Duration, action: Action },
    Generate(GenerationRequest),
    GenerateBatch(GenerateCardsOptions),
    ValidateKey(String),
    Notify(String),
}

/// Persisted form of the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub deck: Deck,
    #[serde(default)]
    pub turn: TurnState,
    #[serde(default)]
    pub history: Vec<HistoryItem>,
    #[serde(default)]
    pub ai_generation: AiGenerationStatus,
    #[serde(default)]
    pub generated_cards: Vec<Card>,
    #[serde(default)]
    pub generation_log: GenerationLog,
    #[serde(default)]
    pub last_generated_card: Option<Card>,
}

pub struct Game {
    settings: Settings,
    teams: Vec<Team>,
    deck: Deck,
    turn: TurnState,
    history: Vec<HistoryItem>,
    ai_generation: AiGenerationStatus,
    last_generated_card: Option<Card>,
    /// Every AI card accepted into play
    generated: Vec<Card>,
    /// Batch results waiting to be accepted or dropped
    preview: Vec<Card>,
    generation_log: GenerationLog,
    key_error: Option<String>,
    key_validating: bool,
    /// A draw is waiting for a generated card
    pending_draw: bool,
    /// Difficulty of the request in flight
    in_flight: Option<Difficulty>,
    pool: Vec<Card>,
    auto_pass_delay: Duration,
    clock: Arc<dyn Clock>,
    rng: StdRng,
}

impl Game {
    pub fn new(settings: Settings, pool: Vec<Card>, clock: Arc<dyn Clock>, mut rng: StdRng) -> Self {
        let deck = Deck::shuffled(&pool, &mut rng);
        let turn = TurnState::idle(0, settings.round_seconds, 0);
        Self {
            settings,
            teams: Vec::new(),
            deck,
            turn,
            history: Vec::new(),
            ai_generation: AiGenerationStatus::default(),
            last_generated_card: None,
            generated: Vec::new(),
            preview: Vec::new(),
            generation_log: GenerationLog::default(),
            key_error: None,
            key_validating: false,
            pending_draw: false,
            in_flight: None,
            pool,
            auto_pass_delay: Duration::from_millis(DEFAULT_AUTO_PASS_DELAY_MS),
            clock,
            rng,
        }
    }

    pub fn with_auto_pass_delay(mut self, delay: Duration) -> Self {
        self.auto_pass_delay = delay;
        self
    }

    // Accessors

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn history(&self) -> &[HistoryItem] {
        &self.history
    }

    pub fn ai_generation(&self) -> &AiGenerationStatus {
        &self.ai_generation
    }

    pub fn last_generated_card(&self) -> Option<&Card> {
        self.last_generated_card.as_ref()
    }

    pub fn generated_cards(&self) -> &[Card] {
        &self.generated
    }

    pub fn preview(&self) -> &[Card] {
        &self.preview
    }

    pub fn generation_log(&self) -> &GenerationLog {
        &self.generation_log
    }

    pub fn key_error(&self) -> Option<&str> {
        self.key_error.as_deref()
    }

    pub fn is_validating_key(&self) -> bool {
        self.key_validating
    }

    pub fn is_draw_pending(&self) -> bool {
        self.pending_draw
    }

    pub fn pool(&self) -> &[Card] {
        &self.pool
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    // Queries

    pub fn phase(&self) -> TurnPhase {
        self.turn.phase()
    }

    pub fn current_team(&self) -> Option<&Team> {
        self.teams.get(self.turn.current_team_index)
    }

    /// Look a card up in the pool, the AI library, the deck or the preview
    pub fn card(&self, id: &str) -> Option<&Card> {
        self.pool
            .iter()
            .chain(&self.generated)
            .chain(&self.deck.cards)
            .chain(&self.preview)
            .find(|c| c.id == id)
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.turn.current_card_id.as_deref().and_then(|id| self.card(id))
    }

    pub fn can_start_turn(&self) -> bool {
        !self.turn.is_running && !self.teams.is_empty() && self.turn.is_card_drawn()
    }

    pub fn can_draw(&self) -> bool {
        !self.turn.is_running && !self.pending_draw
    }

    /// Team at or above the target with the most points. Ties go to the
    /// earlier team.
    pub fn winner(&self) -> Option<&Team> {
        let target = self.settings.target_points;
        let mut best: Option<&Team> = None;
        for team in self.teams.iter().filter(|t| t.points >= target) {
            if best.is_none_or(|b| team.points > b.points) {
                best = Some(team);
            }
        }
        best
    }

    fn ai_draw_available(&self) -> bool {
        self.settings.ai_only_mode && self.settings.has_api_key()
    }

    // Snapshots

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            settings: self.settings.clone(),
            teams: self.teams.clone(),
            deck: self.deck.clone(),
            turn: self.turn.clone(),
            history: self.history.clone(),
            ai_generation: self.ai_generation.clone(),
            generated_cards: self.generated.clone(),
            generation_log: self.generation_log.clone(),
            last_generated_card: self.last_generated_card.clone(),
        }
    }

    /// Replace the game state with a persisted snapshot.
    /// In-flight work from the previous session is forgotten.
    pub fn restore(&mut self, snapshot: GameSnapshot) {
        self.settings = snapshot.settings;
        self.teams = snapshot.teams;
        self.deck = snapshot.deck;
        self.turn = snapshot.turn;
        self.history = snapshot.history;
        self.ai_generation = snapshot.ai_generation;
        self.generated = snapshot.generated_cards;
        self.generation_log = snapshot.generation_log;
        self.last_generated_card = snapshot.last_generated_card;

        self.ai_generation.is_generating = false;
        self.pending_draw = false;
        self.in_flight = None;
        self.key_validating = false;
        self.turn.auto_pass_pending = false;
        self.clamp_team_index();

        if let Some(id) = self.turn.current_card_id.clone() {
            if self.card(&id).is_none() {
                tracing::warn!(card_id = %id, "restored active card is unknown, resetting turn");
                self.turn = TurnState::idle(
                    self.turn.current_team_index,
                    self.settings.round_seconds,
                    self.turn.serial,
                );
            }
        } else if self.turn.is_running {
            self.turn.is_running = false;
        }

        tracing::info!(
            teams = self.teams.len(),
            deck = self.deck.len(),
            history = self.history.len(),
            "restored game snapshot"
        );
    }

    // Dispatch

    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        if !matches!(action, Action::Tick) {
            tracing::debug!(action = action.name(), "dispatch");
        }

        match action {
            Action::SetSettings(patch) => {
                self.settings.apply(&patch);
                if !self.turn.is_running {
                    self.turn.remaining = self.settings.round_seconds;
                }
                Vec::new()
            }
            Action::AddTeam(name) => {
                let name = name.trim();
                if name.is_empty() {
                    tracing::debug!("ignoring team with empty name");
                } else {
                    self.teams.push(Team::new(name));
                }
                Vec::new()
            }
            Action::RemoveTeam(id) => {
                self.teams.retain(|t| t.id != id);
                self.clamp_team_index();
                Vec::new()
            }
            Action::StartMatch => {
                self.start_match(self.settings.ai_only_mode);
                Vec::new()
            }
            Action::ResetMatch => {
                self.start_match(false);
                self.teams.clear();
                Vec::new()
            }
            Action::DrawCard => self.draw_card(),
            Action::StartTurn => self.start_turn(),
            Action::Tick => self.tick(),
            Action::AddPoint { team_index, amount } => self.add_point(team_index, amount),
            Action::AutoPass { serial } => self.auto_pass(serial),
            Action::EndTurn { passed } => {
                self.end_turn(passed);
                let reason = if passed { EndReason::Passed } else { EndReason::Finished };
                vec![Effect::TurnEnded { reason }]
            }
            Action::NextTeam => {
                self.next_team();
                Vec::new()
            }
            Action::SetApiKey(key) => {
                self.set_api_key(&key);
                Vec::new()
            }
            Action::ValidateApiKey(key) => {
                let key = key.trim();
                if key.is_empty() {
                    self.key_error = Some("Enter an API key".to_string());
                    return Vec::new();
                }
                self.key_error = None;
                self.key_validating = true;
                vec![Effect::ValidateKey(key.to_string())]
            }
            Action::ApiKeyValidated { key, valid } => {
                self.key_validating = false;
                if valid {
                    self.set_api_key(&key);
                    vec![Effect::Notify("API key saved".to_string())]
                } else {
                    self.key_error = Some(INVALID_KEY_MESSAGE.to_string());
                    Vec::new()
                }
            }
            Action::GenerateCard {
                category,
                difficulty,
            } => self.generate_card(category, difficulty),
            Action::CardGenerated(result) => self.card_generated(result),
            Action::GenerateBatch {
                category,
                difficulty,
                count,
            } => self.generate_batch(category, difficulty, count),
            Action::BatchGenerated(response) => self.batch_generated(response),
            Action::AcceptPreview => {
                let mut cards = std::mem::take(&mut self.preview);
                cards.retain(|c| !self.deck.contains(&c.id));
                if cards.is_empty() {
                    return Vec::new();
                }
                let count = cards.len();
                self.add_to_library(&cards);
                self.deck.push_front(cards);
                vec![Effect::Notify(format!("Added {} cards to the deck", count))]
            }
            Action::DiscardPreview => {
                self.preview.clear();
                Vec::new()
            }
            Action::ClearAiError => {
                self.ai_generation.error = None;
                self.key_error = None;
                Vec::new()
            }
            Action::ClearLastGeneratedCard => {
                self.last_generated_card = None;
                Vec::new()
            }
        }
    }

    fn clamp_team_index(&mut self) {
        self.turn.current_team_index = if self.teams.is_empty() {
            0
        } else {
            self.turn.current_team_index.min(self.teams.len() - 1)
        };
    }

    fn start_match(&mut self, empty_deck: bool) {
        self.deck = if empty_deck {
            Deck::default()
        } else {
            let known: Vec<Card> = self.pool.iter().chain(&self.generated).cloned().collect();
            Deck::shuffled(&known, &mut self.rng)
        };
        self.history.clear();
        for team in &mut self.teams {
            team.points = 0;
        }
        self.pending_draw = false;
        self.turn = TurnState::idle(0, self.settings.round_seconds, self.turn.serial);
        tracing::info!(
            teams = self.teams.len(),
            deck = self.deck.len(),
            ai_only = empty_deck,
            "match started"
        );
    }

    fn draw_card(&mut self) -> Vec<Effect> {
        if self.turn.is_running {
            tracing::debug!("draw ignored while the turn is running");
            return Vec::new();
        }

        if let Some(previous) = self.turn.current_card_id.take() {
            self.deck.discard(&previous);
        }
        self.turn.current_card_points = 0;

        let ai_available = self.ai_draw_available();
        let outcome = self.deck.draw(
            ai_available,
            self.pool.iter().chain(&self.generated),
            &mut self.rng,
        );
        match outcome {
            DrawOutcome::Drawn(card) => {
                tracing::debug!(card_id = %card.id, remaining = self.deck.len(), "card drawn");
                self.turn.current_card_id = Some(card.id);
                Vec::new()
            }
            DrawOutcome::NeedsGeneration => {
                let effects = self.generate_card(None, None);
                if effects.iter().any(|e| matches!(e, Effect::Generate(_))) {
                    self.pending_draw = true;
                    effects
                } else if self.ai_generation.is_generating {
                    vec![Effect::Notify(
                        "AI is still generating, draw again when it finishes".to_string(),
                    )]
                } else {
                    effects
                }
            }
            DrawOutcome::Empty => {
                tracing::warn!("no card available to draw");
                vec![Effect::Notify("No cards available".to_string())]
            }
        }
    }

    fn start_turn(&mut self) -> Vec<Effect> {
        if !self.can_start_turn() {
            tracing::debug!(phase = ?self.phase(), teams = self.teams.len(), "turn start ignored");
            return Vec::new();
        }
        self.turn.is_running = true;
        self.turn.started_at = Some(self.clock.now_millis());
        self.turn.remaining = self.settings.round_seconds;
        self.turn.current_card_points = 0;
        self.turn.correct_this_turn = 0;
        self.turn.auto_pass_pending = false;
        self.turn.serial += 1;
        tracing::info!(
            team = self.current_team().map(|t| t.name.as_str()).unwrap_or(""),
            serial = self.turn.serial,
            "turn started"
        );
        vec![Effect::TurnStarted]
    }

    fn tick(&mut self) -> Vec<Effect> {
        if !self.turn.is_running {
            return Vec::new();
        }
        self.turn.remaining = self.turn.remaining.saturating_sub(1);
        if self.turn.remaining > 0 {
            return Vec::new();
        }
        tracing::info!("turn timed out");
        self.end_turn(false);
        vec![Effect::TurnEnded {
            reason: EndReason::Timeout,
        }]
    }

    fn add_point(&mut self, team_index: usize, amount: u32) -> Vec<Effect> {
        let Some(team) = self.teams.get_mut(team_index) else {
            tracing::warn!(team_index, "point for unknown team ignored");
            return Vec::new();
        };
        team.points = team.points.saturating_add(amount);

        let own_turn = self.turn.is_running && team_index == self.turn.current_team_index;
        if !own_turn {
            return Vec::new();
        }
        self.turn.current_card_points = self.turn.current_card_points.saturating_add(amount);
        self.turn.correct_this_turn = self.turn.correct_this_turn.saturating_add(amount);

        if self.settings.auto_pass_on_max_points
            && self.turn.current_card_points >= self.settings.max_points_per_card
            && !self.turn.auto_pass_pending
        {
            self.turn.auto_pass_pending = true;
            return vec![
                Effect::Notify("Point cap reached, passing to the next team".to_string()),
                Effect::Schedule {
                    delay: self.auto_pass_delay,
                    action: Action::AutoPass {
                        serial: self.turn.serial,
                    },
                },
            ];
        }
        Vec::new()
    }

    fn auto_pass(&mut self, serial: u64) -> Vec<Effect> {
        if !self.turn.is_running || self.turn.serial != serial {
            tracing::debug!(serial, current = self.turn.serial, "stale auto-pass dropped");
            return Vec::new();
        }
        self.end_turn(false);
        self.next_team();
        vec![Effect::TurnEnded {
            reason: EndReason::AutoPass,
        }]
    }

    fn end_turn(&mut self, passed: bool) {
        if let Some(card_id) = self.turn.current_card_id.take() {
            self.deck.discard(&card_id);
            if let Some(team) = self.teams.get(self.turn.current_team_index) {
                self.history.push(HistoryItem {
                    team_id: team.id.clone(),
                    card_id,
                    correct: self.turn.correct_this_turn,
                    passed,
                    timestamp: self.clock.now_millis(),
                });
            }
        }
        self.turn = TurnState::idle(
            self.turn.current_team_index,
            self.settings.round_seconds,
            self.turn.serial,
        );
    }

    fn next_team(&mut self) {
        if self.teams.is_empty() {
            return;
        }
        self.turn.current_team_index = (self.turn.current_team_index + 1) % self.teams.len();
    }

    fn set_api_key(&mut self, key: &str) {
        let key = key.trim();
        self.settings.gemini_api_key = key.to_string();
        self.settings.use_ai = !key.is_empty();
        self.key_error = None;
    }

    fn generate_card(
        &mut self,
        category: Option<Category>,
        difficulty: Option<Difficulty>,
    ) -> Vec<Effect> {
        if !self.settings.has_api_key() {
            self.ai_generation.error = Some(GenerationError::MissingApiKey.to_string());
            self.pending_draw = false;
            return Vec::new();
        }
        if self.ai_generation.is_generating {
            tracing::debug!("generation already in progress");
            return Vec::new();
        }

        let category = match category {
            Some(c) if c != Category::Free => c,
            _ => self.random_category(),
        };
        let difficulty = difficulty.unwrap_or(self.settings.ai_difficulty);
        self.ai_generation.is_generating = true;
        self.ai_generation.error = None;
        self.in_flight = Some(difficulty);

        vec![Effect::Generate(GenerationRequest {
            category,
            difficulty,
            language: self.settings.ai_language,
        })]
    }

    fn random_category(&mut self) -> Category {
        Category::CONCRETE
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Category::Object)
    }

    fn card_generated(&mut self, result: Result<Card, String>) -> Vec<Effect> {
        self.ai_generation.is_generating = false;
        let difficulty = self.in_flight.take().unwrap_or(self.settings.ai_difficulty);

        let card = match result {
            Ok(card) => card,
            Err(message) => {
                tracing::error!(error = %message, "card generation failed");
                self.ai_generation.error = Some(message);
                self.pending_draw = false;
                return Vec::new();
            }
        };

        let now = self.clock.now_millis();
        self.ai_generation.last_generated = Some(now);
        self.generation_log.record(now, &card, difficulty);
        self.add_to_library(std::slice::from_ref(&card));
        self.deck.push_front(vec![card.clone()]);
        tracing::info!(card_id = %card.id, category = card.category.label(), "AI card added");
        self.last_generated_card = Some(card);

        if self.pending_draw {
            self.pending_draw = false;
            return self.draw_card();
        }
        Vec::new()
    }

    fn generate_batch(
        &mut self,
        category: Category,
        difficulty: Option<Difficulty>,
        count: usize,
    ) -> Vec<Effect> {
        if !self.settings.has_api_key() {
            self.ai_generation.error = Some(GenerationError::MissingApiKey.to_string());
            return Vec::new();
        }
        if self.ai_generation.is_generating || count == 0 {
            return Vec::new();
        }
        let category = if category == Category::Free {
            self.random_category()
        } else {
            category
        };
        let difficulty = difficulty.unwrap_or(self.settings.ai_difficulty);
        self.ai_generation.is_generating = true;
        self.ai_generation.error = None;
        self.in_flight = Some(difficulty);
        self.preview.clear();

        vec![Effect::GenerateBatch(GenerateCardsOptions {
            category,
            difficulty,
            count,
            language: self.settings.ai_language,
        })]
    }

    fn batch_generated(&mut self, response: GenerateCardsResponse) -> Vec<Effect> {
        self.ai_generation.is_generating = false;
        // Batches never fulfil a deferred draw
        self.pending_draw = false;
        let difficulty = self.in_flight.take().unwrap_or(self.settings.ai_difficulty);

        if !response.cards.is_empty() {
            let now = self.clock.now_millis();
            self.ai_generation.last_generated = Some(now);
            for card in &response.cards {
                self.generation_log.record(now, card, difficulty);
            }
        }
        if let Some(error) = &response.error {
            tracing::error!(error = %error, kept = response.cards.len(), "batch generation failed");
        }
        self.ai_generation.error = response.error;
        self.preview = response.cards;
        Vec::new()
    }

    fn add_to_library(&mut self, cards: &[Card]) {
        for card in cards {
            if !self.generated.iter().any(|c| c.id == card.id) {
                self.generated.push(card.clone());
            }
        }
    }
}

//! Application state and core logic for the Mimica TUI.
//!
//! `App` owns the `Game` and everything around it: screen and form state,
//! the countdown ticker, deferred actions, the tokio handle used for AI
//! requests and the store the game is saved to.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::ai::{self, GeminiClient};
use crate::analytics;
use crate::config::{ConfigCheck, EnvConfig};
use crate::game::{Action, Effect, EndReason, Game};
use crate::input::Command;
use crate::models::settings::{cycle_option, ROUND_SECONDS_OPTIONS, TARGET_POINTS_OPTIONS};
use crate::models::{Category, Difficulty, Screen, SettingsPatch};
use crate::storage::Store;
use crate::timer::{Scheduler, Ticker};

/// Minimum time between two saves of a changed game
const SAVE_INTERVAL: Duration = Duration::from_secs(1);

/// How long a status message stays visible
const STATUS_TTL: Duration = Duration::from_secs(4);

const MAX_BATCH_COUNT: usize = 20;
const MAX_POINTS_PER_CARD_LIMIT: u32 = 20;
const MAX_TEAM_NAME_LEN: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub text: String,
    pub kind: StatusKind,
    pub since: Instant,
}

/// Focusable rows of the setup screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    TeamName,
    Teams,
    RoundSeconds,
    TargetPoints,
    MaxPointsPerCard,
    AutoPass,
    ShowCard,
    AiOnly,
    AiDifficulty,
    AiLanguage,
}

impl SetupField {
    pub const ALL: [SetupField; 10] = [
        SetupField::TeamName,
        SetupField::Teams,
        SetupField::RoundSeconds,
        SetupField::TargetPoints,
        SetupField::MaxPointsPerCard,
        SetupField::AutoPass,
        SetupField::ShowCard,
        SetupField::AiOnly,
        SetupField::AiDifficulty,
        SetupField::AiLanguage,
    ];

    fn step(self, forward: bool) -> Self {
        let len = Self::ALL.len();
        let idx = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        Self::ALL[next]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupForm {
    pub field: SetupField,
    pub team_name: String,
    pub selected_team: usize,
}

impl Default for SetupForm {
    fn default() -> Self {
        Self {
            field: SetupField::TeamName,
            team_name: String::new(),
            selected_team: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorForm {
    pub category: Category,
    pub difficulty: Difficulty,
    pub count: usize,
}

/// Application state
pub struct App {
    pub game: Game,
    store: Option<Store>,
    runtime: Handle,
    tx: UnboundedSender<Action>,
    rx: UnboundedReceiver<Action>,
    ticker: Ticker,
    scheduler: Scheduler<Action>,
    pub screen: Screen,
    previous_screen: Screen,
    pub setup: SetupForm,
    pub generator: GeneratorForm,
    pub api_key_input: String,
    pub card_visible: bool,
    pub status: Option<StatusLine>,
    pub config_check: ConfigCheck,
    export_dir: PathBuf,
    dirty: bool,
    last_save: Instant,
    pub should_quit: bool,
    // Animation state
    pub animation_tick: u64,
    last_animation_update: Instant,
}

impl App {
    pub fn new(
        game: Game,
        store: Option<Store>,
        runtime: Handle,
        env: &EnvConfig,
        export_dir: PathBuf,
        now: Instant,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut ticker = Ticker::every_second();
        // A turn saved mid-countdown picks up where it left off
        if game.turn().is_running {
            ticker.arm(now);
        }
        let screen = if game.teams().is_empty() {
            Screen::Setup
        } else {
            Screen::Play
        };
        let generator = GeneratorForm {
            category: Category::Free,
            difficulty: game.settings().ai_difficulty,
            count: 5,
        };
        let card_visible = game.settings().show_card_by_default;

        Self {
            game,
            store,
            runtime,
            tx,
            rx,
            ticker,
            scheduler: Scheduler::default(),
            screen,
            previous_screen: screen,
            setup: SetupForm::default(),
            generator,
            api_key_input: String::new(),
            card_visible,
            status: None,
            config_check: env.check(),
            export_dir,
            dirty: false,
            last_save: now,
            should_quit: false,
            animation_tick: 0,
            last_animation_update: now,
        }
    }

    /// Whether key presses go into a text field
    pub fn is_editing(&self) -> bool {
        match self.screen {
            Screen::Setup => self.setup.field == SetupField::TeamName,
            Screen::ApiKey => true,
            _ => false,
        }
    }

    /// Screen shown behind the API key modal
    pub fn underlying_screen(&self) -> Screen {
        self.previous_screen
    }

    pub fn ticker_progress(&self, now: Instant) -> f64 {
        self.ticker.progress(now)
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind, now: Instant) {
        self.status = Some(StatusLine {
            text: text.into(),
            kind,
            since: now,
        });
    }

    // Dispatch and effects

    /// Dispatch an action and carry out its effects
    pub fn apply(&mut self, action: Action, now: Instant) {
        let key_accepted = matches!(action, Action::ApiKeyValidated { valid: true, .. });
        let effects = self.game.dispatch(action);
        self.dirty = true;
        if key_accepted && self.screen == Screen::ApiKey {
            self.api_key_input.clear();
            self.screen = self.previous_screen;
        }
        self.run_effects(effects, now);
    }

    fn run_effects(&mut self, effects: Vec<Effect>, now: Instant) {
        for effect in effects {
            match effect {
                Effect::TurnStarted => self.ticker.arm(now),
                Effect::TurnEnded { reason } => self.turn_ended(reason, now),
                Effect::Schedule { delay, action } => self.scheduler.schedule(now, delay, action),
                Effect::Generate(request) => {
                    let key = self.game.settings().gemini_api_key.clone();
                    let clock = self.game.clock();
                    let tx = self.tx.clone();
                    self.runtime.spawn(async move {
                        let result = match GeminiClient::new(&key) {
                            Ok(client) => ai::generate_single_card(&client, request, clock.as_ref())
                                .await
                                .map_err(|e| e.to_string()),
                            Err(e) => Err(e.to_string()),
                        };
                        let _ = tx.send(Action::CardGenerated(result));
                    });
                }
                Effect::GenerateBatch(options) => {
                    let key = self.game.settings().gemini_api_key.clone();
                    let clock = self.game.clock();
                    let tx = self.tx.clone();
                    self.runtime.spawn(async move {
                        let response = match GeminiClient::new(&key) {
                            Ok(client) => {
                                ai::generate_cards(&client, &options, clock.as_ref(), ai::BATCH_DELAY)
                                    .await
                            }
                            Err(e) => ai::GenerateCardsResponse {
                                cards: Vec::new(),
                                error: Some(e.to_string()),
                            },
                        };
                        let _ = tx.send(Action::BatchGenerated(response));
                    });
                }
                Effect::ValidateKey(key) => {
                    let tx = self.tx.clone();
                    self.runtime.spawn(async move {
                        let valid = match GeminiClient::new(&key) {
                            Ok(client) => ai::validate_api_key(&client).await,
                            Err(_) => false,
                        };
                        let _ = tx.send(Action::ApiKeyValidated { key, valid });
                    });
                }
                Effect::Notify(message) => self.set_status(message, StatusKind::Info, now),
            }
        }
    }

    /// Finished and timed-out turns advance unless someone won; passing
    /// always advances. Auto-pass has already moved on.
    fn turn_ended(&mut self, reason: EndReason, now: Instant) {
        self.ticker.disarm();
        let advance = match reason {
            EndReason::Passed => true,
            EndReason::Timeout | EndReason::Finished => self.game.winner().is_none(),
            EndReason::AutoPass => false,
        };
        if reason == EndReason::Timeout {
            self.set_status("Time's up!", StatusKind::Warning, now);
        }
        if advance {
            let effects = self.game.dispatch(Action::NextTeam);
            self.run_effects(effects, now);
        }
        if let Some(winner) = self.game.winner() {
            let text = format!("{} wins with {} points!", winner.name, winner.points);
            self.set_status(text, StatusKind::Info, now);
        }
        self.card_visible = self.game.settings().show_card_by_default;
    }

    // Frame updates

    /// Deliver due ticks, scheduled actions and async results, then save
    pub fn on_frame(&mut self, now: Instant) {
        for _ in 0..self.ticker.due(now) {
            self.apply(Action::Tick, now);
        }
        for action in self.scheduler.drain_due(now) {
            self.apply(action, now);
        }
        while let Ok(action) = self.rx.try_recv() {
            self.apply(action, now);
        }

        if self
            .status
            .as_ref()
            .is_some_and(|s| now.duration_since(s.since) >= STATUS_TTL)
        {
            self.status = None;
        }

        if now.duration_since(self.last_animation_update) >= Duration::from_millis(250) {
            self.animation_tick = self.animation_tick.wrapping_add(1);
            self.last_animation_update = now;
        }

        if self.dirty && now.duration_since(self.last_save) >= SAVE_INTERVAL {
            self.save(now);
        }
    }

    pub fn save(&mut self, now: Instant) {
        self.dirty = false;
        self.last_save = now;
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save_snapshot(&self.game.snapshot()) {
            tracing::error!(error = %e, "failed to save game");
            self.set_status(format!("Save failed: {}", e), StatusKind::Error, now);
        }
    }

    /// Final save before exit
    pub fn shutdown(&mut self, now: Instant) {
        self.save(now);
        tracing::info!("shutting down");
    }

    // Commands

    pub fn handle_command(&mut self, command: Command, now: Instant) {
        match command {
            Command::Quit => self.should_quit = true,
            Command::Back => self.back(),
            Command::Show(screen) => self.show(screen),

            Command::InputChar(c) => match self.screen {
                Screen::ApiKey => self.api_key_input.push(c),
                _ if self.setup.team_name.chars().count() < MAX_TEAM_NAME_LEN => {
                    self.setup.team_name.push(c)
                }
                _ => {}
            },
            Command::InputBackspace => {
                if self.screen == Screen::ApiKey {
                    self.api_key_input.pop();
                } else {
                    self.setup.team_name.pop();
                }
            }
            Command::Submit => {
                if self.screen == Screen::ApiKey {
                    let key = self.api_key_input.clone();
                    self.apply(Action::ValidateApiKey(key), now);
                } else {
                    let name = std::mem::take(&mut self.setup.team_name);
                    if name.trim().is_empty() {
                        self.start_match(now);
                    } else {
                        self.apply(Action::AddTeam(name), now);
                    }
                }
            }

            Command::NextField => self.setup.field = self.setup.field.step(true),
            Command::PrevField => self.setup.field = self.setup.field.step(false),
            Command::Adjust { forward } => self.adjust_field(forward, now),
            Command::Toggle => self.adjust_field(true, now),
            Command::RemoveTeam => {
                if let Some(team) = self.game.teams().get(self.setup.selected_team) {
                    let id = team.id.clone();
                    self.apply(Action::RemoveTeam(id), now);
                    let len = self.game.teams().len();
                    self.setup.selected_team = self.setup.selected_team.min(len.saturating_sub(1));
                }
            }
            Command::StartMatch => self.start_match(now),

            Command::DrawCard => {
                if self.game.can_draw() {
                    self.apply(Action::DrawCard, now);
                    self.card_visible = self.game.settings().show_card_by_default;
                }
            }
            Command::StartTurn => {
                if self.game.can_start_turn() {
                    self.apply(Action::StartTurn, now);
                } else if !self.game.turn().is_running {
                    self.set_status("Draw a card first (d)", StatusKind::Warning, now);
                }
            }
            Command::ScoreCurrent => {
                let team_index = self.game.turn().current_team_index;
                self.apply(Action::AddPoint { team_index, amount: 1 }, now);
            }
            Command::ScoreTeam(team_index) => {
                if team_index < self.game.teams().len() {
                    self.apply(Action::AddPoint { team_index, amount: 1 }, now);
                }
            }
            Command::Pass => {
                if self.game.turn().is_running || self.game.turn().is_card_drawn() {
                    self.apply(Action::EndTurn { passed: true }, now);
                }
            }
            Command::FinishTurn => {
                if self.game.turn().is_running || self.game.turn().is_card_drawn() {
                    self.apply(Action::EndTurn { passed: false }, now);
                }
            }
            Command::NextTeam => {
                if !self.game.turn().is_running {
                    self.apply(Action::NextTeam, now);
                }
            }
            Command::ToggleCard => self.card_visible = !self.card_visible,
            Command::GenerateCard => {
                let (category, difficulty) = if self.screen == Screen::Generator {
                    (Some(self.generator.category), Some(self.generator.difficulty))
                } else {
                    (None, None)
                };
                self.apply(Action::GenerateCard { category, difficulty }, now);
            }
            Command::NewMatch => {
                self.ticker.disarm();
                self.apply(Action::StartMatch, now);
                self.set_status("New match started", StatusKind::Info, now);
            }
            Command::ResetMatch => {
                self.ticker.disarm();
                self.apply(Action::ResetMatch, now);
                self.setup = SetupForm::default();
                self.screen = Screen::Setup;
            }
            Command::ClearAi => {
                self.apply(Action::ClearAiError, now);
                self.apply(Action::ClearLastGeneratedCard, now);
            }

            Command::CycleCategory { forward } => {
                let c = self.generator.category;
                self.generator.category = if forward { c.next() } else { c.prev() };
            }
            Command::CycleDifficulty { forward } => {
                let d = self.generator.difficulty;
                self.generator.difficulty = if forward { d.next() } else { d.prev() };
            }
            Command::AdjustCount(delta) => {
                let count = self.generator.count as i64 + delta as i64;
                self.generator.count = count.clamp(1, MAX_BATCH_COUNT as i64) as usize;
            }
            Command::GenerateBatch => {
                let action = Action::GenerateBatch {
                    category: self.generator.category,
                    difficulty: Some(self.generator.difficulty),
                    count: self.generator.count,
                };
                self.apply(action, now);
            }
            Command::AcceptPreview => self.apply(Action::AcceptPreview, now),
            Command::DiscardPreview => self.apply(Action::DiscardPreview, now),

            Command::ExportAnalytics => self.export_analytics(now),

            Command::ForgetApiKey => {
                self.api_key_input.clear();
                self.apply(Action::SetApiKey(String::new()), now);
                self.set_status("API key removed", StatusKind::Info, now);
            }
        }
    }

    fn show(&mut self, screen: Screen) {
        if screen == self.screen {
            return;
        }
        if screen == Screen::Play && self.game.teams().is_empty() {
            return;
        }
        if !matches!(self.screen, Screen::ApiKey) {
            self.previous_screen = self.screen;
        }
        self.screen = screen;
    }

    fn back(&mut self) {
        self.screen = match self.screen {
            Screen::Play => Screen::Setup,
            Screen::Setup if !self.game.teams().is_empty() => Screen::Play,
            Screen::Setup => Screen::Setup,
            Screen::Generator | Screen::Stats | Screen::ApiKey => {
                if self.previous_screen == self.screen {
                    Screen::Setup
                } else {
                    self.previous_screen
                }
            }
        };
    }

    fn start_match(&mut self, now: Instant) {
        if self.game.teams().is_empty() {
            self.set_status("Add at least one team first", StatusKind::Warning, now);
            return;
        }
        self.ticker.disarm();
        self.apply(Action::StartMatch, now);
        self.card_visible = self.game.settings().show_card_by_default;
        self.previous_screen = Screen::Setup;
        self.screen = Screen::Play;
    }

    fn adjust_field(&mut self, forward: bool, now: Instant) {
        let settings = self.game.settings();
        let mut patch = SettingsPatch::default();
        match self.setup.field {
            SetupField::TeamName => return,
            SetupField::Teams => {
                let len = self.game.teams().len();
                if len > 0 {
                    let idx = self.setup.selected_team;
                    self.setup.selected_team =
                        if forward { (idx + 1) % len } else { (idx + len - 1) % len };
                }
                return;
            }
            SetupField::RoundSeconds => {
                patch.round_seconds =
                    Some(cycle_option(&ROUND_SECONDS_OPTIONS, settings.round_seconds, forward));
            }
            SetupField::TargetPoints => {
                patch.target_points =
                    Some(cycle_option(&TARGET_POINTS_OPTIONS, settings.target_points, forward));
            }
            SetupField::MaxPointsPerCard => {
                let current = settings.max_points_per_card;
                let next = if forward { current + 1 } else { current.saturating_sub(1) };
                patch.max_points_per_card = Some(next.clamp(1, MAX_POINTS_PER_CARD_LIMIT));
            }
            SetupField::AutoPass => {
                patch.auto_pass_on_max_points = Some(!settings.auto_pass_on_max_points)
            }
            SetupField::ShowCard => patch.show_card_by_default = Some(!settings.show_card_by_default),
            SetupField::AiOnly => patch.ai_only_mode = Some(!settings.ai_only_mode),
            SetupField::AiDifficulty => {
                let d = settings.ai_difficulty;
                patch.ai_difficulty = Some(if forward { d.next() } else { d.prev() });
            }
            SetupField::AiLanguage => patch.ai_language = Some(settings.ai_language.toggle()),
        }
        self.apply(Action::SetSettings(patch), now);
    }

    fn export_analytics(&mut self, now: Instant) {
        let game = &self.game;
        let report = analytics::export_analytics(
            game.pool(),
            game.generated_cards(),
            game.generation_log(),
            game.clock().now_millis(),
        );
        let path = self
            .export_dir
            .join(format!("mimica-analytics-{}.json", game.clock().now_millis()));

        let result = serde_json::to_string_pretty(&report)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                fs::create_dir_all(&self.export_dir).map_err(|e| e.to_string())?;
                fs::write(&path, json).map_err(|e| e.to_string())
            });
        match result {
            Ok(()) => {
                tracing::info!(path = %path.display(), "exported analytics");
                self.set_status(format!("Exported to {}", path.display()), StatusKind::Info, now);
            }
            Err(e) => {
                tracing::error!(error = %e, "analytics export failed");
                self.set_status(format!("Export failed: {}", e), StatusKind::Error, now);
            }
        }
    }
}

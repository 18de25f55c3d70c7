mod ai;
mod analytics;
mod app;
mod cli;
mod clock;
mod config;
mod deck;
mod game;
mod input;
mod models;
mod storage;
mod theme;
mod timer;
mod ui;
mod utils;

use std::fs::{self, OpenOptions};
use std::io::{self, stdout};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::prelude::*;
use tracing_subscriber::EnvFilter;

use app::App;
use cli::CliConfig;
use clock::{Clock, SystemClock};
use config::EnvConfig;
use game::{Action, Game};
use models::{load_pool, Settings};
use storage::Store;

fn init_logging(path: &Path, debug: bool) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Build the game, resuming the saved one unless `--fresh`
fn load_game(cli: &CliConfig, env: &EnvConfig, store: Option<&Store>) -> anyhow::Result<Game> {
    let pool = load_pool(cli.deck_path.as_deref()).context("failed to load the card deck")?;
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mut game = Game::new(Settings::from_env(env), pool, clock, rng)
        .with_auto_pass_delay(env.auto_pass_delay);

    if cli.fresh {
        if let Some(store) = store {
            match store.remove(storage::SNAPSHOT_KEY) {
                Ok(()) => tracing::info!("discarded saved game"),
                Err(e) => tracing::warn!(error = %e, "could not discard saved game"),
            }
        }
    } else if let Some(snapshot) = store.and_then(|s| match s.load_snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(error = %e, "could not read saved game");
            None
        }
    }) {
        game.restore(snapshot);
    }

    // A key in the environment fills in for a missing saved one
    if !game.settings().has_api_key() && env.has_gemini_api_key() {
        game.dispatch(Action::SetApiKey(env.gemini_api_key.clone()));
    }
    Ok(game)
}

fn print_stats(game: &Game) -> anyhow::Result<()> {
    let report = analytics::export_analytics(
        game.pool(),
        game.generated_cards(),
        game.generation_log(),
        game.clock().now_millis(),
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = cli::parse_args()?;
    let env = EnvConfig::from_env();

    let log_path = cli
        .log_path
        .clone()
        .unwrap_or_else(|| storage::data_dir().join("mimica.log"));
    init_logging(&log_path, env.enable_debug_logs)?;
    tracing::info!(version = cli::VERSION, "starting mimica");
    env.log_summary();

    let db_path = cli.db_path.clone().unwrap_or_else(storage::default_db_path);
    let store = match Store::open(&db_path) {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::error!(error = %e, "running without persistence");
            None
        }
    };

    let game = load_game(&cli, &env, store.as_ref())?;
    if cli.stats {
        return print_stats(&game);
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let mut app = App::new(
        game,
        store,
        runtime.handle().clone(),
        &env,
        storage::data_dir(),
        Instant::now(),
    );

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Run the app
    let result = run(&mut terminal, &mut app);
    app.shutdown(Instant::now());

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "terminal loop failed");
    }
    Ok(result?)
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    while !app.should_quit {
        let now = Instant::now();
        terminal.draw(|frame| ui::draw(frame, app, now))?;

        // Handle input
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(command) = input::map_key(app.screen, key, app.is_editing()) {
                        app.handle_command(command, Instant::now());
                    }
                }
            }
        }

        app.on_frame(Instant::now());
    }

    Ok(())
}

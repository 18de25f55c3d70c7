//! Keyboard mapping to app commands.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::Screen;

/// What a key press asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Back,
    Show(Screen),

    // Text entry
    InputChar(char),
    InputBackspace,
    Submit,

    // Setup
    NextField,
    PrevField,
    Adjust { forward: bool },
    Toggle,
    RemoveTeam,
    StartMatch,

    // Play
    DrawCard,
    StartTurn,
    ScoreCurrent,
    ScoreTeam(usize),
    Pass,
    FinishTurn,
    NextTeam,
    ToggleCard,
    GenerateCard,
    NewMatch,
    ResetMatch,
    ClearAi,

    // Generator
    CycleCategory { forward: bool },
    CycleDifficulty { forward: bool },
    AdjustCount(i32),
    GenerateBatch,
    AcceptPreview,
    DiscardPreview,

    // Stats
    ExportAnalytics,

    // API key
    ForgetApiKey,
}

fn function_key(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::F(1) => Some(Command::Show(Screen::Setup)),
        KeyCode::F(2) => Some(Command::Show(Screen::Play)),
        KeyCode::F(3) => Some(Command::Show(Screen::Generator)),
        KeyCode::F(4) => Some(Command::Show(Screen::Stats)),
        KeyCode::F(5) => Some(Command::Show(Screen::ApiKey)),
        _ => None,
    }
}

/// Text fields take every printable key
fn text_entry(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Command::InputChar(c))
        }
        KeyCode::Backspace => Some(Command::InputBackspace),
        KeyCode::Enter => Some(Command::Submit),
        _ => None,
    }
}

fn setup_key(key: KeyEvent, editing: bool) -> Option<Command> {
    match key.code {
        KeyCode::Tab | KeyCode::Down => return Some(Command::NextField),
        KeyCode::BackTab | KeyCode::Up => return Some(Command::PrevField),
        KeyCode::Left => return Some(Command::Adjust { forward: false }),
        KeyCode::Right => return Some(Command::Adjust { forward: true }),
        KeyCode::Esc => return Some(Command::Back),
        _ => {}
    }
    if editing {
        return text_entry(key);
    }
    match key.code {
        KeyCode::Char(' ') => Some(Command::Toggle),
        KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('x') => Some(Command::RemoveTeam),
        KeyCode::Enter | KeyCode::Char('s') => Some(Command::StartMatch),
        KeyCode::Char('g') => Some(Command::Show(Screen::Generator)),
        KeyCode::Char('t') => Some(Command::Show(Screen::Stats)),
        KeyCode::Char('k') => Some(Command::Show(Screen::ApiKey)),
        KeyCode::Char('q') => Some(Command::Quit),
        _ => None,
    }
}

fn play_key(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char('d') => Some(Command::DrawCard),
        KeyCode::Char(' ') => Some(Command::StartTurn),
        KeyCode::Enter | KeyCode::Char('+') => Some(Command::ScoreCurrent),
        KeyCode::Char(c @ '1'..='9') => {
            c.to_digit(10).map(|d| Command::ScoreTeam(d as usize - 1))
        }
        KeyCode::Char('p') => Some(Command::Pass),
        KeyCode::Char('e') => Some(Command::FinishTurn),
        KeyCode::Char('n') => Some(Command::NextTeam),
        KeyCode::Char('v') => Some(Command::ToggleCard),
        KeyCode::Char('i') => Some(Command::GenerateCard),
        KeyCode::Char('r') => Some(Command::NewMatch),
        KeyCode::Char('R') => Some(Command::ResetMatch),
        KeyCode::Char('c') => Some(Command::ClearAi),
        KeyCode::Char('g') => Some(Command::Show(Screen::Generator)),
        KeyCode::Char('t') => Some(Command::Show(Screen::Stats)),
        KeyCode::Char('k') => Some(Command::Show(Screen::ApiKey)),
        KeyCode::Char('s') | KeyCode::Esc => Some(Command::Back),
        KeyCode::Char('q') => Some(Command::Quit),
        _ => None,
    }
}

fn generator_key(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Left => Some(Command::CycleCategory { forward: false }),
        KeyCode::Right => Some(Command::CycleCategory { forward: true }),
        KeyCode::Up => Some(Command::CycleDifficulty { forward: true }),
        KeyCode::Down => Some(Command::CycleDifficulty { forward: false }),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Command::AdjustCount(1)),
        KeyCode::Char('-') => Some(Command::AdjustCount(-1)),
        KeyCode::Enter | KeyCode::Char('b') => Some(Command::GenerateBatch),
        KeyCode::Char('i') => Some(Command::GenerateCard),
        KeyCode::Char('a') => Some(Command::AcceptPreview),
        KeyCode::Char('x') => Some(Command::DiscardPreview),
        KeyCode::Char('c') => Some(Command::ClearAi),
        KeyCode::Esc => Some(Command::Back),
        KeyCode::Char('q') => Some(Command::Quit),
        _ => None,
    }
}

fn stats_key(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char('e') => Some(Command::ExportAnalytics),
        KeyCode::Esc => Some(Command::Back),
        KeyCode::Char('q') => Some(Command::Quit),
        _ => None,
    }
}

fn api_key_key(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Esc => Some(Command::Back),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Command::ForgetApiKey)
        }
        _ => text_entry(key),
    }
}

/// Map a key event on `screen` to a command.
///
/// `editing` is true while a text field on the setup screen has focus;
/// letters are then typed instead of triggering shortcuts.
pub fn map_key(screen: Screen, key: KeyEvent, editing: bool) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }
    if let Some(command) = function_key(key.code) {
        return Some(command);
    }
    match screen {
        Screen::Setup => setup_key(key, editing),
        Screen::Play => play_key(key),
        Screen::Generator => generator_key(key),
        Screen::Stats => stats_key(key),
        Screen::ApiKey => api_key_key(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        for screen in [Screen::Setup, Screen::Play, Screen::ApiKey] {
            assert_eq!(map_key(screen, ctrl('c'), true), Some(Command::Quit));
        }
    }

    #[test]
    fn test_function_keys_switch_screens() {
        assert_eq!(
            map_key(Screen::Setup, key(KeyCode::F(4)), true),
            Some(Command::Show(Screen::Stats))
        );
    }

    #[test]
    fn test_setup_typing_vs_shortcuts() {
        assert_eq!(
            map_key(Screen::Setup, key(KeyCode::Char('q')), true),
            Some(Command::InputChar('q'))
        );
        assert_eq!(map_key(Screen::Setup, key(KeyCode::Char('q')), false), Some(Command::Quit));
        assert_eq!(map_key(Screen::Setup, key(KeyCode::Enter), true), Some(Command::Submit));
        assert_eq!(map_key(Screen::Setup, key(KeyCode::Enter), false), Some(Command::StartMatch));
        assert_eq!(map_key(Screen::Setup, key(KeyCode::Tab), true), Some(Command::NextField));
    }

    #[test]
    fn test_play_scoring_keys() {
        assert_eq!(
            map_key(Screen::Play, key(KeyCode::Char('1')), false),
            Some(Command::ScoreTeam(0))
        );
        assert_eq!(
            map_key(Screen::Play, key(KeyCode::Char('9')), false),
            Some(Command::ScoreTeam(8))
        );
        assert_eq!(map_key(Screen::Play, key(KeyCode::Enter), false), Some(Command::ScoreCurrent));
        assert_eq!(map_key(Screen::Play, key(KeyCode::Char('0')), false), None);
    }

    #[test]
    fn test_api_key_modal() {
        assert_eq!(
            map_key(Screen::ApiKey, key(KeyCode::Char('d')), false),
            Some(Command::InputChar('d'))
        );
        assert_eq!(map_key(Screen::ApiKey, ctrl('d'), false), Some(Command::ForgetApiKey));
        assert_eq!(map_key(Screen::ApiKey, key(KeyCode::Esc), false), Some(Command::Back));
    }

    #[test]
    fn test_generator_count_keys() {
        assert_eq!(
            map_key(Screen::Generator, key(KeyCode::Char('-')), false),
            Some(Command::AdjustCount(-1))
        );
        assert_eq!(
            map_key(Screen::Generator, key(KeyCode::Right), false),
            Some(Command::CycleCategory { forward: true })
        );
    }
}

//! TUI effects boundary: event loop, terminal lifecycle, key mapping.
//!
//! This is the only module with side effects. It wires the pure layers
//! (state, update, view) to the real terminal via crossterm and ratatui.
//! One thread: block on a key, apply one transition, redraw.

use std::io;

use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::types::Glyphs;

use super::state::{Action, Outcome, Picker, Transition};
use super::update::update;
use super::view::render;

// ============================================================================
// KEY MAPPING
// ============================================================================

/// Map a crossterm key event to a semantic Action.
///
/// Returns None for keys that don't map to any action.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        // Rows
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),

        // Pages
        KeyCode::Left | KeyCode::PageUp | KeyCode::Char('h') => Some(Action::PrevPage),
        KeyCode::Right | KeyCode::PageDown | KeyCode::Char('l') => Some(Action::NextPage),

        KeyCode::Char(' ') => Some(Action::ToggleSelection),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),

        _ => None,
    }
}

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

/// Set up the terminal for TUI mode.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Run an interactive picker session until the user confirms or quits.
///
/// The terminal is restored even when the loop fails.
pub fn run(picker: Picker, glyphs: &Glyphs) -> io::Result<Outcome> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;

    let result = event_loop(&mut terminal, picker, glyphs);
    let outcome = settle(result, restore_terminal())?;

    match &outcome {
        Outcome::Accepted(indices) => tracing::info!(chosen = indices.len(), "selection accepted"),
        Outcome::Cancelled => tracing::info!("selection cancelled"),
    }
    Ok(outcome)
}

/// Combine the loop result with the restore result. A loop failure is
/// reported ahead of a failed restore, which is only logged in that case.
fn settle<T>(result: io::Result<T>, restored: io::Result<()>) -> io::Result<T> {
    match (result, restored) {
        (Err(e), Err(restore_err)) => {
            tracing::warn!(error = %restore_err, "terminal restore failed");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(_), Err(restore_err)) => Err(restore_err),
        (Ok(value), Ok(())) => Ok(value),
    }
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut picker: Picker,
    glyphs: &Glyphs,
) -> io::Result<Outcome> {
    loop {
        terminal.draw(|frame| render(&picker, glyphs, frame))?;

        // Block on the next key; ignore releases, mouse, resize (redrawn anyway)
        let key = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            _ => continue,
        };

        let Some(action) = map_key(key) else {
            continue;
        };
        tracing::debug!(?action, "key mapped");

        picker = match update(picker, &action) {
            Transition::Continue(next) => next,
            Transition::Finish(outcome) => return Ok(outcome),
        };
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn ctrl_c_maps_to_quit() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(key), Some(Action::Quit));
    }

    #[test]
    fn q_and_esc_quit() {
        assert_eq!(map_key(press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(map_key(press(KeyCode::Esc)), Some(Action::Quit));
    }

    #[test]
    fn vim_keys_map_to_movement() {
        assert_eq!(map_key(press(KeyCode::Char('j'))), Some(Action::MoveDown));
        assert_eq!(map_key(press(KeyCode::Char('k'))), Some(Action::MoveUp));
        assert_eq!(map_key(press(KeyCode::Char('h'))), Some(Action::PrevPage));
        assert_eq!(map_key(press(KeyCode::Char('l'))), Some(Action::NextPage));
    }

    #[test]
    fn arrow_keys_map_to_movement() {
        assert_eq!(map_key(press(KeyCode::Up)), Some(Action::MoveUp));
        assert_eq!(map_key(press(KeyCode::Down)), Some(Action::MoveDown));
        assert_eq!(map_key(press(KeyCode::Left)), Some(Action::PrevPage));
        assert_eq!(map_key(press(KeyCode::Right)), Some(Action::NextPage));
    }

    #[test]
    fn page_keys_change_page() {
        assert_eq!(map_key(press(KeyCode::PageUp)), Some(Action::PrevPage));
        assert_eq!(map_key(press(KeyCode::PageDown)), Some(Action::NextPage));
    }

    #[test]
    fn space_toggles_and_enter_confirms() {
        assert_eq!(map_key(press(KeyCode::Char(' '))), Some(Action::ToggleSelection));
        assert_eq!(map_key(press(KeyCode::Enter)), Some(Action::Confirm));
    }

    #[test]
    fn loop_error_wins_over_restore_error() {
        let result: io::Result<()> = Err(io::Error::other("read failed"));
        let restored = Err(io::Error::other("restore failed"));
        let err = settle(result, restored).unwrap_err();
        assert_eq!(err.to_string(), "read failed");
    }

    #[test]
    fn restore_error_surfaces_after_clean_loop() {
        let restored = Err(io::Error::other("restore failed"));
        let err = settle(Ok(Outcome::Cancelled), restored).unwrap_err();
        assert_eq!(err.to_string(), "restore failed");
        assert_eq!(settle(Ok(Outcome::Cancelled), Ok(())).unwrap(), Outcome::Cancelled);
    }

    #[test]
    fn unmapped_key_returns_none() {
        assert_eq!(map_key(press(KeyCode::Char('z'))), None);
        assert_eq!(map_key(press(KeyCode::Tab)), None);
    }
}

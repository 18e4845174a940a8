use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Quit,
    Pause,
    Save,
    Load,
}

pub(crate) fn map_key(key: KeyCode, mods: KeyModifiers) -> Option<Action> {
    if key == KeyCode::Char('c') && mods.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }
    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => Some(Action::Pause),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Action::Save),
        KeyCode::Char('l') | KeyCode::Char('L') => Some(Action::Load),
        _ => None,
    }
}

/// Drains pending key presses without blocking for longer than `timeout`.
pub(crate) fn collect_actions(timeout: Duration) -> anyhow::Result<Vec<Action>> {
    let mut out = Vec::new();
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press {
                out.extend(map_key(k.code, k.modifiers));
                if out.len() >= 16 {
                    break;
                }
            }
        }
    }
    Ok(out)
}

/// Blocks until any key is pressed.
pub(crate) fn wait_for_key() -> anyhow::Result<()> {
    loop {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press {
                return Ok(());
            }
        }
    }
}

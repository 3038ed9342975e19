use std::time::Duration;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crate::shared::{InputEvent, Phase, VOLUME_STEP};
use super::mode::TuiState;

// poll for input from tui, resolves key presses into input events for the
// middle layer based on which screen is up
pub fn poll_input(timeout: Duration, ts: &TuiState) -> anyhow::Result<Vec<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }

    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Press {
            return Ok(vec![]);
        }
        return Ok(handle_key(key, ts));
    }
    Ok(vec![])
}

pub fn handle_key(key: KeyEvent, ts: &TuiState) -> Vec<InputEvent> {
    if key.code == KeyCode::Esc {
        return vec![InputEvent::Quit];
    }
    // ctrl-c too, raw mode swallows the signal
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![InputEvent::Quit];
    }
    match ts.phase {
        Phase::Setup => resolve_setup(key, ts),
        Phase::Loading => resolve_loading(key),
        Phase::Live => resolve_live(key),
    }
}

fn resolve_setup(key: KeyEvent, ts: &TuiState) -> Vec<InputEvent> {
    match key.code {
        KeyCode::Enter => vec![InputEvent::Submit],
        KeyCode::Tab | KeyCode::Down => vec![InputEvent::NextField],
        KeyCode::BackTab | KeyCode::Up => vec![InputEvent::PrevField],
        KeyCode::Backspace => vec![InputEvent::DeleteChar],
        KeyCode::Left => vec![InputEvent::AdjustField(-1)],
        KeyCode::Right => vec![InputEvent::AdjustField(1)],
        // typing only goes into the text fields
        KeyCode::Char(c) if ts.focus.is_text() => vec![InputEvent::TypeChar(c)],
        KeyCode::Char('-') => vec![InputEvent::AdjustField(-1)],
        KeyCode::Char('+' | '=') => vec![InputEvent::AdjustField(1)],
        _ => vec![],
    }
}

fn resolve_loading(key: KeyEvent) -> Vec<InputEvent> {
    match key.code {
        KeyCode::Char('x') => vec![InputEvent::StopSet],
        _ => vec![],
    }
}

fn resolve_live(key: KeyEvent) -> Vec<InputEvent> {
    match key.code {
        KeyCode::Char(' ') => vec![InputEvent::TogglePlay],
        KeyCode::Char('[') | KeyCode::Left => vec![InputEvent::AdjustVolume(-VOLUME_STEP)],
        KeyCode::Char(']') | KeyCode::Right => vec![InputEvent::AdjustVolume(VOLUME_STEP)],
        KeyCode::Char('x') => vec![InputEvent::StopSet],
        _ => vec![],
    }
}

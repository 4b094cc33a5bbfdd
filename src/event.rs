use crate::actions::Action;
use crate::app::{AppMode, AppState};
use crate::canvas::keyboard::{ChordState, Key, KeyInput, KeyPhase, LEADER};
use crate::canvas::pointer::{PointerEvent, PointerPhase};
use crate::ui::{cell_to_view, CELL_HEIGHT, CELL_WIDTH};
use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::time::Duration;

/// Waits up to `timeout` for terminal input and translates it.
pub fn handle_events(app: &AppState, timeout: Duration) -> Result<Vec<Action>> {
    if event::poll(timeout)? {
        return Ok(translate(app, event::read()?));
    }
    Ok(Vec::new())
}

pub fn translate(app: &AppState, event: Event) -> Vec<Action> {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse).into_iter().collect(),
        Event::Resize(width, height) => vec![resize_action(width, height)],
        _ => Vec::new(),
    }
}

/// Canvas size in view units for a terminal of `width` x `height` cells,
/// leaving the bottom row to the status line.
pub fn resize_action(width: u16, height: u16) -> Action {
    Action::Resize {
        width: f64::from(width) * CELL_WIDTH,
        height: f64::from(height.saturating_sub(1)) * CELL_HEIGHT,
    }
}

fn handle_key_event(app: &AppState, key: KeyEvent) -> Vec<Action> {
    match &app.mode {
        AppMode::Normal => handle_normal_mode(app, key),
        _ if key.kind == KeyEventKind::Release => Vec::new(),
        AppMode::Renaming { .. } => handle_rename_mode(key).into_iter().collect(),
        AppMode::CardEditing { .. } => handle_card_mode(key).into_iter().collect(),
        AppMode::CardViewer { .. } | AppMode::Alert { .. } | AppMode::Help => {
            vec![Action::CloseOverlay]
        }
    }
}

fn canvas_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Delete => Some(Key::Delete),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        _ => None,
    }
}

/// Forwards a key to the canvas. Without release reporting the leader would
/// stay held forever, so its release is synthesized right away.
fn to_canvas(app: &AppState, key: KeyEvent) -> Vec<Action> {
    let Some(k) = canvas_key(key.code) else {
        return Vec::new();
    };
    let phase = match key.kind {
        KeyEventKind::Release => KeyPhase::Release,
        KeyEventKind::Press | KeyEventKind::Repeat => KeyPhase::Press,
    };
    let input = KeyInput {
        key: k,
        phase,
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
    };

    let mut actions = vec![Action::Key(input)];
    if k == LEADER && phase == KeyPhase::Press && !app.key_release_supported {
        actions.push(Action::Key(KeyInput::release(LEADER)));
    }
    actions
}

fn handle_normal_mode(app: &AppState, key: KeyEvent) -> Vec<Action> {
    use KeyCode::*;

    // A held leader owns the keyboard until it is released
    if app.canvas.keyboard().chord_state() != ChordState::Idle
        || key.kind == KeyEventKind::Release
    {
        return to_canvas(app, key);
    }

    let action = match (key.code, key.modifiers) {
        // Quit
        (Char('q'), KeyModifiers::NONE) => Some(Action::Quit),
        (Char('c'), KeyModifiers::CONTROL) => Some(Action::Quit),

        // Node commands
        (Char(' '), KeyModifiers::NONE) => Some(Action::ToggleCollapse),
        (Char('i'), KeyModifiers::NONE) | (F(2), _) => Some(Action::RenameSelection),
        (Char('c'), KeyModifiers::NONE) => Some(Action::OpenCardEditor),
        (Char('v'), KeyModifiers::NONE) => Some(Action::OpenCardViewer),
        (Char('e'), KeyModifiers::NONE) => Some(Action::ExpandSelection),

        // Maps
        (Char('n'), KeyModifiers::NONE) => Some(Action::NewMap),
        (Char(']'), KeyModifiers::NONE) => Some(Action::NextMap),
        (Char('['), KeyModifiers::NONE) => Some(Action::PreviousMap),
        (Char('t'), KeyModifiers::NONE) => Some(Action::CycleTheme),
        (Char('f'), KeyModifiers::NONE) => Some(Action::CycleFont),
        (Char('l'), KeyModifiers::NONE) => Some(Action::CycleLayout),

        // File operations
        (Char('s'), KeyModifiers::NONE) => Some(Action::Save),
        (Char('x'), KeyModifiers::NONE) => Some(Action::ExportHtml),
        (Char('o'), KeyModifiers::NONE) => Some(Action::ExportOutline),
        (Char('p'), KeyModifiers::NONE) => Some(Action::ExportSnapshot),

        // Help
        (Char('?'), _) => Some(Action::ShowHelp),

        _ => None,
    };

    match action {
        Some(action) => vec![action],
        None => to_canvas(app, key),
    }
}

fn handle_rename_mode(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match (key.code, key.modifiers) {
        (Esc, _) => Some(Action::CancelEdit),
        (Enter, _) => Some(Action::ConfirmEdit),
        (Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => Some(Action::TypeChar(c)),
        (Backspace, _) => Some(Action::Backspace),
        (Delete, _) => Some(Action::Delete),
        (Left, _) => Some(Action::MoveCursorLeft),
        (Right, _) => Some(Action::MoveCursorRight),
        (Home, _) | (Char('a'), KeyModifiers::CONTROL) => Some(Action::MoveCursorHome),
        (End, _) | (Char('e'), KeyModifiers::CONTROL) => Some(Action::MoveCursorEnd),
        _ => None,
    }
}

fn handle_card_mode(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match (key.code, key.modifiers) {
        (Esc, _) => Some(Action::CancelEdit),
        (Char('s'), KeyModifiers::CONTROL) => Some(Action::ConfirmEdit),
        (Enter, _) => Some(Action::TypeChar('\n')),
        (Tab, _) => Some(Action::TypeChar('\t')),
        (Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => Some(Action::TypeChar(c)),
        (Backspace, _) => Some(Action::Backspace),
        _ => None,
    }
}

fn handle_mouse_event(app: &AppState, mouse: MouseEvent) -> Option<Action> {
    let position = cell_to_view(mouse.column, mouse.row);

    if app.mode != AppMode::Normal {
        // Clicking anywhere dismisses a read-only overlay
        return match (&app.mode, mouse.kind) {
            (
                AppMode::CardViewer { .. } | AppMode::Alert { .. } | AppMode::Help,
                MouseEventKind::Down(_),
            ) => Some(Action::CloseOverlay),
            _ => None,
        };
    }

    let phase = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => PointerPhase::Down,
        MouseEventKind::Drag(MouseButton::Left) => PointerPhase::Move,
        MouseEventKind::Up(MouseButton::Left) => PointerPhase::Up,
        MouseEventKind::ScrollUp => {
            return Some(Action::Wheel {
                position,
                notches: 1,
            })
        }
        MouseEventKind::ScrollDown => {
            return Some(Action::Wheel {
                position,
                notches: -1,
            })
        }
        _ => return None,
    };

    Some(Action::Pointer(PointerEvent {
        phase,
        position,
        time_ms: app.now_ms(),
    }))
}

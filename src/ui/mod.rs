mod canvas;
mod connections;
mod constants;
mod help;
mod mindmap;
mod overlays;
mod status_line;

use crate::app::{AppMode, AppState};
use crate::export::buffer_snapshot;
use anyhow::Result;
use help::HelpRenderer;
use mindmap::MindMapRenderer;
use ratatui::{
    backend::TestBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use status_line::StatusLineRenderer;

pub use canvas::{cell_to_view, view_to_cell};
pub use constants::{CELL_HEIGHT, CELL_WIDTH};

/// Splits the frame into the canvas and the one-line status bar.
pub fn split_area(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

pub fn render(frame: &mut Frame, app: &AppState) {
    let (canvas_area, status_area) = split_area(frame.area());

    MindMapRenderer::new(app).render(frame, canvas_area);

    match &app.mode {
        AppMode::Normal => {}
        AppMode::Renaming {
            node,
            buffer,
            cursor_pos,
        } => overlays::render_rename(frame, app, *node, buffer, *cursor_pos, canvas_area),
        AppMode::CardEditing { node, buffer } => {
            overlays::render_card_editor(frame, app, *node, buffer, canvas_area)
        }
        AppMode::CardViewer { node, anchor } => {
            overlays::render_card_viewer(frame, app, *node, *anchor, canvas_area)
        }
        AppMode::Alert { message } => overlays::render_alert(frame, message, canvas_area),
        AppMode::Help => HelpRenderer::render(frame, canvas_area),
    }

    StatusLineRenderer::render(frame, app, status_area);
}

/// Renders one frame off screen and returns it as plain text.
pub fn render_snapshot(app: &AppState, width: u16, height: u16) -> Result<String> {
    let mut terminal = Terminal::new(TestBackend::new(width, height))?;
    terminal.draw(|frame| render(frame, app))?;
    Ok(buffer_snapshot(terminal.backend().buffer()))
}

use crate::app::{AppMode, AppState};
use crate::canvas::keyboard::ChordState;
use crate::ui::constants::{STATUS_CARD_PREFIX, STATUS_RENAME_PREFIX};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    Frame,
};

// Status line renderer
pub struct StatusLineRenderer;

impl StatusLineRenderer {
    pub fn render(frame: &mut Frame, app: &AppState, area: Rect) {
        let (content, style) = Self::get_content_and_style(app);
        frame.render_widget(Paragraph::new(content).style(style), area);
    }

    pub fn get_content_and_style(app: &AppState) -> (String, Style) {
        let highlight = Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        match &app.mode {
            AppMode::Renaming { .. } => (
                format!("{STATUS_RENAME_PREFIX}Enter to confirm, Esc to cancel"),
                highlight,
            ),
            AppMode::CardEditing { .. } => (
                format!("{STATUS_CARD_PREFIX}Ctrl+S to save, Esc to cancel"),
                highlight,
            ),
            AppMode::CardViewer { .. } | AppMode::Alert { .. } => {
                ("Press any key to close".to_string(), highlight)
            }
            AppMode::Help => ("Press any key to close help".to_string(), highlight),
            AppMode::Normal => Self::render_normal_mode(app),
        }
    }

    fn render_normal_mode(app: &AppState) -> (String, Style) {
        if app.canvas.keyboard().chord_state() == ChordState::LeaderHeld {
            return (
                "Tab held: r to rename, release to add a child".to_string(),
                Style::default().fg(Color::Black).bg(Color::Yellow),
            );
        }

        if let Some(ref msg) = app.message {
            let style = Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD);
            return (msg.clone(), style);
        }

        let doc = app.document();
        let mut content = format!(
            "mindcanvas | map {}/{} | {} nodes | {:.0}% | {} / {} / {}",
            app.store.active_index() + 1,
            app.store.map_count(),
            doc.node_count(),
            app.canvas.view.scale * 100.0,
            doc.theme,
            doc.font,
            doc.layout,
        );
        if app.expansion.is_some() {
            content.push_str(" | expanding…");
        }
        content.push_str(" | ? help");
        (content, Style::default().fg(Color::Gray).bg(Color::Black))
    }
}

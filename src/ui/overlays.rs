use crate::app::AppState;
use crate::canvas::popup::place_popup;
use crate::geometry::{self, Point};
use crate::model::NodeKey;
use crate::ui::constants::{CELL_HEIGHT, CELL_WIDTH, CURSOR_INDICATOR};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const CARD_VIEWER_WIDTH: u16 = 44;
const CARD_VIEWER_MAX_HEIGHT: u16 = 14;
const ALERT_WIDTH: u16 = 48;

/// Smallest cell rectangle covering a view-space rectangle, clipped to `area`.
pub fn cell_rect(view: geometry::Rect, area: Rect) -> Rect {
    let x0 = (view.x / CELL_WIDTH).floor().max(0.0);
    let y0 = (view.y / CELL_HEIGHT).floor().max(0.0);
    let x1 = (view.right() / CELL_WIDTH).ceil().max(x0);
    let y1 = (view.bottom() / CELL_HEIGHT).ceil().max(y0);
    let rect = Rect::new(x0 as u16, y0 as u16, (x1 - x0) as u16, (y1 - y0) as u16);
    rect.intersection(area)
}

/// Rectangle of at most `width` x `height` cells centered in `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// `buffer` with the cursor glyph inserted at char position `cursor_pos`.
pub fn with_cursor(buffer: &str, cursor_pos: usize) -> String {
    let mut out = String::with_capacity(buffer.len() + CURSOR_INDICATOR.len_utf8());
    let mut placed = false;
    for (i, ch) in buffer.chars().enumerate() {
        if i == cursor_pos {
            out.push(CURSOR_INDICATOR);
            placed = true;
        }
        out.push(ch);
    }
    if !placed {
        out.push(CURSOR_INDICATOR);
    }
    out
}

fn popup_style() -> Style {
    Style::default().fg(Color::White).bg(Color::Black)
}

fn title_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

/// Inline editor laid over the node being renamed.
pub fn render_rename(frame: &mut Frame, app: &AppState, node: NodeKey, buffer: &str, cursor_pos: usize, area: Rect) {
    let Some(view_box) = app.canvas.rename_box(app.layout(), node) else {
        return;
    };
    let mut rect = cell_rect(view_box, area);
    rect.width = rect.width.max(16).min(area.width.saturating_sub(rect.x));
    rect.height = 3.min(area.height.saturating_sub(rect.y));
    if rect.height < 3 {
        rect.y = area.bottom().saturating_sub(3);
        rect.height = 3.min(area.height);
    }
    let rect = rect.intersection(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Rename ")
        .title_style(title_style())
        .style(popup_style().fg(Color::Cyan));
    let paragraph = Paragraph::new(with_cursor(buffer, cursor_pos))
        .block(block)
        .style(popup_style());

    frame.render_widget(Clear, rect);
    frame.render_widget(paragraph, rect);
}

/// Read-only card shown next to the indicator that opened it.
pub fn render_card_viewer(frame: &mut Frame, app: &AppState, node: NodeKey, anchor: Point, area: Rect) {
    let Some(n) = app.document().get(node) else {
        return;
    };
    let content = n.card_content.as_deref().unwrap_or_default();

    let width = CARD_VIEWER_WIDTH.min(area.width);
    let inner = width.saturating_sub(2).max(1) as usize;
    let wrapped_rows: usize = content
        .lines()
        .map(|l| l.chars().count().div_ceil(inner).max(1))
        .sum();
    let height = (wrapped_rows as u16 + 2).min(CARD_VIEWER_MAX_HEIGHT).min(area.height);

    let viewport = geometry::Rect::new(
        f64::from(area.x) * CELL_WIDTH,
        f64::from(area.y) * CELL_HEIGHT,
        f64::from(area.width) * CELL_WIDTH,
        f64::from(area.height) * CELL_HEIGHT,
    );
    let placed = place_popup(
        anchor,
        f64::from(width) * CELL_WIDTH,
        f64::from(height) * CELL_HEIGHT,
        viewport,
    );
    let rect = cell_rect(placed, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", n.name))
        .title_style(title_style())
        .title_bottom(" Esc to close ")
        .style(popup_style().fg(Color::Yellow));
    let lines: Vec<Line> = content.lines().map(Line::from).collect();
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(popup_style())
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, rect);
    frame.render_widget(paragraph, rect);
}

pub fn render_card_editor(frame: &mut Frame, app: &AppState, node: NodeKey, buffer: &str, area: Rect) {
    let name = app
        .document()
        .get(node)
        .map(|n| n.name.as_str())
        .unwrap_or_default();
    let rect = centered_rect(area.width * 3 / 5, area.height / 2, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Card: {name} "))
        .title_style(title_style())
        .title_bottom(" Ctrl+S save  Esc cancel ")
        .style(popup_style().fg(Color::Cyan));
    let text = with_cursor(buffer, buffer.chars().count());
    let lines: Vec<Line> = text.split('\n').map(Line::from).collect();
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(popup_style())
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, rect);
    frame.render_widget(paragraph, rect);
}

pub fn render_alert(frame: &mut Frame, message: &str, area: Rect) {
    let rect = centered_rect(ALERT_WIDTH, 6, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Warning ")
        .title_style(title_style())
        .style(popup_style().fg(Color::Red));
    let paragraph = Paragraph::new(vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from("Press any key"),
    ])
    .block(block)
    .style(popup_style())
    .wrap(Wrap { trim: true });

    frame.render_widget(Clear, rect);
    frame.render_widget(paragraph, rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_rect_covers_and_clips() {
        let area = Rect::new(0, 0, 80, 24);
        let r = cell_rect(geometry::Rect::new(12.0, 20.0, 100.0, 40.0), area);
        assert_eq!(r, Rect::new(1, 1, 13, 3));

        let off = cell_rect(geometry::Rect::new(600.0, 360.0, 100.0, 40.0), area);
        assert_eq!(off, Rect::new(75, 22, 5, 2));
    }

    #[test]
    fn test_with_cursor() {
        assert_eq!(with_cursor("añb", 1), "a▌ñb");
        assert_eq!(with_cursor("ab", 2), "ab▌");
        assert_eq!(with_cursor("", 0), "▌");
    }

    #[test]
    fn test_centered_rect() {
        assert_eq!(centered_rect(20, 6, Rect::new(0, 0, 80, 24)), Rect::new(30, 9, 20, 6));
        assert_eq!(centered_rect(100, 6, Rect::new(0, 0, 80, 24)).width, 80);
    }
}

use crate::app::AppState;
use crate::canvas::hit::{card_indicator_center, toggle_center};
use crate::geometry::Point;
use crate::layout::LayoutNode;
use crate::theme::{Palette, Rgb};
use crate::ui::canvas::{view_to_cell, BufferCanvas};
use crate::ui::connections::ConnectionRenderer;
use crate::ui::constants::{border, ELLIPSIS, GLYPH_CARD, GLYPH_COLLAPSED, GLYPH_EXPANDED};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    Frame,
};

pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Cuts `text` to `width` cells, marking the cut with an ellipsis.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push(ELLIPSIS);
    out
}

// Mind map renderer
pub struct MindMapRenderer<'a> {
    app: &'a AppState,
    palette: Palette,
}

impl<'a> MindMapRenderer<'a> {
    pub fn new(app: &'a AppState) -> Self {
        Self {
            app,
            palette: app.document().theme.palette(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let canvas = self.draw(area.width as usize, area.height as usize);
        let paragraph = Paragraph::new(canvas.to_lines());
        frame.render_widget(paragraph, area);
    }

    /// Rasterizes the map into a fresh buffer of the given cell size.
    pub fn draw(&self, width: usize, height: usize) -> BufferCanvas {
        let base = Style::default()
            .bg(color(self.palette.background))
            .fg(color(self.palette.connector));
        let mut canvas = BufferCanvas::new(width, height, base);

        // Connections first, boxes are drawn over them
        ConnectionRenderer::new(&mut canvas, self.app.layout(), &self.app.canvas.view, base)
            .draw_all();

        for node in self.app.layout().iter() {
            self.draw_node(&mut canvas, node);
        }
        canvas
    }

    fn cell(&self, world: Point) -> (i32, i32) {
        view_to_cell(self.app.canvas.view.to_view(world))
    }

    fn draw_node(&self, canvas: &mut BufferCanvas, node: &LayoutNode) {
        let is_root = node.parent.is_none();
        let is_selected = self.app.selection() == Some(node.key);

        let (fill, text) = if is_root {
            (self.palette.root_fill, self.palette.root_text)
        } else {
            (self.palette.node_fill, self.palette.node_text)
        };
        let fill_style = Style::default().bg(color(fill)).fg(color(text));
        let text_style = if is_root {
            fill_style.add_modifier(Modifier::BOLD)
        } else {
            fill_style
        };
        let border_style = if is_selected {
            fill_style
                .fg(color(self.palette.selection))
                .add_modifier(Modifier::BOLD)
        } else {
            fill_style.fg(color(self.palette.border))
        };

        let (x0, y0) = self.cell(Point::new(node.x, node.y));
        // Inclusive corner, nudged so an edge on a cell boundary stays outside
        let (x1, y1) = self.cell(Point::new(node.x + node.w - 0.01, node.y + node.h - 0.01));

        if y1 - y0 >= 2 && x1 - x0 >= 3 {
            canvas.fill(x0, y0, x1, y1, fill_style);
            self.draw_border(canvas, (x0, y0), (x1, y1), border_style);

            let inner_width = (x1 - x0 - 3).max(0) as usize;
            let inner_rows = (y1 - y0 - 1) as usize;
            let mut lines: Vec<String> = node.lines.iter().take(inner_rows).cloned().collect();
            if node.lines.len() > inner_rows {
                if let Some(last) = lines.last_mut() {
                    last.push(ELLIPSIS);
                }
            }
            for (i, line) in lines.iter().enumerate() {
                canvas.draw_styled_text(x0 + 2, y0 + 1 + i as i32, &truncate(line, inner_width), text_style);
            }
        } else {
            // Too small for a frame: a single highlighted label
            let width = (x1 - x0 + 1).max(1) as usize;
            let label = truncate(&node.lines.join(" "), width);
            let style = if is_selected { border_style.add_modifier(Modifier::REVERSED) } else { text_style };
            canvas.fill(x0, y0, x0 + width as i32 - 1, y0, style);
            canvas.draw_styled_text(x0, y0, &label, style);
        }

        let glyph_style = Style::default()
            .bg(color(self.palette.background))
            .fg(color(self.palette.accent))
            .add_modifier(Modifier::BOLD);
        if node.has_children {
            let (gx, gy) = self.cell(toggle_center(node));
            let glyph = if node.is_collapsed { GLYPH_COLLAPSED } else { GLYPH_EXPANDED };
            canvas.set_styled(gx, gy, glyph, glyph_style);
        }
        if node.has_card {
            let (cx, cy) = self.cell(card_indicator_center(node));
            canvas.set_styled(cx, cy, GLYPH_CARD, glyph_style);
        }
    }

    fn draw_border(&self, canvas: &mut BufferCanvas, (x0, y0): (i32, i32), (x1, y1): (i32, i32), style: Style) {
        for x in x0 + 1..x1 {
            canvas.set_styled(x, y0, border::HORIZONTAL, style);
            canvas.set_styled(x, y1, border::HORIZONTAL, style);
        }
        for y in y0 + 1..y1 {
            canvas.set_styled(x0, y, border::VERTICAL, style);
            canvas.set_styled(x1, y, border::VERTICAL, style);
        }
        canvas.set_styled(x0, y0, border::TOP_LEFT, style);
        canvas.set_styled(x1, y0, border::TOP_RIGHT, style);
        canvas.set_styled(x0, y1, border::BOTTOM_LEFT, style);
        canvas.set_styled(x1, y1, border::BOTTOM_RIGHT, style);
    }
}

use crate::geometry::Point;
use crate::ui::constants::{CharBuffer, StyleBuffer, CELL_HEIGHT, CELL_WIDTH};
use ratatui::{
    style::Style,
    text::{Line, Span},
};

/// Terminal cell containing a view-space point. May lie off screen.
pub fn view_to_cell(p: Point) -> (i32, i32) {
    (
        (p.x / CELL_WIDTH).floor() as i32,
        (p.y / CELL_HEIGHT).floor() as i32,
    )
}

/// View-space center of a terminal cell.
pub fn cell_to_view(col: u16, row: u16) -> Point {
    Point::new(
        f64::from(col) * CELL_WIDTH + CELL_WIDTH / 2.0,
        f64::from(row) * CELL_HEIGHT + CELL_HEIGHT / 2.0,
    )
}

// Buffer canvas for drawing characters and styles. Coordinates are signed so
// that partly visible shapes can be drawn without clipping at the call site.
pub struct BufferCanvas {
    pub char_buffer: CharBuffer,
    pub style_buffer: StyleBuffer,
    pub width: usize,
    pub height: usize,
}

impl BufferCanvas {
    pub fn new(width: usize, height: usize, base: Style) -> Self {
        Self {
            char_buffer: vec![vec![' '; width]; height],
            style_buffer: vec![vec![base; width]; height],
            width,
            height,
        }
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (y as usize) < self.height && (x as usize) < self.width
    }

    pub fn char_at(&self, x: i32, y: i32) -> Option<char> {
        self.in_bounds(x, y)
            .then(|| self.char_buffer[y as usize][x as usize])
    }

    pub fn set_char(&mut self, x: i32, y: i32, ch: char) {
        if self.in_bounds(x, y) {
            self.char_buffer[y as usize][x as usize] = ch;
        }
    }

    pub fn set_styled(&mut self, x: i32, y: i32, ch: char, style: Style) {
        if self.in_bounds(x, y) {
            self.char_buffer[y as usize][x as usize] = ch;
            self.style_buffer[y as usize][x as usize] = style;
        }
    }

    pub fn draw_styled_text(&mut self, x: i32, y: i32, text: &str, style: Style) {
        for (i, ch) in text.chars().enumerate() {
            self.set_styled(x + i as i32, y, ch, style);
        }
    }

    pub fn fill(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, style: Style) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.set_styled(x, y, ' ', style);
            }
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'_>> {
        let mut lines = Vec::new();

        for (y, row) in self.char_buffer.iter().enumerate() {
            let mut spans = Vec::new();
            let mut current_style = self.style_buffer[y].first().copied().unwrap_or_default();
            let mut current_text = String::new();

            for (x, &ch) in row.iter().enumerate() {
                let style = self.style_buffer[y][x];
                if style != current_style {
                    if !current_text.is_empty() {
                        spans.push(Span::styled(current_text.clone(), current_style));
                        current_text.clear();
                    }
                    current_style = style;
                }
                current_text.push(ch);
            }

            if !current_text.is_empty() {
                spans.push(Span::styled(current_text, current_style));
            }

            lines.push(Line::from(spans));
        }

        lines
    }
}

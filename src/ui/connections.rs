use crate::canvas::viewport::ViewTransform;
use crate::layout::{Layout, LayoutNode};
use crate::ui::canvas::{view_to_cell, BufferCanvas};
use crate::ui::constants::junction;
use ratatui::style::Style;

/// Character for one cell of a vertical spine, from which sides it connects.
pub fn junction_char(left: bool, right: bool, up: bool, down: bool) -> char {
    match (left, right, up, down) {
        (_, _, false, false) => junction::HORIZONTAL,
        (false, false, _, _) => junction::VERTICAL,
        (true, false, false, true) => junction::TOP_RIGHT,
        (true, false, true, false) => junction::BOTTOM_RIGHT,
        (true, false, true, true) => junction::MIDDLE_RIGHT,
        (false, true, false, true) => junction::TOP_CORNER,
        (false, true, true, false) => junction::BOTTOM_CORNER,
        (false, true, true, true) => junction::MIDDLE_LEFT,
        (true, true, false, true) => junction::TOP_TEE,
        (true, true, true, false) => junction::BOTTOM_TEE,
        (true, true, true, true) => junction::CROSS,
    }
}

// Connection renderer
pub struct ConnectionRenderer<'a> {
    canvas: &'a mut BufferCanvas,
    layout: &'a Layout,
    view: &'a ViewTransform,
    style: Style,
}

impl<'a> ConnectionRenderer<'a> {
    pub fn new(
        canvas: &'a mut BufferCanvas,
        layout: &'a Layout,
        view: &'a ViewTransform,
        style: Style,
    ) -> Self {
        Self {
            canvas,
            layout,
            view,
            style,
        }
    }

    pub fn draw_all(&mut self) {
        for node in self.layout.iter() {
            self.draw_node_connections(node);
        }
    }

    /// Elbow lines from the parent's right edge to every visible child's left
    /// edge, joined on a shared vertical spine.
    fn draw_node_connections(&mut self, parent: &LayoutNode) {
        let children: Vec<(i32, i32)> = parent
            .children
            .iter()
            .filter_map(|k| self.layout.get(*k))
            .map(|c| view_to_cell(self.view.to_view(c.left_anchor())))
            .collect();
        if children.is_empty() {
            return;
        }

        let (pc, pr) = view_to_cell(self.view.to_view(parent.right_anchor()));
        let nearest = children.iter().map(|(c, _)| *c).min().unwrap_or(pc);
        let spine = ((pc + nearest) / 2).max(pc + 1);

        self.hline(pc + 1, spine - 1, pr);
        for &(cc, cr) in &children {
            self.hline(spine + 1, cc - 1, cr);
        }

        let top = children.iter().map(|(_, r)| *r).min().unwrap_or(pr).min(pr);
        let bottom = children.iter().map(|(_, r)| *r).max().unwrap_or(pr).max(pr);
        for row in top..=bottom {
            let left = row == pr;
            let right = children.iter().any(|(_, r)| *r == row);
            let ch = junction_char(left, right, row > top, row < bottom);
            self.canvas.set_styled(spine, row, ch, self.style);
        }
    }

    fn hline(&mut self, from: i32, to: i32, row: i32) {
        let width = self.canvas.width as i32;
        for x in from.max(0)..=to.min(width) {
            self.canvas.set_styled(x, row, junction::HORIZONTAL, self.style);
        }
    }
}

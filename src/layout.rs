use crate::geometry::{Point, Rect};
use crate::model::{Document, NodeKey};
use crate::theme::FontFamily;
use indextree::NodeId;
use std::collections::HashMap;
use unicode_width::UnicodeWidthStr;

/// Narrowest text area of a node box
pub const NODE_MIN_TEXT_WIDTH: f64 = 120.0;
/// Widest text area before wrapping kicks in
pub const NODE_MAX_TEXT_WIDTH: f64 = 220.0;
/// Horizontal padding, both sides together
pub const NODE_PADDING_X: f64 = 24.0;
/// Vertical padding, top and bottom together
pub const NODE_PADDING_Y: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub family: FontFamily,
    pub size: f64,
}

/// Per-level typography.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeMetrics {
    pub font_size: f64,
    pub line_height: f64,
    pub min_height: f64,
}

pub const ROOT_METRICS: NodeMetrics = NodeMetrics {
    font_size: 18.0,
    line_height: 24.0,
    min_height: 56.0,
};

pub const CHILD_METRICS: NodeMetrics = NodeMetrics {
    font_size: 14.0,
    line_height: 20.0,
    min_height: 40.0,
};

/// Text measurement that works without a live render target.
pub trait TextMeasure {
    fn measure(&self, text: &str, font: FontSpec) -> f64;
}

/// Estimates width from display columns and the family's average advance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxMeasure;

impl TextMeasure for ApproxMeasure {
    fn measure(&self, text: &str, font: FontSpec) -> f64 {
        text.width() as f64 * font.size * font.family.advance_ratio()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub key: NodeKey,
    pub id: NodeId,
    /// Rebuilt on every pass, never written back to the document.
    pub parent: Option<NodeKey>,
    /// Visible children in order; empty when collapsed.
    pub children: Vec<NodeKey>,
    pub depth: usize,
    // Box
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Height reserved for the node and its visible subtree.
    pub subtree_h: f64,
    pub lines: Vec<String>,
    pub metrics: NodeMetrics,
    pub has_children: bool,
    pub is_collapsed: bool,
    pub has_card: bool,
}

impl LayoutNode {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.h / 2.0
    }

    /// Where connectors leave the node.
    pub fn right_anchor(&self) -> Point {
        Point::new(self.x + self.w, self.center_y())
    }

    /// Where connectors enter the node.
    pub fn left_anchor(&self) -> Point {
        Point::new(self.x, self.center_y())
    }
}

/// Positions of every visible node of one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub nodes: HashMap<NodeKey, LayoutNode>,
    /// Pre-order, parents before children.
    pub order: Vec<NodeKey>,
    pub root: Option<NodeKey>,
}

impl Layout {
    pub fn compute(doc: &Document, measure: &dyn TextMeasure) -> Self {
        let mut layout = Self::default();
        let column = NODE_MAX_TEXT_WIDTH + NODE_PADDING_X + doc.layout.horizontal_gap();
        let gap = doc.layout.vertical_gap();

        // First pass: box sizes and subtree heights
        layout.root = layout.measure_subtree(doc, measure, doc.root, None, 0, column, gap);

        // Second pass: vertical positions
        if let Some(root) = layout.root {
            layout.place_subtree(root, 0.0, gap);
        }

        layout
    }

    pub fn get(&self, key: NodeKey) -> Option<&LayoutNode> {
        self.nodes.get(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayoutNode> {
        self.order.iter().filter_map(|k| self.nodes.get(k))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Keys from the root down to `key`, following the parent back-references.
    pub fn path_to(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut path = Vec::new();
        let mut current = self.nodes.get(&key);
        while let Some(node) = current {
            path.push(node.key);
            current = node.parent.and_then(|p| self.nodes.get(&p));
        }
        path.reverse();
        path
    }

    pub fn bounds(&self) -> Rect {
        let mut iter = self.nodes.values();
        let Some(first) = iter.next() else {
            return Rect::default();
        };
        let (mut left, mut top) = (first.x, first.y);
        let (mut right, mut bottom) = (first.x + first.w, first.y + first.h);
        for n in iter {
            left = left.min(n.x);
            top = top.min(n.y);
            right = right.max(n.x + n.w);
            bottom = bottom.max(n.y + n.h);
        }
        Rect::new(left, top, right - left, bottom - top)
    }

    #[allow(clippy::too_many_arguments)]
    fn measure_subtree(
        &mut self,
        doc: &Document,
        measure: &dyn TextMeasure,
        id: NodeId,
        parent: Option<NodeKey>,
        depth: usize,
        column: f64,
        gap: f64,
    ) -> Option<NodeKey> {
        let node = doc.node(id)?;
        let metrics = if depth == 0 { ROOT_METRICS } else { CHILD_METRICS };
        let font = FontSpec {
            family: doc.font,
            size: metrics.font_size,
        };

        let text_w = measure
            .measure(&node.name, font)
            .clamp(NODE_MIN_TEXT_WIDTH, NODE_MAX_TEXT_WIDTH);
        let lines = wrap_text(&node.name, text_w, measure, font);
        let h = metrics
            .min_height
            .max(lines.len() as f64 * metrics.line_height + NODE_PADDING_Y);

        let all_children = doc.children(id);
        let key = node.key;
        self.order.push(key);
        self.nodes.insert(
            key,
            LayoutNode {
                key,
                id,
                parent,
                children: Vec::new(),
                depth,
                x: depth as f64 * column,
                y: 0.0,
                w: text_w + NODE_PADDING_X,
                h,
                subtree_h: h,
                lines,
                metrics,
                has_children: !all_children.is_empty(),
                is_collapsed: node.is_collapsed,
                has_card: node.has_card(),
            },
        );

        if node.is_collapsed {
            return Some(key);
        }

        let mut children = Vec::with_capacity(all_children.len());
        let mut stacked = 0.0;
        for child in all_children {
            if let Some(child_key) =
                self.measure_subtree(doc, measure, child, Some(key), depth + 1, column, gap)
            {
                if !children.is_empty() {
                    stacked += gap;
                }
                stacked += self.nodes.get(&child_key).map_or(0.0, |c| c.subtree_h);
                children.push(child_key);
            }
        }

        if let Some(entry) = self.nodes.get_mut(&key) {
            entry.subtree_h = entry.h.max(stacked);
            entry.children = children;
        }
        Some(key)
    }

    fn place_subtree(&mut self, key: NodeKey, top: f64, gap: f64) {
        let Some(node) = self.nodes.get(&key) else {
            return;
        };
        let children = node.children.clone();
        let (h, subtree_h) = (node.h, node.subtree_h);

        if children.is_empty() {
            if let Some(node) = self.nodes.get_mut(&key) {
                node.y = top + (subtree_h - h) / 2.0;
            }
            return;
        }

        let span: f64 = children
            .iter()
            .filter_map(|c| self.nodes.get(c).map(|n| n.subtree_h))
            .sum::<f64>()
            + gap * (children.len() - 1) as f64;

        // Children block sits centered in the reserved height
        let mut cursor = top + (subtree_h - span) / 2.0;
        for child in &children {
            self.place_subtree(*child, cursor, gap);
            cursor += self.nodes.get(child).map_or(0.0, |c| c.subtree_h) + gap;
        }

        let first = self.nodes.get(&children[0]).map(|n| n.center_y());
        let last = self
            .nodes
            .get(&children[children.len() - 1])
            .map(|n| n.center_y());
        if let (Some(first), Some(last), Some(node)) = (first, last, self.nodes.get_mut(&key)) {
            node.y = (first + last) / 2.0 - h / 2.0;
        }
    }
}

/// Greedily packs words into lines no wider than `max_width`.
/// A single word wider than the limit gets a line of its own.
pub fn wrap_text(text: &str, max_width: f64, measure: &dyn TextMeasure, font: FontSpec) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return vec![text.to_string()];
    }

    let space_width = measure.measure(" ", font);
    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0.0;

    for word in words {
        let word_width = measure.measure(word, font);

        if !current_line.is_empty() && current_width + space_width + word_width > max_width {
            lines.push(std::mem::take(&mut current_line));
            current_line.push_str(word);
            current_width = word_width;
        } else {
            if !current_line.is_empty() {
                current_line.push(' ');
                current_width += space_width;
            }
            current_line.push_str(word);
            current_width += word_width;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Document;
    use crate::theme::LayoutStyle;

    const FONT: FontSpec = FontSpec {
        family: FontFamily::JetbrainsMono,
        size: 14.0,
    };

    fn key_of(doc: &Document, name: &str) -> NodeKey {
        doc.root
            .descendants(&doc.tree)
            .filter_map(|id| doc.node(id))
            .find(|n| n.name == name)
            .map(|n| n.key)
            .unwrap()
    }

    fn sample() -> Document {
        let mut doc = Document::default_map();
        let t1 = key_of(&doc, "Main Topic 1");
        let t2 = key_of(&doc, "Main Topic 2");
        doc.add_child(t1, "Fundamental Rights");
        doc.add_child(t1, "Directive Principles of State Policy and their enforceability");
        doc.add_child(t1, "Emergency");
        doc.add_child(t2, "Monetary Policy");
        doc
    }

    fn check_containment(layout: &Layout, key: NodeKey, gap: f64) {
        let node = layout.get(key).unwrap();
        if node.children.is_empty() {
            return;
        }
        let children: Vec<&LayoutNode> = node.children.iter().map(|c| layout.get(*c).unwrap()).collect();
        let stacked: f64 = children.iter().map(|c| c.subtree_h).sum::<f64>()
            + gap * (children.len() - 1) as f64;
        assert!(node.subtree_h + 1e-9 >= stacked);

        let first = children[0].center_y();
        let last = children[children.len() - 1].center_y();
        let center = node.center_y();
        assert!(center >= first - 1e-9 && center <= last + 1e-9);

        for c in &node.children {
            check_containment(layout, *c, gap);
        }
    }

    #[test]
    fn test_wrap_text() {
        let text = "This is a very long line that should be wrapped";
        let max = 15.0 * 14.0 * 0.6;
        let lines = wrap_text(text, max, &ApproxMeasure, FONT);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.width() <= 15);
        }
    }

    #[test]
    fn test_wrap_text_single_long_word() {
        let lines = wrap_text("Supercalifragilistic", 10.0, &ApproxMeasure, FONT);
        assert_eq!(lines, vec!["Supercalifragilistic"]);
    }

    #[test]
    fn test_wrap_text_empty() {
        assert_eq!(wrap_text("", 100.0, &ApproxMeasure, FONT), vec![""]);
    }

    #[test]
    fn test_x_follows_depth() {
        let doc = sample();
        let layout = Layout::compute(&doc, &ApproxMeasure);
        let column = NODE_MAX_TEXT_WIDTH + NODE_PADDING_X + doc.layout.horizontal_gap();

        for node in layout.iter() {
            assert_eq!(node.x, node.depth as f64 * column);
        }
        // Boxes never reach into the next column
        for node in layout.iter() {
            assert!(node.w <= NODE_MAX_TEXT_WIDTH + NODE_PADDING_X);
        }
    }

    #[test]
    fn test_width_clamped() {
        let mut doc = Document::new("A");
        let root = doc.root_key();
        doc.add_child(root, "x");
        let layout = Layout::compute(&doc, &ApproxMeasure);
        for node in layout.iter() {
            assert_eq!(node.w, NODE_MIN_TEXT_WIDTH + NODE_PADDING_X);
            assert_eq!(node.lines.len(), 1);
        }
    }

    #[test]
    fn test_long_names_wrap_and_grow() {
        let doc = sample();
        let layout = Layout::compute(&doc, &ApproxMeasure);
        let long = layout
            .get(key_of(&doc, "Directive Principles of State Policy and their enforceability"))
            .unwrap();
        assert_eq!(long.w, NODE_MAX_TEXT_WIDTH + NODE_PADDING_X);
        assert!(long.lines.len() > 1);
        assert_eq!(
            long.h,
            CHILD_METRICS
                .min_height
                .max(long.lines.len() as f64 * CHILD_METRICS.line_height + NODE_PADDING_Y)
        );
    }

    #[test]
    fn test_root_uses_larger_metrics() {
        let doc = sample();
        let layout = Layout::compute(&doc, &ApproxMeasure);
        let root = layout.get(doc.root_key()).unwrap();
        assert_eq!(root.metrics, ROOT_METRICS);
        assert!(root.h >= ROOT_METRICS.min_height);
    }

    #[test]
    fn test_containment_holds_for_both_styles() {
        for style in LayoutStyle::ALL {
            let mut doc = sample();
            doc.layout = style;
            let layout = Layout::compute(&doc, &ApproxMeasure);
            check_containment(&layout, doc.root_key(), style.vertical_gap());
        }
    }

    #[test]
    fn test_siblings_do_not_overlap() {
        let doc = sample();
        let layout = Layout::compute(&doc, &ApproxMeasure);
        for node in layout.iter() {
            for pair in node.children.windows(2) {
                let a = layout.get(pair[0]).unwrap();
                let b = layout.get(pair[1]).unwrap();
                assert!(a.y + a.h <= b.y);
            }
        }
    }

    #[test]
    fn test_collapsed_subtree_is_skipped() {
        let mut doc = sample();
        let t1 = key_of(&doc, "Main Topic 1");
        let hidden = key_of(&doc, "Emergency");
        doc.toggle_collapsed(t1);

        let layout = Layout::compute(&doc, &ApproxMeasure);
        let node = layout.get(t1).unwrap();
        assert!(node.children.is_empty());
        assert!(node.has_children);
        assert!(node.is_collapsed);
        assert!(layout.get(hidden).is_none());
        assert_eq!(node.subtree_h, node.h);
    }

    #[test]
    fn test_parent_back_references() {
        let doc = sample();
        let layout = Layout::compute(&doc, &ApproxMeasure);
        let leaf = key_of(&doc, "Emergency");
        let path: Vec<String> = layout
            .path_to(leaf)
            .into_iter()
            .filter_map(|k| doc.get(k).map(|n| n.name.clone()))
            .collect();
        assert_eq!(path, doc.compute_path(leaf));
    }

    #[test]
    fn test_layout_is_deterministic() {
        let doc = sample();
        let a = Layout::compute(&doc, &ApproxMeasure);
        let b = Layout::compute(&doc, &ApproxMeasure);
        assert_eq!(a, b);
        assert_eq!(a.order.first(), Some(&doc.root_key()));
    }
}

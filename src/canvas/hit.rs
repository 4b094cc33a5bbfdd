//! Click resolution against the current layout, in world coordinates.
//!
//! Targets are tested in priority order across every visible node: card
//! indicators first, collapse toggles second, node bodies last. A toggle
//! therefore wins even where it overlaps the body of its own node.

use crate::geometry::Point;
use crate::layout::{Layout, LayoutNode};
use crate::model::NodeKey;

/// Radius of the card indicator and collapse toggle glyphs, in world units.
pub const GLYPH_RADIUS: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    CardIndicator(NodeKey),
    CollapseToggle(NodeKey),
    Body(NodeKey),
}

impl HitTarget {
    pub fn node(self) -> NodeKey {
        match self {
            HitTarget::CardIndicator(k) | HitTarget::CollapseToggle(k) | HitTarget::Body(k) => k,
        }
    }
}

/// Top-right corner.
pub fn card_indicator_center(node: &LayoutNode) -> Point {
    Point::new(node.x + node.w, node.y)
}

/// Middle of the right edge.
pub fn toggle_center(node: &LayoutNode) -> Point {
    Point::new(node.x + node.w, node.center_y())
}

/// `glyph_radius` is in world units; callers widen it past [`GLYPH_RADIUS`]
/// when glyphs are drawn larger than their world size. Within one tier the
/// nearest glyph wins, since widened radii of neighbours can overlap.
pub fn hit_test(layout: &Layout, world: Point, glyph_radius: f64) -> Option<HitTarget> {
    let nearest = |has: fn(&LayoutNode) -> bool, center: fn(&LayoutNode) -> Point| {
        layout
            .iter()
            .filter(|n| has(n))
            .map(|n| (n.key, center(n).distance(world)))
            .filter(|(_, d)| *d <= glyph_radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(key, _)| key)
    };

    if let Some(key) = nearest(|n| n.has_card, card_indicator_center) {
        return Some(HitTarget::CardIndicator(key));
    }
    if let Some(key) = nearest(|n| n.has_children, toggle_center) {
        return Some(HitTarget::CollapseToggle(key));
    }

    layout
        .iter()
        .find(|n| n.rect().contains(world))
        .map(|n| HitTarget::Body(n.key))
}

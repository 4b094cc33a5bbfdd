use crate::geometry::{Point, Rect};

/// Gap between the anchor point and the popup.
pub const POPUP_OFFSET: f64 = 8.0;

/// Places a `width` x `height` popup next to `anchor`, preferring below-right.
/// The popup flips to the other side of the anchor on each axis where it would
/// leave `viewport`, and is clamped inside it as a last resort.
pub fn place_popup(anchor: Point, width: f64, height: f64, viewport: Rect) -> Rect {
    let mut x = anchor.x + POPUP_OFFSET;
    if x + width > viewport.right() {
        x = anchor.x - POPUP_OFFSET - width;
    }
    let mut y = anchor.y + POPUP_OFFSET;
    if y + height > viewport.bottom() {
        y = anchor.y - POPUP_OFFSET - height;
    }

    let x = x.min(viewport.right() - width).max(viewport.x);
    let y = y.min(viewport.bottom() - height).max(viewport.y);
    Rect::new(x, y, width, height)
}

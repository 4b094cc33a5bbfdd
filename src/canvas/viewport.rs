use crate::geometry::{Point, Rect};

pub const DEFAULT_SCALE: f64 = 1.0;
pub const DEFAULT_OFFSET: Point = Point::new(40.0, 40.0);

/// Zoom limits and step, taken from the configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomSettings {
    pub min: f64,
    pub max: f64,
    /// Multiplicative increment of one wheel notch or key press.
    pub step: f64,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            min: 0.2,
            max: 2.0,
            step: 1.1,
        }
    }
}

/// Maps world (layout) coordinates to view coordinates:
/// `view = world * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub offset: Point,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl ViewTransform {
    pub fn to_view(&self, world: Point) -> Point {
        Point::new(
            world.x * self.scale + self.offset.x,
            world.y * self.scale + self.offset.y,
        )
    }

    pub fn to_world(&self, view: Point) -> Point {
        Point::new(
            (view.x - self.offset.x) / self.scale,
            (view.y - self.offset.y) / self.scale,
        )
    }

    pub fn world_rect_to_view(&self, rect: Rect) -> Rect {
        let origin = self.to_view(Point::new(rect.x, rect.y));
        Rect::new(origin.x, origin.y, rect.w * self.scale, rect.h * self.scale)
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset.x += dx;
        self.offset.y += dy;
    }

    /// Multiplies the scale by `factor`, clamped to the zoom range, keeping
    /// the world point under `anchor` at the same view position.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64, zoom: &ZoomSettings) -> bool {
        if !(factor.is_finite() && factor > 0.0) {
            return false;
        }
        let new_scale = (self.scale * factor).clamp(zoom.min, zoom.max);
        if (new_scale - self.scale).abs() <= f64::EPSILON {
            return false;
        }
        let world = self.to_world(anchor);
        self.scale = new_scale;
        self.offset = Point::new(anchor.x - world.x * new_scale, anchor.y - world.y * new_scale);
        true
    }

    pub fn zoom_in(&mut self, anchor: Point, zoom: &ZoomSettings) -> bool {
        self.zoom_at(anchor, zoom.step, zoom)
    }

    pub fn zoom_out(&mut self, anchor: Point, zoom: &ZoomSettings) -> bool {
        self.zoom_at(anchor, 1.0 / zoom.step, zoom)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_round_trip() {
        let view = ViewTransform {
            scale: 1.7,
            offset: Point::new(-12.0, 33.5),
        };
        let p = Point::new(120.0, -8.0);
        assert!(close(view.to_world(view.to_view(p)), p));
    }

    #[test]
    fn test_zoom_keeps_anchor_stationary() {
        let zoom = ZoomSettings::default();
        let mut view = ViewTransform::default();
        let anchors = [Point::new(0.0, 0.0), Point::new(312.0, 97.0), Point::new(-40.0, 800.0)];

        for anchor in anchors {
            for factor in [1.1, 1.0 / 1.1, 1.5, 0.7] {
                let world = view.to_world(anchor);
                view.zoom_at(anchor, factor, &zoom);
                assert!(close(view.to_view(world), anchor));
            }
        }
    }

    #[test]
    fn test_zoom_is_multiplicative_and_clamped() {
        let zoom = ZoomSettings::default();
        let mut view = ViewTransform::default();
        view.zoom_in(Point::default(), &zoom);
        view.zoom_in(Point::default(), &zoom);
        assert!((view.scale - 1.21).abs() < 1e-9);

        for _ in 0..50 {
            view.zoom_in(Point::new(10.0, 10.0), &zoom);
        }
        assert_eq!(view.scale, zoom.max);
        assert!(!view.zoom_in(Point::new(10.0, 10.0), &zoom));

        for _ in 0..100 {
            view.zoom_out(Point::new(10.0, 10.0), &zoom);
        }
        assert_eq!(view.scale, zoom.min);
    }

    #[test]
    fn test_rejects_bad_factor() {
        let zoom = ZoomSettings::default();
        let mut view = ViewTransform::default();
        assert!(!view.zoom_at(Point::default(), 0.0, &zoom));
        assert!(!view.zoom_at(Point::default(), f64::NAN, &zoom));
        assert_eq!(view, ViewTransform::default());
    }

    #[test]
    fn test_reset() {
        let mut view = ViewTransform::default();
        view.pan(100.0, -20.0);
        view.zoom_in(Point::new(5.0, 5.0), &ZoomSettings::default());
        view.reset();
        assert_eq!(view.scale, DEFAULT_SCALE);
        assert_eq!(view.offset, DEFAULT_OFFSET);
    }

    #[test]
    fn test_world_rect_to_view() {
        let view = ViewTransform {
            scale: 2.0,
            offset: Point::new(10.0, 20.0),
        };
        let r = view.world_rect_to_view(Rect::new(5.0, 5.0, 100.0, 40.0));
        assert_eq!(r, Rect::new(20.0, 30.0, 200.0, 80.0));
    }
}

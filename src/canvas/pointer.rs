use crate::geometry::Point;
use crate::model::NodeKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// Mouse (or single pointer) event in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Point,
    pub time_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
}

/// Touch event carrying every finger still on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub touches: Vec<Point>,
    pub time_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    Panning {
        kind: PointerKind,
        start: Point,
        last: Point,
    },
    Pinching {
        distance: f64,
    },
    /// A pinch lost a finger; ignore input until every finger is lifted.
    PinchEnded,
}

/// What a gesture step asks of the view or the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Pan { dx: f64, dy: f64 },
    Zoom { anchor: Point, factor: f64 },
    Click {
        kind: PointerKind,
        position: Point,
        time_ms: u64,
    },
}

/// Pointer and touch state machine. Panning and clicks share one path for
/// both kinds; pinch is a separate path that never pans.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    state: GestureState,
    click_threshold: f64,
}

impl GestureTracker {
    pub fn new(click_threshold: f64) -> Self {
        Self {
            state: GestureState::Idle,
            click_threshold,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn pointer(&mut self, event: PointerEvent) -> Option<Gesture> {
        self.step(PointerKind::Mouse, event.phase, event.position, event.time_ms)
    }

    pub fn touch(&mut self, event: &TouchEvent) -> Option<Gesture> {
        match (event.phase, event.touches.as_slice()) {
            (TouchPhase::Start | TouchPhase::Move, [a, b, ..]) => {
                let distance = a.distance(*b);
                match self.state {
                    GestureState::Pinching { distance: last } if last > 0.0 => {
                        self.state = GestureState::Pinching { distance };
                        Some(Gesture::Zoom {
                            anchor: a.midpoint(*b),
                            factor: distance / last,
                        })
                    }
                    _ => {
                        // A second finger turns any pan into a pinch
                        self.state = GestureState::Pinching { distance };
                        None
                    }
                }
            }
            (TouchPhase::Start, [p]) => match self.state {
                GestureState::Idle => self.step(PointerKind::Touch, PointerPhase::Down, *p, event.time_ms),
                _ => None,
            },
            (TouchPhase::Move, [p]) => match self.state {
                GestureState::Panning { .. } => {
                    self.step(PointerKind::Touch, PointerPhase::Move, *p, event.time_ms)
                }
                GestureState::Pinching { .. } => {
                    self.state = GestureState::PinchEnded;
                    None
                }
                _ => None,
            },
            (TouchPhase::End, touches) => match self.state {
                GestureState::Panning { last, .. } if touches.is_empty() => {
                    self.step(PointerKind::Touch, PointerPhase::Up, last, event.time_ms)
                }
                GestureState::Pinching { .. } | GestureState::PinchEnded => {
                    self.state = if touches.is_empty() {
                        GestureState::Idle
                    } else {
                        GestureState::PinchEnded
                    };
                    None
                }
                _ => None,
            },
            _ => None,
        }
    }

    fn step(&mut self, kind: PointerKind, phase: PointerPhase, position: Point, time_ms: u64) -> Option<Gesture> {
        match (phase, self.state) {
            (PointerPhase::Down, _) => {
                self.state = GestureState::Panning {
                    kind,
                    start: position,
                    last: position,
                };
                None
            }
            (PointerPhase::Move, GestureState::Panning { kind: k, start, last }) if k == kind => {
                self.state = GestureState::Panning {
                    kind,
                    start,
                    last: position,
                };
                Some(Gesture::Pan {
                    dx: position.x - last.x,
                    dy: position.y - last.y,
                })
            }
            (PointerPhase::Up, GestureState::Panning { kind: k, start, .. }) if k == kind => {
                self.state = GestureState::Idle;
                (start.distance(position) < self.click_threshold).then_some(Gesture::Click {
                    kind,
                    position,
                    time_ms,
                })
            }
            _ => None,
        }
    }
}

/// Remembers the last clicked node per pointer kind to detect double clicks.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    window_ms: u64,
    mouse: Option<(NodeKey, u64)>,
    touch: Option<(NodeKey, u64)>,
}

impl ClickTracker {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            mouse: None,
            touch: None,
        }
    }

    /// Records a click on `node` and reports whether it completes a double click.
    pub fn register(&mut self, kind: PointerKind, node: NodeKey, time_ms: u64) -> bool {
        let slot = match kind {
            PointerKind::Mouse => &mut self.mouse,
            PointerKind::Touch => &mut self.touch,
        };
        let double = matches!(*slot, Some((prev, at)) if prev == node && time_ms.saturating_sub(at) <= self.window_ms);
        *slot = if double { None } else { Some((node, time_ms)) };
        double
    }

    pub fn reset(&mut self, kind: PointerKind) {
        match kind {
            PointerKind::Mouse => self.mouse = None,
            PointerKind::Touch => self.touch = None,
        }
    }
}

//! The interaction surface between raw input and the document.
//!
//! `CanvasSurface` owns the view transform, the gesture and keyboard state
//! machines, and the selection. It turns view-space input into view changes,
//! which it applies itself, and [`Intent`]s, which the caller applies to the
//! document store. Everything is resolved against the latest [`Layout`], so a
//! node that vanished since the last pass simply produces no intent.

pub mod hit;
pub mod keyboard;
pub mod pointer;
pub mod popup;
pub mod viewport;

use crate::geometry::{Point, Rect};
use crate::layout::Layout;
use crate::model::NodeKey;
use hit::{hit_test, HitTarget, GLYPH_RADIUS};
use keyboard::{ChordOutcome, KeyCommand, KeyInput, KeyboardMachine, NavDirection};
use pointer::{ClickTracker, Gesture, GestureTracker, PointerEvent, TouchEvent};
use tracing::debug;
use viewport::{ViewTransform, ZoomSettings};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSettings {
    pub zoom: ZoomSettings,
    pub click_threshold: f64,
    pub double_click_ms: u64,
    /// Lower bound of the glyph hit radius in view units. Keeps a glyph
    /// drawn at a fixed on-screen size clickable when zoomed out.
    pub min_glyph_hit: f64,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            zoom: ZoomSettings::default(),
            click_threshold: 5.0,
            double_click_ms: 300,
            min_glyph_hit: 0.0,
        }
    }
}

/// A semantic request against the document, produced by input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    Select(Option<NodeKey>),
    BeginRename(NodeKey),
    ToggleCollapse(NodeKey),
    /// `anchor` is the click position in view coordinates.
    OpenCard { node: NodeKey, anchor: Point },
    InsertSibling(NodeKey),
    AddChild(NodeKey),
    Delete(NodeKey),
    Undo,
    Redo,
}

#[derive(Debug, Clone)]
pub struct CanvasSurface {
    pub view: ViewTransform,
    settings: CanvasSettings,
    gestures: GestureTracker,
    keyboard: KeyboardMachine,
    clicks: ClickTracker,
    selection: Option<NodeKey>,
    viewport: Rect,
}

impl Default for CanvasSurface {
    fn default() -> Self {
        Self::new(CanvasSettings::default())
    }
}

impl CanvasSurface {
    pub fn new(settings: CanvasSettings) -> Self {
        Self {
            view: ViewTransform::default(),
            settings,
            gestures: GestureTracker::new(settings.click_threshold),
            keyboard: KeyboardMachine::default(),
            clicks: ClickTracker::new(settings.double_click_ms),
            selection: None,
            viewport: Rect::default(),
        }
    }

    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    pub fn selection(&self) -> Option<NodeKey> {
        self.selection
    }

    pub fn select(&mut self, key: Option<NodeKey>) {
        self.selection = key;
    }

    pub fn keyboard(&self) -> &KeyboardMachine {
        &self.keyboard
    }

    /// Visible area in view coordinates, used for keyboard zoom and popups.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Drops the selection if its node is no longer laid out.
    pub fn prune_selection(&mut self, layout: &Layout) {
        if self.selection.is_some_and(|k| layout.get(k).is_none()) {
            self.selection = None;
        }
    }

    /// Abandons a half-typed chord, e.g. when a modal editor opens.
    pub fn cancel_chord(&mut self) {
        self.keyboard.reset();
    }

    /// Glyph hit radius in world units at the current scale.
    pub fn glyph_hit_radius(&self) -> f64 {
        GLYPH_RADIUS.max(self.settings.min_glyph_hit / self.view.scale)
    }

    pub fn reset_view(&mut self) {
        self.view.reset();
    }

    /// Box of `key` in view coordinates, for placing an inline editor over it.
    pub fn rename_box(&self, layout: &Layout, key: NodeKey) -> Option<Rect> {
        layout.get(key).map(|n| self.view.world_rect_to_view(n.rect()))
    }

    pub fn pointer(&mut self, event: PointerEvent, layout: &Layout) -> Vec<Intent> {
        let gesture = self.gestures.pointer(event);
        self.apply_gesture(gesture, layout)
    }

    pub fn touch(&mut self, event: &TouchEvent, layout: &Layout) -> Vec<Intent> {
        let gesture = self.gestures.touch(event);
        self.apply_gesture(gesture, layout)
    }

    /// Positive `notches` zoom in, negative zoom out, anchored at `position`.
    pub fn wheel(&mut self, position: Point, notches: i32) -> bool {
        let factor = self.settings.zoom.step.powi(notches);
        self.view.zoom_at(position, factor, &self.settings.zoom)
    }

    pub fn key(&mut self, input: KeyInput, layout: &Layout) -> Vec<Intent> {
        let Some(command) = self.keyboard.handle(input) else {
            return Vec::new();
        };
        debug!(?command, "key command");

        match command {
            KeyCommand::Undo => vec![Intent::Undo],
            KeyCommand::Redo => vec![Intent::Redo],
            KeyCommand::ZoomIn => {
                let center = self.viewport.center();
                self.view.zoom_in(center, &self.settings.zoom);
                Vec::new()
            }
            KeyCommand::ZoomOut => {
                let center = self.viewport.center();
                self.view.zoom_out(center, &self.settings.zoom);
                Vec::new()
            }
            KeyCommand::ResetView => {
                self.reset_view();
                Vec::new()
            }
            KeyCommand::Navigate(direction) => self
                .navigate(layout, direction)
                .map(|target| {
                    self.selection = Some(target);
                    vec![Intent::Select(Some(target))]
                })
                .unwrap_or_default(),
            KeyCommand::InsertSibling => match self.selected_node(layout) {
                Some(node) if node.parent.is_some() => vec![Intent::InsertSibling(node.key)],
                _ => Vec::new(),
            },
            KeyCommand::Delete => self
                .selected_node(layout)
                .map(|n| vec![Intent::Delete(n.key)])
                .unwrap_or_default(),
            KeyCommand::Chord(outcome) => {
                let Some(key) = self.selected_node(layout).map(|n| n.key) else {
                    return Vec::new();
                };
                match outcome {
                    ChordOutcome::Chord => vec![Intent::BeginRename(key)],
                    ChordOutcome::HoldRelease => vec![Intent::AddChild(key)],
                    ChordOutcome::Cancelled => Vec::new(),
                }
            }
        }
    }

    fn selected_node<'a>(&self, layout: &'a Layout) -> Option<&'a crate::layout::LayoutNode> {
        self.selection.and_then(|k| layout.get(k))
    }

    fn navigate(&self, layout: &Layout, direction: NavDirection) -> Option<NodeKey> {
        let node = self.selected_node(layout)?;
        match direction {
            NavDirection::Parent => node.parent,
            NavDirection::FirstChild => node.children.first().copied(),
            NavDirection::PrevSibling | NavDirection::NextSibling => {
                let siblings = &layout.get(node.parent?)?.children;
                let index = siblings.iter().position(|k| *k == node.key)?;
                let target = match direction {
                    NavDirection::PrevSibling => index.checked_sub(1)?,
                    _ => index + 1,
                };
                siblings.get(target).copied()
            }
        }
    }

    fn apply_gesture(&mut self, gesture: Option<Gesture>, layout: &Layout) -> Vec<Intent> {
        match gesture {
            None => Vec::new(),
            Some(Gesture::Pan { dx, dy }) => {
                self.view.pan(dx, dy);
                Vec::new()
            }
            Some(Gesture::Zoom { anchor, factor }) => {
                self.view.zoom_at(anchor, factor, &self.settings.zoom);
                Vec::new()
            }
            Some(Gesture::Click {
                kind,
                position,
                time_ms,
            }) => {
                let world = self.view.to_world(position);
                match hit_test(layout, world, self.glyph_hit_radius()) {
                    Some(HitTarget::CardIndicator(node)) => {
                        self.clicks.reset(kind);
                        vec![Intent::OpenCard {
                            node,
                            anchor: position,
                        }]
                    }
                    Some(HitTarget::CollapseToggle(node)) => {
                        self.clicks.reset(kind);
                        vec![Intent::ToggleCollapse(node)]
                    }
                    Some(HitTarget::Body(node)) => {
                        self.selection = Some(node);
                        if self.clicks.register(kind, node, time_ms) {
                            vec![Intent::BeginRename(node)]
                        } else {
                            vec![Intent::Select(Some(node))]
                        }
                    }
                    None => {
                        self.clicks.reset(kind);
                        self.selection = None;
                        vec![Intent::Select(None)]
                    }
                }
            }
        }
    }
}

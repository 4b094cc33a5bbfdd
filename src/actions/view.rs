use crate::actions::{editing, history, node};
use crate::app::{AppMode, AppState};
use crate::canvas::keyboard::KeyInput;
use crate::canvas::pointer::{PointerEvent, TouchEvent};
use crate::canvas::Intent;
use crate::geometry::{Point, Rect};

pub fn pointer(app: &mut AppState, event: PointerEvent) {
    let (canvas, layout) = app.canvas_and_layout();
    let intents = canvas.pointer(event, layout);
    apply_intents(app, intents);
}

pub fn touch(app: &mut AppState, event: &TouchEvent) {
    let (canvas, layout) = app.canvas_and_layout();
    let intents = canvas.touch(event, layout);
    apply_intents(app, intents);
}

pub fn wheel(app: &mut AppState, position: Point, notches: i32) {
    app.canvas.wheel(position, notches);
}

pub fn key(app: &mut AppState, input: KeyInput) {
    let (canvas, layout) = app.canvas_and_layout();
    let intents = canvas.key(input, layout);
    apply_intents(app, intents);
}

pub fn resize(app: &mut AppState, width: f64, height: f64) {
    app.canvas.set_viewport(Rect::new(0.0, 0.0, width, height));
}

/// Carries out what the canvas asked for. Selection changes were already
/// applied by the canvas itself.
pub fn apply_intents(app: &mut AppState, intents: Vec<Intent>) {
    for intent in intents {
        // Earlier intents may have opened an editor or an alert
        if app.mode != AppMode::Normal {
            break;
        }
        match intent {
            Intent::Select(_) => app.clear_message(),
            Intent::BeginRename(key) => editing::begin_rename(app, key),
            Intent::ToggleCollapse(key) => node::toggle_collapse(app, key),
            Intent::OpenCard { node, anchor } => editing::open_card_viewer(app, node, anchor),
            Intent::InsertSibling(key) => node::insert_sibling(app, key),
            Intent::AddChild(key) => node::add_child(app, key),
            Intent::Delete(key) => node::delete_node(app, key),
            Intent::Undo => history::undo(app),
            Intent::Redo => history::redo(app),
        }
        app.refresh_layout();
    }
}

// Each test binary uses a different subset of these helpers
#![allow(dead_code)]

use mindcanvas::actions::{execute_action, Action};
use mindcanvas::canvas::keyboard::{Key, KeyInput};
use mindcanvas::canvas::pointer::{PointerEvent, PointerPhase};
use mindcanvas::geometry::Point;
use mindcanvas::{AppConfig, AppState, Document, DocumentStore, NodeKey};

/// App over an in-memory store holding the default map.
pub fn create_test_app() -> AppState {
    AppState::new(AppConfig::default(), DocumentStore::in_memory())
}

/// Names of the direct children of `key`, in order.
pub fn child_names(doc: &Document, key: NodeKey) -> Vec<String> {
    let Some(id) = doc.find_by_id(key) else {
        return Vec::new();
    };
    doc.children(id)
        .into_iter()
        .filter_map(|c| doc.node(c).map(|n| n.name.clone()))
        .collect()
}

/// First node whose name matches, in pre-order.
pub fn find_by_name(doc: &Document, name: &str) -> Option<NodeKey> {
    doc.tree
        .iter()
        .filter(|n| !n.is_removed())
        .map(|n| n.get())
        .find(|n| n.name == name)
        .map(|n| n.key)
}

pub fn run(app: &mut AppState, action: Action) {
    execute_action(action, app).unwrap();
}

pub fn press(app: &mut AppState, key: Key) {
    run(app, Action::Key(KeyInput::press(key)));
}

pub fn release(app: &mut AppState, key: Key) {
    run(app, Action::Key(KeyInput::release(key)));
}

pub fn type_text(app: &mut AppState, text: &str) {
    for c in text.chars() {
        run(app, Action::TypeChar(c));
    }
}

/// View-space position of a world point under the current transform.
pub fn to_view(app: &AppState, world: Point) -> Point {
    app.canvas.view.to_view(world)
}

pub fn pointer(app: &mut AppState, phase: PointerPhase, position: Point, time_ms: u64) {
    run(
        app,
        Action::Pointer(PointerEvent {
            phase,
            position,
            time_ms,
        }),
    );
}

pub fn click(app: &mut AppState, position: Point, time_ms: u64) {
    pointer(app, PointerPhase::Down, position, time_ms);
    pointer(app, PointerPhase::Up, position, time_ms + 30);
}

/// Builds a small two-level map through the store, one undo step per edit.
pub fn build_sample(app: &mut AppState) {
    let root = app.document().root_key();
    app.store.rename_node(root, "Indian Polity");
    let first = find_by_name(app.document(), "Main Topic 1").unwrap();
    let second = find_by_name(app.document(), "Main Topic 2").unwrap();
    app.store.rename_node(first, "Constitution");
    app.store.rename_node(second, "Parliament");
    app.store.add_child(first, "Preamble");
    app.store.add_child(first, "Fundamental Rights");
    app.store.add_child(second, "Lok Sabha");
    app.refresh_layout();
}

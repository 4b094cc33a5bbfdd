use crate::actions::editing;
use crate::app::AppState;
use crate::model::{NodeKey, NEW_NODE_NAME};
use tracing::debug;

/// Inserts "New Node" after `sibling` and opens its rename editor.
/// The root has no siblings, so nothing happens there.
pub fn insert_sibling(app: &mut AppState, sibling: NodeKey) {
    if let Some(key) = app.store.insert_sibling_after(sibling, NEW_NODE_NAME) {
        debug!(%key, %sibling, "sibling inserted");
        app.refresh_layout();
        app.canvas.select(Some(key));
        editing::begin_rename(app, key);
    }
}

pub fn add_child(app: &mut AppState, parent: NodeKey) {
    if let Some(key) = app.store.add_child(parent, NEW_NODE_NAME) {
        debug!(%key, %parent, "child added");
        app.refresh_layout();
        app.canvas.select(Some(key));
        editing::begin_rename(app, key);
    }
}

/// Deletes `key` with its subtree and selects its parent. Deleting the root
/// raises a warning and leaves the maps untouched.
pub fn delete_node(app: &mut AppState, key: NodeKey) {
    let parent = app.layout().get(key).and_then(|n| n.parent);
    match app.store.delete_node(key) {
        Ok(true) => {
            app.refresh_layout();
            if app.selection().is_none() {
                app.canvas.select(parent);
            }
        }
        Ok(false) => {}
        Err(e) => app.alert(e.to_string()),
    }
}

pub fn toggle_collapse(app: &mut AppState, key: NodeKey) {
    let has_children = app
        .document()
        .find_by_id(key)
        .is_some_and(|id| !app.document().children(id).is_empty());
    if has_children {
        app.store.toggle_collapsed(key);
    }
}

pub fn toggle_collapse_selected(app: &mut AppState) {
    if let Some(key) = app.selection() {
        toggle_collapse(app, key);
    }
}

use crate::app::AppState;

pub fn undo(app: &mut AppState) {
    if app.store.undo() {
        app.refresh_layout();
        app.set_message("Undone");
    } else {
        app.set_message("Nothing to undo");
    }
}

pub fn redo(app: &mut AppState) {
    if app.store.redo() {
        app.refresh_layout();
        app.set_message("Redone");
    } else {
        app.set_message("Nothing to redo");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::store::DocumentStore;

    fn create_test_app() -> AppState {
        AppState::new(AppConfig::default(), DocumentStore::in_memory())
    }

    #[test]
    fn test_undo_redo() {
        let mut app = create_test_app();
        let root = app.document().root_key();
        app.store.rename_node(root, "Polity");

        undo(&mut app);
        assert_eq!(app.document().get(root).unwrap().name, "New Mindmap");
        assert_eq!(app.message.as_deref(), Some("Undone"));

        redo(&mut app);
        assert_eq!(app.document().get(root).unwrap().name, "Polity");
        assert_eq!(app.message.as_deref(), Some("Redone"));
    }

    #[test]
    fn test_nothing_to_undo() {
        let mut app = create_test_app();
        undo(&mut app);
        assert_eq!(app.message.as_deref(), Some("Nothing to undo"));
        redo(&mut app);
        assert_eq!(app.message.as_deref(), Some("Nothing to redo"));
    }
}

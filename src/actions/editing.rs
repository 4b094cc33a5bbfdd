use crate::app::{AppMode, AppState};
use crate::geometry::Point;
use crate::model::NodeKey;

// Cursor positions count chars, not bytes.
fn byte_index(buffer: &str, char_pos: usize) -> usize {
    buffer
        .char_indices()
        .nth(char_pos)
        .map(|(i, _)| i)
        .unwrap_or(buffer.len())
}

pub fn begin_rename(app: &mut AppState, key: NodeKey) {
    let Some(node) = app.document().get(key) else {
        return;
    };
    let buffer = node.name.clone();
    let cursor_pos = buffer.chars().count();
    app.canvas.cancel_chord();
    app.mode = AppMode::Renaming {
        node: key,
        buffer,
        cursor_pos,
    };
}

pub fn rename_selection(app: &mut AppState) {
    if let Some(key) = app.selection() {
        begin_rename(app, key);
    }
}

pub fn open_card_editor(app: &mut AppState) {
    let Some(node) = app.selected_node() else {
        return;
    };
    let key = node.key;
    let buffer = node.card_content.clone().unwrap_or_default();
    app.canvas.cancel_chord();
    app.mode = AppMode::CardEditing { node: key, buffer };
}

pub fn open_card_viewer(app: &mut AppState, key: NodeKey, anchor: Point) {
    if app.document().get(key).is_some_and(|n| n.has_card()) {
        app.canvas.cancel_chord();
        app.mode = AppMode::CardViewer { node: key, anchor };
    }
}

/// Opens the viewer next to the selected node's card indicator.
pub fn open_card_viewer_for_selection(app: &mut AppState) {
    let Some(key) = app.selection() else {
        return;
    };
    let Some(node) = app.layout().get(key) else {
        return;
    };
    let anchor = app
        .canvas
        .view
        .to_view(crate::canvas::hit::card_indicator_center(node));
    if app.document().get(key).is_some_and(|n| n.has_card()) {
        open_card_viewer(app, key, anchor);
    } else {
        app.set_message("This node has no card. Press c to write one");
    }
}

pub fn type_char(app: &mut AppState, c: char) {
    match &mut app.mode {
        AppMode::Renaming {
            buffer, cursor_pos, ..
        } => {
            if c == '\n' {
                return;
            }
            let at = byte_index(buffer, *cursor_pos);
            buffer.insert(at, c);
            *cursor_pos += 1;
        }
        AppMode::CardEditing { buffer, .. } => buffer.push(c),
        _ => {}
    }
}

pub fn backspace(app: &mut AppState) {
    match &mut app.mode {
        AppMode::Renaming {
            buffer, cursor_pos, ..
        } => {
            if *cursor_pos > 0 {
                *cursor_pos -= 1;
                let at = byte_index(buffer, *cursor_pos);
                buffer.remove(at);
            }
        }
        AppMode::CardEditing { buffer, .. } => {
            buffer.pop();
        }
        _ => {}
    }
}

pub fn delete_char(app: &mut AppState) {
    if let AppMode::Renaming {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        if *cursor_pos < buffer.chars().count() {
            let at = byte_index(buffer, *cursor_pos);
            buffer.remove(at);
        }
    }
}

pub fn move_cursor_left(app: &mut AppState) {
    if let AppMode::Renaming { cursor_pos, .. } = &mut app.mode {
        *cursor_pos = cursor_pos.saturating_sub(1);
    }
}

pub fn move_cursor_right(app: &mut AppState) {
    if let AppMode::Renaming {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        if *cursor_pos < buffer.chars().count() {
            *cursor_pos += 1;
        }
    }
}

pub fn move_cursor_home(app: &mut AppState) {
    if let AppMode::Renaming { cursor_pos, .. } = &mut app.mode {
        *cursor_pos = 0;
    }
}

pub fn move_cursor_end(app: &mut AppState) {
    if let AppMode::Renaming {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        *cursor_pos = buffer.chars().count();
    }
}

/// Commits the open editor. An empty name keeps the old one; an empty card
/// removes the card.
pub fn confirm_edit(app: &mut AppState) {
    match std::mem::replace(&mut app.mode, AppMode::Normal) {
        AppMode::Renaming { node, buffer, .. } => {
            let name = buffer.trim();
            if name.is_empty() {
                app.set_message("Name cannot be empty");
            } else {
                app.store.rename_node(node, name);
            }
        }
        AppMode::CardEditing { node, buffer } => {
            let content = buffer.trim_end().to_string();
            app.store.set_card_content(node, Some(content));
        }
        other => app.mode = other,
    }
}

pub fn cancel_edit(app: &mut AppState) {
    if app.is_editing() {
        app.mode = AppMode::Normal;
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

    fn buffer(app: &AppState) -> (String, usize) {
        match &app.mode {
            AppMode::Renaming {
                buffer, cursor_pos, ..
            } => (buffer.clone(), *cursor_pos),
            other => panic!("not renaming: {other:?}"),
        }
    }

    #[test]
    fn test_rename_round() {
        let mut app = create_test_app();
        let root = app.document().root_key();
        begin_rename(&mut app, root);
        assert_eq!(buffer(&app), ("New Mindmap".to_string(), 11));

        for _ in 0..7 {
            backspace(&mut app);
        }
        for c in "Polity".chars() {
            type_char(&mut app, c);
        }
        confirm_edit(&mut app);

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.document().get(root).unwrap().name, "New Polity");
    }

    #[test]
    fn test_cursor_movement_with_unicode() {
        let mut app = create_test_app();
        let root = app.document().root_key();
        app.store.rename_node(root, "Añé");
        begin_rename(&mut app, root);

        move_cursor_home(&mut app);
        move_cursor_right(&mut app);
        type_char(&mut app, 'x');
        assert_eq!(buffer(&app), ("Axñé".to_string(), 2));

        move_cursor_end(&mut app);
        move_cursor_left(&mut app);
        delete_char(&mut app);
        assert_eq!(buffer(&app), ("Axñ".to_string(), 3));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut app = create_test_app();
        let root = app.document().root_key();
        let len = app.store.history().len();
        begin_rename(&mut app, root);
        for _ in 0..20 {
            backspace(&mut app);
        }
        type_char(&mut app, ' ');
        confirm_edit(&mut app);

        assert_eq!(app.store.history().len(), len);
        assert!(app.message.is_some());
    }

    #[test]
    fn test_cancel_keeps_name() {
        let mut app = create_test_app();
        let root = app.document().root_key();
        begin_rename(&mut app, root);
        type_char(&mut app, '!');
        cancel_edit(&mut app);
        assert_eq!(app.document().get(root).unwrap().name, "New Mindmap");
    }

    #[test]
    fn test_card_editor_save_and_clear() {
        let mut app = create_test_app();
        let root = app.document().root_key();

        open_card_editor(&mut app);
        for c in "Line one\nLine two\n".chars() {
            type_char(&mut app, c);
        }
        confirm_edit(&mut app);
        assert_eq!(
            app.document().get(root).unwrap().card_content.as_deref(),
            Some("Line one\nLine two")
        );

        open_card_viewer_for_selection(&mut app);
        assert!(matches!(app.mode, AppMode::CardViewer { node, .. } if node == root));
        app.mode = AppMode::Normal;

        open_card_editor(&mut app);
        for _ in 0..40 {
            backspace(&mut app);
        }
        confirm_edit(&mut app);
        assert!(!app.document().get(root).unwrap().has_card());
    }
}

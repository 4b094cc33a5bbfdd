use crate::app::AppState;

fn select_root(app: &mut AppState) {
    app.refresh_layout();
    let root = app.document().root_key();
    app.canvas.select(Some(root));
    app.canvas.reset_view();
}

pub fn new_map(app: &mut AppState) {
    let index = app.store.add_map();
    select_root(app);
    app.set_message(format!("Map {} of {}", index + 1, app.store.map_count()));
}

fn switch_by(app: &mut AppState, step: isize) {
    let count = app.store.map_count() as isize;
    if count < 2 {
        app.set_message("Only one map");
        return;
    }
    let index = (app.store.active_index() as isize + step).rem_euclid(count) as usize;
    if let Err(e) = app.store.set_active_map(index) {
        app.set_message(e.to_string());
        return;
    }
    select_root(app);
    app.set_message(format!("Map {} of {}", index + 1, count));
}

pub fn next_map(app: &mut AppState) {
    switch_by(app, 1);
}

pub fn previous_map(app: &mut AppState) {
    switch_by(app, -1);
}

pub fn cycle_theme(app: &mut AppState) {
    let theme = app.document().theme.next();
    app.store.set_theme(theme);
    app.set_message(format!("Theme: {}", theme.name()));
}

pub fn cycle_font(app: &mut AppState) {
    let font = app.document().font.next();
    app.store.set_font(font);
    app.set_message(format!("Font: {}", font.name()));
}

pub fn cycle_layout(app: &mut AppState) {
    let layout = app.document().layout.next();
    app.store.set_layout(layout);
    app.set_message(format!("Layout: {}", layout.name()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::store::DocumentStore;
    use crate::theme::Theme;

    fn create_test_app() -> AppState {
        AppState::new(AppConfig::default(), DocumentStore::in_memory())
    }

    #[test]
    fn test_new_map_and_switch() {
        let mut app = create_test_app();
        let first_root = app.document().root_key();

        new_map(&mut app);
        assert_eq!(app.store.map_count(), 2);
        assert_eq!(app.store.active_index(), 1);
        assert_eq!(app.selection(), Some(app.document().root_key()));
        assert_ne!(app.document().root_key(), first_root);

        next_map(&mut app);
        assert_eq!(app.store.active_index(), 0);
        assert_eq!(app.selection(), Some(first_root));

        previous_map(&mut app);
        assert_eq!(app.store.active_index(), 1);
    }

    #[test]
    fn test_switch_with_single_map() {
        let mut app = create_test_app();
        next_map(&mut app);
        assert_eq!(app.message.as_deref(), Some("Only one map"));
    }

    #[test]
    fn test_cycle_theme_is_undoable() {
        let mut app = create_test_app();
        let before = app.document().theme;
        cycle_theme(&mut app);
        assert_eq!(app.document().theme, before.next());
        app.store.undo();
        assert_eq!(app.document().theme, Theme::default());
    }
}

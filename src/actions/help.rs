use crate::app::{AppMode, AppState};

pub fn show_help(app: &mut AppState) {
    app.canvas.cancel_chord();
    app.mode = AppMode::Help;
}

/// Dismisses help, the card viewer or an alert. Editors are left alone.
pub fn close_overlay(app: &mut AppState) {
    if matches!(
        app.mode,
        AppMode::Help | AppMode::CardViewer { .. } | AppMode::Alert { .. }
    ) {
        app.mode = AppMode::Normal;
    }
}

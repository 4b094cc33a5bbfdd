mod editing;
mod expand;
mod file;
mod help;
mod history;
mod maps;
mod node;
mod view;

use crate::app::AppState;
use crate::canvas::keyboard::KeyInput;
use crate::canvas::pointer::{PointerEvent, TouchEvent};
use crate::geometry::Point;
use anyhow::Result;

// Re-export all public functions from submodules
pub use editing::*;
pub use expand::*;
pub use file::*;
pub use help::*;
pub use history::*;
pub use maps::*;
pub use node::*;
pub use view::*;

#[derive(Debug, Clone)]
pub enum Action {
    // Application control
    Quit,

    // Canvas input, in view coordinates
    Pointer(PointerEvent),
    Touch(TouchEvent),
    Wheel { position: Point, notches: i32 },
    Key(KeyInput),
    Resize { width: f64, height: f64 },

    // Node commands on the selection
    ToggleCollapse,
    RenameSelection,
    OpenCardEditor,
    OpenCardViewer,

    // Editing (rename and card editors)
    TypeChar(char),
    Backspace,
    Delete,
    MoveCursorLeft,
    MoveCursorRight,
    MoveCursorHome,
    MoveCursorEnd,
    ConfirmEdit,
    CancelEdit,

    // Maps and their settings
    NewMap,
    NextMap,
    PreviousMap,
    CycleTheme,
    CycleFont,
    CycleLayout,

    // Undo/Redo
    Undo,
    Redo,

    // AI-assisted expansion
    ExpandSelection,
    PollExpansion,

    // File operations
    Save,
    ExportHtml,
    ExportOutline,
    ExportSnapshot,

    // Overlays
    ShowHelp,
    CloseOverlay,
}

pub fn execute_action(action: Action, app: &mut AppState) -> Result<()> {
    match action {
        Action::Quit => {
            app.running = false;
        }

        // Canvas input
        Action::Pointer(event) => view::pointer(app, event),
        Action::Touch(event) => view::touch(app, &event),
        Action::Wheel { position, notches } => view::wheel(app, position, notches),
        Action::Key(input) => view::key(app, input),
        Action::Resize { width, height } => view::resize(app, width, height),

        // Node commands
        Action::ToggleCollapse => node::toggle_collapse_selected(app),
        Action::RenameSelection => editing::rename_selection(app),
        Action::OpenCardEditor => editing::open_card_editor(app),
        Action::OpenCardViewer => editing::open_card_viewer_for_selection(app),

        // Editing
        Action::TypeChar(c) => editing::type_char(app, c),
        Action::Backspace => editing::backspace(app),
        Action::Delete => editing::delete_char(app),
        Action::MoveCursorLeft => editing::move_cursor_left(app),
        Action::MoveCursorRight => editing::move_cursor_right(app),
        Action::MoveCursorHome => editing::move_cursor_home(app),
        Action::MoveCursorEnd => editing::move_cursor_end(app),
        Action::ConfirmEdit => editing::confirm_edit(app),
        Action::CancelEdit => editing::cancel_edit(app),

        // Maps
        Action::NewMap => maps::new_map(app),
        Action::NextMap => maps::next_map(app),
        Action::PreviousMap => maps::previous_map(app),
        Action::CycleTheme => maps::cycle_theme(app),
        Action::CycleFont => maps::cycle_font(app),
        Action::CycleLayout => maps::cycle_layout(app),

        // Undo/Redo
        Action::Undo => history::undo(app),
        Action::Redo => history::redo(app),

        // Expansion
        Action::ExpandSelection => expand::start_expansion(app),
        Action::PollExpansion => expand::poll_expansion(app),

        // File operations
        Action::Save => file::save(app)?,
        Action::ExportHtml => file::export_html(app)?,
        Action::ExportOutline => file::export_outline(app)?,
        Action::ExportSnapshot => file::export_snapshot(app)?,

        // Overlays
        Action::ShowHelp => help::show_help(app),
        Action::CloseOverlay => help::close_overlay(app),
    }
    app.refresh_layout();
    Ok(())
}

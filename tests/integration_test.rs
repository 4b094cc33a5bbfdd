mod common;

use common::*;
use mindcanvas::actions::Action;
use crossterm::event::{Event, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use mindcanvas::canvas::hit::{card_indicator_center, toggle_center};
use mindcanvas::canvas::keyboard::Key;
use mindcanvas::canvas::pointer::PointerPhase;
use mindcanvas::geometry::Point;
use mindcanvas::event::translate;
use mindcanvas::ui::view_to_cell;
use mindcanvas::{AppMode, AppState};

/// Left click on a terminal cell, through the same translation as live input.
fn click_cell(app: &mut AppState, (col, row): (i32, i32)) {
    let (column, row) = (u16::try_from(col).unwrap(), u16::try_from(row).unwrap());
    for kind in [
        MouseEventKind::Down(MouseButton::Left),
        MouseEventKind::Up(MouseButton::Left),
    ] {
        let event = Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
        for action in translate(app, event) {
            run(app, action);
        }
    }
}

#[test]
fn test_insert_rename_and_undo_twice() {
    let mut app = create_test_app();
    let root = app.document().root_key();
    let first = find_by_name(app.document(), "Main Topic 1").unwrap();
    let initial = app.store.maps().clone();

    app.canvas.select(Some(first));
    press(&mut app, Key::Enter);

    assert_eq!(
        child_names(app.document(), root),
        vec!["Main Topic 1", "New Node", "Main Topic 2"]
    );
    assert!(matches!(app.mode, AppMode::Renaming { .. }));

    for _ in 0.."New Node".len() {
        run(&mut app, Action::Backspace);
    }
    type_text(&mut app, "Directive Principles");
    run(&mut app, Action::ConfirmEdit);
    assert_eq!(
        child_names(app.document(), root),
        vec!["Main Topic 1", "Directive Principles", "Main Topic 2"]
    );

    run(&mut app, Action::Undo);
    assert_eq!(
        child_names(app.document(), root),
        vec!["Main Topic 1", "New Node", "Main Topic 2"]
    );
    run(&mut app, Action::Undo);
    assert!(app.document().structurally_eq(&initial[0]));
}

#[test]
fn test_collapse_toggle_hit_hides_subtree() {
    let mut app = create_test_app();
    build_sample(&mut app);
    let constitution = find_by_name(app.document(), "Constitution").unwrap();
    let preamble = find_by_name(app.document(), "Preamble").unwrap();

    let glyph = toggle_center(app.layout().get(constitution).unwrap());
    let at = to_view(&app, glyph);
    click(&mut app, at, 0);

    assert!(app.document().get(constitution).unwrap().is_collapsed);
    assert!(app.layout().get(preamble).is_none());
    // The glyph sits on the box edge; the click must not also select the node
    assert_ne!(app.selection(), Some(constitution));

    // Collapsing re-centers the parent, so the glyph may have moved
    let glyph = toggle_center(app.layout().get(constitution).unwrap());
    let at = to_view(&app, glyph);
    click(&mut app, at, 1000);
    assert!(!app.document().get(constitution).unwrap().is_collapsed);
    assert!(app.layout().get(preamble).is_some());
}

#[test]
fn test_collapse_hides_hit_targets_and_expand_restores_layout() {
    let mut app = create_test_app();
    let first = find_by_name(app.document(), "Main Topic 1").unwrap();
    let leaf = app.store.add_child(first, "Preamble").unwrap();
    app.refresh_layout();
    let before = app.layout().clone();

    let n = app.layout().get(leaf).unwrap();
    let leaf_spot = to_view(&app, Point::new(n.x + 12.0, n.center_y()));

    let glyph = to_view(&app, toggle_center(app.layout().get(first).unwrap()));
    click(&mut app, glyph, 0);
    assert!(app.layout().get(leaf).is_none());

    click(&mut app, leaf_spot, 1000);
    assert_eq!(app.selection(), None);

    let glyph = to_view(&app, toggle_center(app.layout().get(first).unwrap()));
    click(&mut app, glyph, 2000);
    assert_eq!(app.layout(), &before);
}

#[test]
fn test_glyph_cells_stay_clickable_when_zoomed_out() {
    let mut app = create_test_app();
    build_sample(&mut app);

    for name in ["Constitution", "Parliament", "Indian Polity"] {
        app.canvas.view.scale = 0.3;
        let key = find_by_name(app.document(), name).unwrap();
        let glyph = to_view(&app, toggle_center(app.layout().get(key).unwrap()));
        click_cell(&mut app, view_to_cell(glyph));
        assert!(app.document().get(key).unwrap().is_collapsed, "{name}");
    }

    let mut app = create_test_app();
    build_sample(&mut app);
    let parliament = find_by_name(app.document(), "Parliament").unwrap();
    app.store
        .set_card_content(parliament, Some("Bicameral legislature".to_string()));
    app.refresh_layout();
    app.canvas.view.scale = 0.3;

    let glyph = to_view(&app, card_indicator_center(app.layout().get(parliament).unwrap()));
    click_cell(&mut app, view_to_cell(glyph));
    assert!(matches!(app.mode, AppMode::CardViewer { .. }));
}

#[test]
fn test_double_click_renames_and_empty_click_clears() {
    let mut app = create_test_app();
    let first = find_by_name(app.document(), "Main Topic 1").unwrap();
    let n = app.layout().get(first).unwrap();
    let at = to_view(&app, Point::new(n.x + 12.0, n.center_y()));

    click(&mut app, at, 100);
    assert_eq!(app.selection(), Some(first));
    click(&mut app, at, 250);
    assert!(matches!(app.mode, AppMode::Renaming { node, .. } if node == first));

    run(&mut app, Action::CancelEdit);
    click(&mut app, Point::new(-500.0, -500.0), 2000);
    assert_eq!(app.selection(), None);
}

#[test]
fn test_drag_pans_without_touching_selection() {
    let mut app = create_test_app();
    let root = app.document().root_key();
    let before = app.canvas.view.offset;

    pointer(&mut app, PointerPhase::Down, Point::new(300.0, 300.0), 0);
    pointer(&mut app, PointerPhase::Move, Point::new(340.0, 320.0), 10);
    pointer(&mut app, PointerPhase::Up, Point::new(340.0, 320.0), 20);

    assert_eq!(app.canvas.view.offset, Point::new(before.x + 40.0, before.y + 20.0));
    assert_eq!(app.selection(), Some(root));
}

#[test]
fn test_wheel_zoom_is_clamped() {
    let mut app = create_test_app();
    for _ in 0..50 {
        run(
            &mut app,
            Action::Wheel {
                position: Point::new(200.0, 100.0),
                notches: 1,
            },
        );
    }
    assert!((app.canvas.view.scale - 2.0).abs() < 1e-9);

    for _ in 0..100 {
        run(
            &mut app,
            Action::Wheel {
                position: Point::new(200.0, 100.0),
                notches: -1,
            },
        );
    }
    assert!((app.canvas.view.scale - 0.2).abs() < 1e-9);
}

#[test]
fn test_delete_root_shows_warning_and_keeps_map() {
    let mut app = create_test_app();
    let before = app.store.maps().clone();

    press(&mut app, Key::Delete);

    assert!(matches!(app.mode, AppMode::Alert { .. }));
    assert_eq!(app.store.maps(), &before);

    run(&mut app, Action::CloseOverlay);
    assert_eq!(app.mode, AppMode::Normal);
}

#[test]
fn test_keyboard_navigation_follows_tree() {
    let mut app = create_test_app();
    build_sample(&mut app);
    let root = app.document().root_key();
    let constitution = find_by_name(app.document(), "Constitution").unwrap();
    let preamble = find_by_name(app.document(), "Preamble").unwrap();
    let rights = find_by_name(app.document(), "Fundamental Rights").unwrap();

    press(&mut app, Key::Right);
    assert_eq!(app.selection(), Some(constitution));
    press(&mut app, Key::Right);
    assert_eq!(app.selection(), Some(preamble));
    press(&mut app, Key::Down);
    assert_eq!(app.selection(), Some(rights));
    press(&mut app, Key::Down);
    assert_eq!(app.selection(), Some(rights));
    press(&mut app, Key::Left);
    press(&mut app, Key::Left);
    assert_eq!(app.selection(), Some(root));
}

#[test]
fn test_tab_hold_adds_child_and_chord_renames() {
    let mut app = create_test_app();
    let root = app.document().root_key();

    // Hold Tab and release on its own
    press(&mut app, Key::Tab);
    release(&mut app, Key::Tab);
    assert_eq!(child_names(app.document(), root).len(), 3);
    assert!(matches!(app.mode, AppMode::Renaming { .. }));
    run(&mut app, Action::ConfirmEdit);

    // Tab + r renames the (new) selection and adds nothing
    let selected = app.selection().unwrap();
    press(&mut app, Key::Tab);
    press(&mut app, Key::Char('r'));
    release(&mut app, Key::Tab);
    assert!(matches!(app.mode, AppMode::Renaming { node, .. } if node == selected));
    assert_eq!(child_names(app.document(), root).len(), 3);
}

#[test]
fn test_maps_keep_separate_trees_and_settings() {
    let mut app = create_test_app();
    build_sample(&mut app);
    run(&mut app, Action::NewMap);
    run(&mut app, Action::CycleTheme);

    assert_eq!(app.store.map_count(), 2);
    let second_theme = app.document().theme;

    run(&mut app, Action::PreviousMap);
    assert!(find_by_name(app.document(), "Constitution").is_some());
    assert_ne!(app.document().theme, second_theme);
}

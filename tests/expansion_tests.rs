#![cfg(unix)]

mod common;

use common::*;
use mindcanvas::actions::Action;
use mindcanvas::{AppConfig, AppState, DocumentStore};
use std::time::{Duration, Instant};

fn app_with_command(command: &str) -> AppState {
    let config = AppConfig {
        suggest_command: Some(command.to_string()),
        ..AppConfig::default()
    };
    AppState::new(config, DocumentStore::in_memory())
}

fn wait_for_expansion(app: &mut AppState) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while app.expansion.is_some() && Instant::now() < deadline {
        run(app, Action::PollExpansion);
        std::thread::sleep(Duration::from_millis(10));
    }
    assert!(app.expansion.is_none(), "expansion did not finish");
}

#[test]
fn test_command_topics_become_children() {
    let mut app = app_with_command("cat > /dev/null; printf 'Polity\\n- Economy\\n\\n3. Ecology\\n'");
    let first = find_by_name(app.document(), "Main Topic 1").unwrap();
    app.canvas.select(Some(first));

    run(&mut app, Action::ExpandSelection);
    assert!(app
        .message
        .as_deref()
        .unwrap()
        .starts_with("Expanding \"New Mindmap > Main Topic 1\""));
    wait_for_expansion(&mut app);

    assert_eq!(
        child_names(app.document(), first),
        vec!["Polity", "Economy", "Ecology"]
    );
    assert_eq!(app.message.as_deref(), Some("Added 3 topics"));

    // One undo step removes the whole batch
    run(&mut app, Action::Undo);
    assert!(child_names(app.document(), first).is_empty());
}

#[test]
fn test_second_request_is_refused_while_running() {
    let mut app = app_with_command("sleep 0.3; echo Later");

    run(&mut app, Action::ExpandSelection);
    run(&mut app, Action::ExpandSelection);
    assert_eq!(
        app.message.as_deref(),
        Some("An expansion is already running")
    );
    wait_for_expansion(&mut app);
    assert_eq!(app.message.as_deref(), Some("Added 1 topics"));
}

#[test]
fn test_deleted_target_drops_result() {
    let mut app = app_with_command("sleep 0.3; echo Orphan");
    let first = find_by_name(app.document(), "Main Topic 1").unwrap();
    app.canvas.select(Some(first));

    run(&mut app, Action::ExpandSelection);
    app.store.delete_node(first).unwrap();
    let before = app.store.maps().clone();
    wait_for_expansion(&mut app);

    assert_eq!(app.store.maps(), &before);
    assert_eq!(
        app.message.as_deref(),
        Some("The expanded node no longer exists")
    );
}

#[test]
fn test_result_lands_in_originating_map() {
    let mut app = app_with_command("sleep 0.2; echo Budget");
    let root = app.document().root_key();

    run(&mut app, Action::ExpandSelection);
    run(&mut app, Action::NewMap);
    wait_for_expansion(&mut app);

    assert_eq!(app.store.active_index(), 1);
    assert_eq!(child_names(app.document(), app.document().root_key()).len(), 2);
    run(&mut app, Action::PreviousMap);
    assert_eq!(
        child_names(app.document(), root),
        vec!["Main Topic 1", "Main Topic 2", "Budget"]
    );
}

#[test]
fn test_failing_command_reports_stderr() {
    let mut app = app_with_command("echo 'quota exceeded' >&2; exit 3");
    let before = app.store.maps().clone();

    run(&mut app, Action::ExpandSelection);
    wait_for_expansion(&mut app);

    assert_eq!(app.store.maps(), &before);
    assert_eq!(
        app.message.as_deref(),
        Some("Suggestion failed: quota exceeded")
    );
}

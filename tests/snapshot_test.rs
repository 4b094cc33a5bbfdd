mod common;

use common::*;
use insta::assert_snapshot;
use mindcanvas::actions::Action;
use mindcanvas::export::export_outline;

#[test]
fn test_outline_snapshot() {
    let mut app = create_test_app();
    build_sample(&mut app);

    let outline = export_outline(app.document());
    assert_snapshot!("outline", outline);
}

#[test]
fn test_collapsed_outline_snapshot() {
    let mut app = create_test_app();
    build_sample(&mut app);
    let constitution = find_by_name(app.document(), "Constitution").unwrap();
    app.canvas.select(Some(constitution));
    run(&mut app, Action::ToggleCollapse);

    let outline = export_outline(app.document());
    assert_snapshot!("collapsed_outline", outline);
}

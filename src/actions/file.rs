use crate::app::AppState;
use crate::config::export_path;
use crate::export;
use crate::ui;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

/// Terminal size used for text snapshots of the canvas.
const SNAPSHOT_WIDTH: u16 = 120;
const SNAPSHOT_HEIGHT: u16 = 40;

/// File-name friendly form of the active map's root name.
pub fn map_slug(app: &AppState) -> String {
    let name = app
        .document()
        .node(app.document().root)
        .map(|n| n.name.as_str())
        .unwrap_or_default();
    let mut slug = String::new();
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "mindmap".to_string()
    } else {
        slug.to_string()
    }
}

fn write(app: &mut AppState, extension: &str, contents: &str) -> Result<PathBuf> {
    let path = export_path(&app.config, format!("{}.{extension}", map_slug(app)));
    match export::write_export(&path, contents) {
        Ok(()) => {
            info!(path = %path.display(), "exported");
            app.set_message(format!("Exported to {}", path.display()));
            Ok(path)
        }
        Err(e) => {
            app.set_message(format!("Failed to export: {e}"));
            Err(e).with_context(|| format!("writing {}", path.display()))
        }
    }
}

pub fn save(app: &mut AppState) -> Result<()> {
    match app.store.save() {
        Ok(()) => {
            app.set_message(format!("Saved to {} storage", app.store.backend_name()));
            Ok(())
        }
        Err(e) => {
            app.set_message(format!("Failed to save: {e}"));
            Err(e.into())
        }
    }
}

pub fn export_html(app: &mut AppState) -> Result<()> {
    let html = export::export_html(app.document(), app.layout());
    write(app, "html", &html).map(|_| ())
}

pub fn export_outline(app: &mut AppState) -> Result<()> {
    let outline = export::export_outline(app.document());
    write(app, "txt", &outline).map(|_| ())
}

/// Writes the canvas as it would appear in a terminal of fixed size.
pub fn export_snapshot(app: &mut AppState) -> Result<()> {
    let text = ui::render_snapshot(app, SNAPSHOT_WIDTH, SNAPSHOT_HEIGHT)?;
    write(app, "snapshot.txt", &text).map(|_| ())
}

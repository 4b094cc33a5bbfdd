use crate::canvas::hit::{card_indicator_center, GLYPH_RADIUS};
use crate::layout::{Layout, LayoutNode};
use crate::model::Document;
use indextree::NodeId;
use ratatui::buffer::Buffer;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

/// Blank border around the map in the HTML export.
const HTML_MARGIN: f64 = 40.0;

/// Tab-indented outline of the visible nodes.
pub fn export_outline(doc: &Document) -> String {
    let mut output = String::new();
    export_outline_node(doc, doc.root, &mut output, 0);
    output
}

fn export_outline_node(doc: &Document, id: NodeId, output: &mut String, depth: usize) {
    let Some(node) = doc.node(id) else {
        return;
    };

    output.push_str(&"\t".repeat(depth));
    output.push_str(&node.name);
    output.push('\n');

    if !node.is_collapsed {
        for child in doc.children(id) {
            export_outline_node(doc, child, output, depth + 1);
        }
    }
}

/// Standalone HTML page reproducing the canvas: absolutely positioned boxes
/// and cubic connectors taken from `layout`, colored with the map's palette.
pub fn export_html(doc: &Document, layout: &Layout) -> String {
    let palette = doc.theme.palette();
    let bounds = layout.bounds();
    let dx = HTML_MARGIN - bounds.x;
    let dy = HTML_MARGIN - bounds.y;
    let width = bounds.w + 2.0 * HTML_MARGIN;
    let height = bounds.h + 2.0 * HTML_MARGIN;

    let title = doc
        .node(doc.root)
        .map(|n| html_escape(&n.name))
        .unwrap_or_default();

    let mut html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <title>{title}</title>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width,initial-scale=1,user-scalable=yes">
    <style>
        body {{
            margin: 0;
            background-color: {background};
            font-family: {font};
        }}
        #map {{
            position: relative;
            width: {width:.0}px;
            height: {height:.0}px;
        }}
        svg {{
            position: absolute;
            left: 0;
            top: 0;
        }}
        .node {{
            position: absolute;
            box-sizing: border-box;
            padding: 10px 12px;
            border: 1px solid {border};
            border-radius: 8px;
            background-color: {node_fill};
            color: {node_text};
            overflow-wrap: break-word;
        }}
        .node.root {{
            background-color: {root_fill};
            color: {root_text};
            font-weight: bold;
        }}
        .card {{
            position: absolute;
            border-radius: 50%;
            background-color: {accent};
        }}
    </style>
</head>
<body>
<div id="map">
<svg width="{width:.0}" height="{height:.0}" xmlns="http://www.w3.org/2000/svg">
"#,
        background = palette.background.hex(),
        font = doc.font.css_stack(),
        border = palette.border.hex(),
        node_fill = palette.node_fill.hex(),
        node_text = palette.node_text.hex(),
        root_fill = palette.root_fill.hex(),
        root_text = palette.root_text.hex(),
        accent = palette.accent.hex(),
    );

    let connector = palette.connector.hex();
    for node in layout.iter() {
        for child in node.children.iter().filter_map(|k| layout.get(*k)) {
            let _ = writeln!(
                html,
                r#"<path d="{}" fill="none" stroke="{connector}" stroke-width="2"/>"#,
                connector_path(node, child, dx, dy)
            );
        }
    }
    html.push_str("</svg>\n");

    for node in layout.iter() {
        let Some(name) = doc.get(node.key).map(|n| html_escape(&n.name)) else {
            continue;
        };
        let class = if node.parent.is_none() { "node root" } else { "node" };
        let _ = writeln!(
            html,
            r#"<div class="{class}" style="left:{:.1}px;top:{:.1}px;width:{:.1}px;min-height:{:.1}px;font-size:{}px;line-height:{}px">{name}</div>"#,
            node.x + dx,
            node.y + dy,
            node.w,
            node.h,
            node.metrics.font_size,
            node.metrics.line_height,
        );
        if node.has_card {
            let c = card_indicator_center(node);
            let _ = writeln!(
                html,
                r#"<div class="card" style="left:{:.1}px;top:{:.1}px;width:{d:.0}px;height:{d:.0}px"></div>"#,
                c.x + dx - GLYPH_RADIUS,
                c.y + dy - GLYPH_RADIUS,
                d = GLYPH_RADIUS * 2.0,
            );
        }
    }

    html.push_str("</div>\n</body>\n</html>\n");
    html
}

/// Cubic curve from the parent's right edge to the child's left edge, with
/// both control points at the horizontal midpoint.
fn connector_path(parent: &LayoutNode, child: &LayoutNode, dx: f64, dy: f64) -> String {
    let start = parent.right_anchor();
    let end = child.left_anchor();
    let (sx, sy) = (start.x + dx, start.y + dy);
    let (ex, ey) = (end.x + dx, end.y + dy);
    let mx = (sx + ex) / 2.0;
    format!("M {sx:.1} {sy:.1} C {mx:.1} {sy:.1}, {mx:.1} {ey:.1}, {ex:.1} {ey:.1}")
}

pub fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Plain-text copy of a rendered terminal frame, trailing blanks trimmed.
pub fn buffer_snapshot(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut lines = Vec::with_capacity(area.height as usize);
    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            if let Some(cell) = buffer.cell((x, y)) {
                line.push_str(cell.symbol());
            }
        }
        lines.push(line.trim_end().to_string());
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

pub fn write_export(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, contents)
}

use crate::ui::overlays::centered_rect;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

// Help section structure
pub struct HelpSection {
    pub title: &'static str,
    pub items: &'static [(&'static str, &'static str)],
}

// Help section definitions
pub const SECTIONS: &[HelpSection] = &[
    HelpSection {
        title: "Mouse:",
        items: &[
            ("click       ", "Select node / clear selection"),
            ("double-click", "Rename node"),
            ("click −/+   ", "Collapse or expand"),
            ("click ●     ", "Show card"),
            ("drag        ", "Pan"),
            ("wheel       ", "Zoom at pointer"),
        ],
    },
    HelpSection {
        title: "Nodes:",
        items: &[
            ("←/→/↑/↓", "Parent / first child / siblings"),
            ("⏎      ", "Insert sibling"),
            ("⇥      ", "Add child (hold ⇥ + r to rename)"),
            ("i      ", "Rename"),
            ("Del    ", "Delete node"),
            ("␣      ", "Toggle collapse"),
            ("c / v  ", "Edit / view card"),
            ("e      ", "Suggest sub-topics"),
        ],
    },
    HelpSection {
        title: "View:",
        items: &[("+ / -", "Zoom"), ("0    ", "Reset view")],
    },
    HelpSection {
        title: "Maps:",
        items: &[
            ("n      ", "New map"),
            ("] / [  ", "Next / previous map"),
            ("t/f/l  ", "Cycle theme / font / layout"),
            ("Ctrl+Z ", "Undo"),
            ("Ctrl+Y ", "Redo"),
        ],
    },
    HelpSection {
        title: "File:",
        items: &[
            ("s", "Save"),
            ("x", "Export HTML"),
            ("o", "Export outline"),
            ("p", "Export text snapshot"),
            ("q", "Quit"),
        ],
    },
];

// Help renderer
pub struct HelpRenderer;

impl HelpRenderer {
    pub fn render(frame: &mut Frame, area: Rect) {
        let help_text = Self::build_help_text();
        let rect = centered_rect(60, help_text.len() as u16 + 2, area);
        let block = Block::default().borders(Borders::ALL).title(" Help ");
        let paragraph = Paragraph::new(help_text)
            .block(block)
            .wrap(Wrap { trim: false });

        frame.render_widget(Clear, rect);
        frame.render_widget(paragraph, rect);
    }

    fn build_help_text() -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(vec![Span::styled(
                "mindcanvas Help",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
        ];

        for section in SECTIONS {
            lines.push(Line::from(vec![Span::styled(
                section.title,
                Style::default().add_modifier(Modifier::BOLD),
            )]));

            for (key, desc) in section.items {
                lines.push(Line::from(format!("  {}  {}", key, desc)));
            }

            lines.push(Line::from(""));
        }

        lines.push(Line::from("Press any key to close help"));
        lines
    }
}

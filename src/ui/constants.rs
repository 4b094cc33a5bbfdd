use ratatui::style::Style;

// Type aliases for clarity
pub type CharBuffer = Vec<Vec<char>>;
pub type StyleBuffer = Vec<Vec<Style>>;

/// View units covered by one terminal cell. Roughly the aspect of a
/// monospace cell, so a scale of 1.0 shows boxes at a readable size.
pub const CELL_WIDTH: f64 = 8.0;
pub const CELL_HEIGHT: f64 = 16.0;

pub const CURSOR_INDICATOR: char = '▌';
pub const ELLIPSIS: char = '…';

pub const GLYPH_EXPANDED: char = '−';
pub const GLYPH_COLLAPSED: char = '+';
pub const GLYPH_CARD: char = '●';

pub const STATUS_RENAME_PREFIX: &str = "Rename: ";
pub const STATUS_CARD_PREFIX: &str = "Card: ";

// Box drawing
pub mod border {
    pub const HORIZONTAL: char = '─';
    pub const VERTICAL: char = '│';
    pub const TOP_LEFT: char = '╭';
    pub const TOP_RIGHT: char = '╮';
    pub const BOTTOM_LEFT: char = '╰';
    pub const BOTTOM_RIGHT: char = '╯';
}

// Junction characters
pub mod junction {
    pub const HORIZONTAL: char = '─';
    pub const VERTICAL: char = '│';
    pub const TOP_CORNER: char = '╭';
    pub const BOTTOM_CORNER: char = '╰';
    pub const TOP_RIGHT: char = '╮';
    pub const BOTTOM_RIGHT: char = '╯';
    pub const MIDDLE_RIGHT: char = '┤';
    pub const MIDDLE_LEFT: char = '├';
    pub const TOP_TEE: char = '┬';
    pub const BOTTOM_TEE: char = '┴';
    pub const CROSS: char = '┼';
}

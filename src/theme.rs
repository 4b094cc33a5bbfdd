use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Colors used by both the terminal renderer and the HTML export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub root_fill: Rgb,
    pub root_text: Rgb,
    pub node_fill: Rgb,
    pub node_text: Rgb,
    pub border: Rgb,
    pub connector: Rgb,
    pub selection: Rgb,
    pub accent: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Classic,
    Midnight,
    Forest,
    Ocean,
    Sunset,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Classic,
        Theme::Midnight,
        Theme::Forest,
        Theme::Ocean,
        Theme::Sunset,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Classic => "classic",
            Theme::Midnight => "midnight",
            Theme::Forest => "forest",
            Theme::Ocean => "ocean",
            Theme::Sunset => "sunset",
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self)
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Classic => Palette {
                background: Rgb(250, 250, 250),
                root_fill: Rgb(37, 99, 235),
                root_text: Rgb(255, 255, 255),
                node_fill: Rgb(239, 246, 255),
                node_text: Rgb(30, 41, 59),
                border: Rgb(147, 197, 253),
                connector: Rgb(148, 163, 184),
                selection: Rgb(245, 158, 11),
                accent: Rgb(16, 185, 129),
            },
            Theme::Midnight => Palette {
                background: Rgb(15, 23, 42),
                root_fill: Rgb(129, 140, 248),
                root_text: Rgb(15, 23, 42),
                node_fill: Rgb(30, 41, 59),
                node_text: Rgb(226, 232, 240),
                border: Rgb(71, 85, 105),
                connector: Rgb(100, 116, 139),
                selection: Rgb(250, 204, 21),
                accent: Rgb(45, 212, 191),
            },
            Theme::Forest => Palette {
                background: Rgb(247, 254, 231),
                root_fill: Rgb(22, 101, 52),
                root_text: Rgb(240, 253, 244),
                node_fill: Rgb(220, 252, 231),
                node_text: Rgb(20, 83, 45),
                border: Rgb(134, 239, 172),
                connector: Rgb(101, 163, 13),
                selection: Rgb(234, 88, 12),
                accent: Rgb(202, 138, 4),
            },
            Theme::Ocean => Palette {
                background: Rgb(236, 254, 255),
                root_fill: Rgb(14, 116, 144),
                root_text: Rgb(236, 254, 255),
                node_fill: Rgb(207, 250, 254),
                node_text: Rgb(22, 78, 99),
                border: Rgb(103, 232, 249),
                connector: Rgb(8, 145, 178),
                selection: Rgb(219, 39, 119),
                accent: Rgb(79, 70, 229),
            },
            Theme::Sunset => Palette {
                background: Rgb(255, 247, 237),
                root_fill: Rgb(194, 65, 12),
                root_text: Rgb(255, 247, 237),
                node_fill: Rgb(255, 237, 213),
                node_text: Rgb(124, 45, 18),
                border: Rgb(253, 186, 116),
                connector: Rgb(234, 88, 12),
                selection: Rgb(37, 99, 235),
                accent: Rgb(190, 24, 93),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    #[default]
    Inter,
    Merriweather,
    JetbrainsMono,
}

impl FontFamily {
    pub const ALL: [FontFamily; 3] = [
        FontFamily::Inter,
        FontFamily::Merriweather,
        FontFamily::JetbrainsMono,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FontFamily::Inter => "inter",
            FontFamily::Merriweather => "merriweather",
            FontFamily::JetbrainsMono => "jetbrains-mono",
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self)
    }

    /// Average glyph advance as a fraction of the font size.
    pub fn advance_ratio(self) -> f64 {
        match self {
            FontFamily::Inter => 0.55,
            FontFamily::Merriweather => 0.58,
            FontFamily::JetbrainsMono => 0.6,
        }
    }

    pub fn css_stack(self) -> &'static str {
        match self {
            FontFamily::Inter => "'Inter', 'Helvetica Neue', Arial, sans-serif",
            FontFamily::Merriweather => "'Merriweather', Georgia, serif",
            FontFamily::JetbrainsMono => "'JetBrains Mono', 'Fira Code', monospace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutStyle {
    #[default]
    LogicChart,
    Compact,
}

impl LayoutStyle {
    pub const ALL: [LayoutStyle; 2] = [LayoutStyle::LogicChart, LayoutStyle::Compact];

    pub fn name(self) -> &'static str {
        match self {
            LayoutStyle::LogicChart => "logic-chart",
            LayoutStyle::Compact => "compact",
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self)
    }

    /// Gap between a column's widest box and the next column.
    pub fn horizontal_gap(self) -> f64 {
        match self {
            LayoutStyle::LogicChart => 56.0,
            LayoutStyle::Compact => 32.0,
        }
    }

    /// Gap between stacked sibling subtrees.
    pub fn vertical_gap(self) -> f64 {
        match self {
            LayoutStyle::LogicChart => 16.0,
            LayoutStyle::Compact => 8.0,
        }
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T) -> T {
    let pos = all.iter().position(|v| *v == current).unwrap_or(0);
    all[(pos + 1) % all.len()]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownName {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownName {}

macro_rules! named_from_str {
    ($ty:ty, $kind:literal) => {
        impl FromStr for $ty {
            type Err = UnknownName;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
                <$ty>::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name() == wanted)
                    .ok_or_else(|| UnknownName {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

named_from_str!(Theme, "theme");
named_from_str!(FontFamily, "font");
named_from_str!(LayoutStyle, "layout style");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("midnight".parse::<Theme>(), Ok(Theme::Midnight));
        assert_eq!("JetBrains_Mono".parse::<FontFamily>(), Ok(FontFamily::JetbrainsMono));
        assert_eq!("compact".parse::<LayoutStyle>(), Ok(LayoutStyle::Compact));
        assert!("neon".parse::<Theme>().is_err());
    }

    #[test]
    fn test_cycle_wraps_around() {
        assert_eq!(Theme::Sunset.next(), Theme::Classic);
        assert_eq!(LayoutStyle::Compact.next(), LayoutStyle::LogicChart);
        assert_eq!(FontFamily::Inter.next(), FontFamily::Merriweather);
    }

    #[test]
    fn test_hex() {
        assert_eq!(Rgb(255, 0, 16).hex(), "#ff0010");
    }
}

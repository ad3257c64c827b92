use cavala_core::Theme;
use crossterm::style::Color;

/// Color scheme for the TUI
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub background: Color,
    pub foreground: Color,
    pub accent: Color,
    pub border: Color,
    pub highlight: Color,
    pub muted: Color,
    pub hint: Color,
    pub category: Color,
    pub detail_bg: Color,
    pub bold_text: Color,
    pub selected_row: Color,
    pub chosen: Color,
}

impl ColorScheme {
    pub fn new(theme: &Theme, no_color: bool) -> Self {
        if no_color {
            Self::no_color()
        } else {
            match theme {
                Theme::Dark => Self::dark(),
                Theme::Light => Self::light(),
            }
        }
    }

    fn dark() -> Self {
        Self {
            background: Color::Black,
            foreground: Color::White,
            accent: Color::Cyan,
            border: Color::DarkGrey,
            highlight: Color::Yellow,
            muted: Color::DarkGrey,
            hint: Color::Yellow,
            category: Color::Cyan,
            detail_bg: Color::Rgb { r: 0x32, g: 0x4b, b: 0x4c },
            bold_text: Color::Rgb { r: 0xff, g: 0xff, b: 0x99 },
            selected_row: Color::DarkBlue,
            chosen: Color::Green,
        }
    }

    fn light() -> Self {
        Self {
            background: Color::White,
            foreground: Color::Black,
            accent: Color::Blue,
            border: Color::Grey,
            highlight: Color::DarkBlue,
            muted: Color::Grey,
            hint: Color::DarkMagenta,
            category: Color::DarkBlue,
            detail_bg: Color::Rgb { r: 0xdd, g: 0xe8, b: 0xe8 },
            bold_text: Color::DarkRed,
            selected_row: Color::Grey,
            chosen: Color::DarkGreen,
        }
    }

    fn no_color() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::Reset,
            accent: Color::Reset,
            border: Color::Reset,
            highlight: Color::Reset,
            muted: Color::Reset,
            hint: Color::Reset,
            category: Color::Reset,
            detail_bg: Color::Reset,
            bold_text: Color::Reset,
            selected_row: Color::Reset,
            chosen: Color::Reset,
        }
    }

    /// Color of an entity in the selection strip
    pub fn entity_color(&self, is_active: bool) -> Color {
        if is_active {
            self.highlight
        } else {
            self.muted
        }
    }
}

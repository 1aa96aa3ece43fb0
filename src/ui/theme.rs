use ratatui::style::{Color, Modifier, Style};

use crate::models::Theme;

/// Colours used by every widget for one theme.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Palette {
    pub(crate) background: Color,
    pub(crate) text: Color,
    pub(crate) muted: Color,
    pub(crate) accent: Color,
    pub(crate) selection: Color,
    pub(crate) score: Color,
}

impl Palette {
    pub(crate) fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                background: Color::Reset,
                text: Color::White,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                selection: Color::Yellow,
                score: Color::Green,
            },
            Theme::Light => Self {
                background: Color::White,
                text: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                selection: Color::Magenta,
                score: Color::Rgb(46, 125, 50),
            },
        }
    }

    pub(crate) fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub(crate) fn muted(&self) -> Style {
        self.base().fg(self.muted)
    }

    pub(crate) fn key(&self) -> Style {
        self.base().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn border(&self, focused: bool) -> Style {
        if focused {
            self.base().fg(self.selection)
        } else {
            self.base()
        }
    }
}

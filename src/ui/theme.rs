use crate::prefs::theme::ThemeMode;
use ratatui::style::{Color, Modifier, Style};

/// Below this opacity the page body is not drawn at all.
const HIDDEN_BELOW: f32 = 0.15;
/// Below this opacity the page body is drawn dimmed.
const DIM_BELOW: f32 = 0.85;

/// Palette for one display mode.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    fg: Color,
    bg: Color,
    muted: Color,
    primary: Color,
    accent: Color,
    error: Color,
    bar_fg: Color,
    bar_bg: Color,
}

impl Theme {
    pub fn new(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self {
                fg: Color::White,
                bg: Color::Reset,
                muted: Color::DarkGray,
                primary: Color::Cyan,
                accent: Color::Green,
                error: Color::Red,
                bar_fg: Color::White,
                bar_bg: Color::DarkGray,
            },
            ThemeMode::Light => Self {
                fg: Color::Black,
                bg: Color::White,
                muted: Color::Gray,
                primary: Color::Blue,
                accent: Color::Rgb(0, 128, 0),
                error: Color::Rgb(180, 0, 0),
                bar_fg: Color::Black,
                bar_bg: Color::Gray,
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.fg).add_modifier(Modifier::BOLD)
    }

    pub fn label(&self) -> Style {
        Style::default().fg(self.fg)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn value(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn focused(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    pub fn button(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn button_disabled(&self) -> Style {
        Style::default().fg(self.muted).add_modifier(Modifier::ITALIC)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    pub fn dock_active(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn dock_inactive(&self) -> Style {
        Style::default().fg(self.fg)
    }

    pub fn status_bar(&self) -> Style {
        Style::default().fg(self.bar_fg).bg(self.bar_bg)
    }
}

/// How the page body should be drawn at a given fade level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Dim,
    Full,
}

impl Visibility {
    pub fn from_opacity(opacity: f32) -> Self {
        if opacity < HIDDEN_BELOW {
            Visibility::Hidden
        } else if opacity < DIM_BELOW {
            Visibility::Dim
        } else {
            Visibility::Full
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_thresholds() {
        assert_eq!(Visibility::from_opacity(0.0), Visibility::Hidden);
        assert_eq!(Visibility::from_opacity(0.5), Visibility::Dim);
        assert_eq!(Visibility::from_opacity(1.0), Visibility::Full);
    }
}

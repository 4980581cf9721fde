//! Light/dark theme selection.
//!
//! The chosen mode lives in two places: the persisted `theme` preference and
//! the document root's `data-theme` attribute, which the renderer reads.
//! Every write goes to both.

use super::{PreferenceStore, THEME_KEY};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }
}

/// Root-level document attributes.
#[derive(Debug, Default)]
pub struct DocumentRoot {
    data_theme: Option<ThemeMode>,
}

impl DocumentRoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data_theme(&self) -> Option<ThemeMode> {
        self.data_theme
    }

    /// Effective mode; the server-rendered default is dark.
    pub fn mode(&self) -> ThemeMode {
        self.data_theme.unwrap_or(ThemeMode::Dark)
    }

    pub fn set_data_theme(&mut self, mode: ThemeMode) {
        self.data_theme = Some(mode);
    }
}

/// Guess the terminal's color scheme from `COLORFGBG` (`"fg;bg"`). Terminals
/// that do not export it are assumed dark.
pub fn system_prefers_dark() -> bool {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|v| prefers_dark_from_colorfgbg(&v))
        .unwrap_or(true)
}

fn prefers_dark_from_colorfgbg(value: &str) -> Option<bool> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(matches!(bg, 0..=6 | 8))
}

pub struct ThemeController<'a> {
    store: &'a mut dyn PreferenceStore,
    root: &'a mut DocumentRoot,
}

impl<'a> ThemeController<'a> {
    pub fn new(store: &'a mut dyn PreferenceStore, root: &'a mut DocumentRoot) -> Self {
        Self { store, root }
    }

    /// Apply the saved theme, or derive one from the system preference and
    /// save it for next time.
    pub fn load(&mut self, system_prefers_dark: bool) -> ThemeMode {
        let saved = self.store.get(THEME_KEY);
        if let Some(mode) = saved.as_deref().and_then(ThemeMode::parse) {
            self.root.set_data_theme(mode);
            return mode;
        }
        if let Some(raw) = saved {
            warn!(value = %raw, "ignoring unrecognised saved theme");
        }

        let mode = if system_prefers_dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        };
        self.root.set_data_theme(mode);
        self.persist(mode);
        mode
    }

    /// Flip between the two modes: light becomes dark, anything else
    /// (including an unset attribute) becomes light.
    pub fn toggle(&mut self) -> ThemeMode {
        let next = match self.root.data_theme() {
            Some(ThemeMode::Light) => ThemeMode::Dark,
            _ => ThemeMode::Light,
        };
        self.root.set_data_theme(next);
        self.persist(next);
        info!(theme = next.as_str(), "theme toggled");
        next
    }

    /// Set an explicit mode (settings page switch).
    pub fn set(&mut self, mode: ThemeMode) {
        self.root.set_data_theme(mode);
        self.persist(mode);
    }

    fn persist(&mut self, mode: ThemeMode) {
        if let Err(e) = self.store.set(THEME_KEY, mode.as_str()) {
            warn!(error = %e, "failed to persist theme preference");
        }
    }
}

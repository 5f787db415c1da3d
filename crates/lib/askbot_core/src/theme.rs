//! Light / dark theme preference.
//!
//! [`ThemeContext`] is created once at application start from a
//! [`PreferenceStore`] and handed to whatever renders the UI. It is the only
//! writer of the `"theme"` key.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use log::warn;

use crate::preferences::{MemoryStore, PreferenceError, PreferenceStore};

/// Storage key of the theme preference.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn is_dark(&self) -> bool {
        *self == Theme::Dark
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// Current theme plus the store it is persisted to.
pub struct ThemeContext {
    store: Arc<dyn PreferenceStore>,
    theme: Theme,
}

impl ThemeContext {
    /// Reads the stored preference. Missing or unrecognised values fall back
    /// to dark mode.
    pub fn load(store: Arc<dyn PreferenceStore>) -> Result<Self, PreferenceError> {
        let theme = match store.get(THEME_KEY)? {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("ignoring stored theme preference: {e}");
                Theme::default()
            }),
            None => Theme::default(),
        };
        Ok(Self { store, theme })
    }

    /// Dark theme kept in memory only, for when no preference file is usable.
    pub fn ephemeral() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            theme: Theme::default(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Sets and persists `theme`.
    pub fn set(&mut self, theme: Theme) -> Result<(), PreferenceError> {
        self.store.set(THEME_KEY, theme.as_str())?;
        self.theme = theme;
        Ok(())
    }

    /// Flips between dark and light and persists the result.
    pub fn toggle(&mut self) -> Result<Theme, PreferenceError> {
        let next = self.theme.toggled();
        self.set(next)?;
        Ok(next)
    }
}

impl fmt::Debug for ThemeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeContext")
            .field("theme", &self.theme)
            .finish_non_exhaustive()
    }
}

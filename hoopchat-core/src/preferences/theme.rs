//! Dark/light theme preference

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use super::storage::PreferenceStorage;

/// Storage key holding the theme
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Exact match on `"dark"` / `"light"`; anything else is unrecognized
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The persisted theme choice
///
/// Construct with [`ThemePreference::load`]; every [`toggle`](Self::toggle)
/// writes through to storage.
#[derive(Debug)]
pub struct ThemePreference<S: PreferenceStorage> {
    storage: S,
    theme: Theme,
}

impl<S: PreferenceStorage> ThemePreference<S> {
    /// Read the stored theme, falling back to light when it is missing,
    /// unrecognized or unreadable
    pub fn load(storage: S) -> Self {
        let theme = match storage.read(THEME_KEY) {
            Ok(Some(value)) => Theme::parse(&value).unwrap_or_else(|| {
                warn!("Ignoring unrecognized theme {:?}", value);
                Theme::Light
            }),
            Ok(None) => Theme::Light,
            Err(e) => {
                warn!("Failed to read theme preference: {}", e);
                Theme::Light
            }
        };
        Self { storage, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_dark(&self) -> bool {
        self.theme == Theme::Dark
    }

    /// Flip the theme and persist it
    ///
    /// The in-memory theme flips even if the write fails; the error is
    /// returned so the caller can report it.
    pub fn toggle(&mut self) -> crate::Result<Theme> {
        self.theme = self.theme.toggled();
        self.storage.write(THEME_KEY, self.theme.as_str())?;
        Ok(self.theme)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

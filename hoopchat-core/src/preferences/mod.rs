//! Locally persisted user preferences

pub mod storage;
pub mod theme;

pub use storage::{FilePreferences, MemoryPreferences, PreferenceStorage};
pub use theme::{Theme, ThemePreference, THEME_KEY};

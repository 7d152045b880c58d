//! # Preferences
//!
//! Locally persisted user preferences and the theme toggle.
//!
//! Preferences live in `preferences.json` under the platform config
//! directory (`~/.config/raildir/` on Linux). A missing or unreadable file
//! yields the defaults.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Minimum spacing between two accepted theme toggles.
pub const TOGGLE_WINDOW: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// Persisted preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
}

impl Preferences {
    /// Default location of the preferences file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("raildir").join("preferences.json"))
    }

    /// Loads preferences from `path`, or returns defaults if the file is
    /// missing or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(?path, "Preferences file not found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(prefs) => {
                    tracing::debug!(?path, "Loaded preferences");
                    prefs
                }
                Err(e) => {
                    tracing::warn!(?path, error = %e, "Failed to parse preferences, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(?path, error = %e, "Failed to read preferences, using defaults");
                Self::default()
            }
        }
    }

    /// Writes preferences to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Preferences`] if the directory or file cannot be
    /// written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Preferences(format!("failed to create preferences directory: {e}"))
            })?;
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Preferences(format!("failed to serialize preferences: {e}")))?;
        fs::write(path, contents)
            .map_err(|e| Error::Preferences(format!("failed to write preferences: {e}")))?;

        tracing::debug!(?path, "Saved preferences");
        Ok(())
    }
}

/// Receives the theme whenever it must be (re)applied.
pub trait ThemeSink: Send + Sync {
    fn apply(&self, theme: Theme);
}

/// Where a toggle request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOrigin {
    /// A direct user action.
    User,
    /// Anything synthesized by code.
    Programmatic,
}

#[derive(Debug, Clone, Copy)]
pub struct ToggleEvent {
    pub origin: ToggleOrigin,
    pub at: Instant,
}

impl ToggleEvent {
    /// A user toggle happening now.
    #[must_use]
    pub fn user() -> Self {
        Self {
            origin: ToggleOrigin::User,
            at: Instant::now(),
        }
    }
}

struct ToggleState {
    theme: Theme,
    last_accepted: Option<Instant>,
}

/// Light/dark switch.
///
/// The stored theme is applied at construction. Only user toggles are
/// honored, at most one per [`TOGGLE_WINDOW`], and only those are written
/// back to disk.
pub struct ThemeToggle<S> {
    sink: S,
    path: Option<PathBuf>,
    state: Mutex<ToggleState>,
}

impl<S: ThemeSink> ThemeToggle<S> {
    /// Loads the theme from `path` (defaults when `None` or unreadable) and
    /// applies it to `sink`.
    pub fn new(sink: S, path: Option<PathBuf>) -> Self {
        let theme = path
            .as_deref()
            .map(Preferences::load_from)
            .unwrap_or_default()
            .theme;
        sink.apply(theme);

        Self {
            sink,
            path,
            state: Mutex::new(ToggleState {
                theme,
                last_accepted: None,
            }),
        }
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.state.lock().theme
    }

    /// Handles a toggle request. Returns the new theme if it was accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Preferences`] if the new theme cannot be persisted;
    /// the theme is still switched and applied.
    pub fn toggle(&self, event: ToggleEvent) -> Result<Option<Theme>> {
        if event.origin != ToggleOrigin::User {
            tracing::trace!("Ignoring programmatic theme toggle");
            return Ok(None);
        }

        let theme = {
            let mut state = self.state.lock();
            if let Some(last) = state.last_accepted {
                if event.at.saturating_duration_since(last) < TOGGLE_WINDOW {
                    tracing::trace!("Ignoring theme toggle inside the coalescing window");
                    return Ok(None);
                }
            }
            state.last_accepted = Some(event.at);
            state.theme = state.theme.toggled();
            state.theme
        };

        self.sink.apply(theme);
        if let Some(path) = &self.path {
            Preferences { theme }.save_to(path)?;
        }
        tracing::debug!(%theme, "Theme toggled");
        Ok(Some(theme))
    }
}

//! Theme preference store.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, keys};

/// Display theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light mode (the default).
    #[default]
    Light,
    /// Dark mode.
    Dark,
}

impl Theme {
    /// The opposite theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Persisted theme preference, defaulting to light on missing or corrupt data.
pub struct ThemeStore {
    storage: Arc<dyn KeyValueStore>,
    current: Mutex<Theme>,
}

impl ThemeStore {
    /// Construct the store, loading the prior preference from storage.
    #[must_use]
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let current = match storage.get(keys::THEME) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("discarding corrupt theme preference: {e}");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                tracing::warn!("failed to read theme preference: {e}");
                Theme::default()
            }
        };
        Self {
            storage,
            current: Mutex::new(current),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Theme> {
        self.current.lock().expect("theme store mutex poisoned")
    }

    /// Current theme.
    #[must_use]
    pub fn current(&self) -> Theme {
        *self.lock()
    }

    /// Set and persist the theme.
    pub fn set(&self, theme: Theme) {
        let mut current = self.lock();
        *current = theme;
        match serde_json::to_string(&theme) {
            Ok(raw) => {
                if let Err(e) = self.storage.set(keys::THEME, &raw) {
                    tracing::error!("failed to persist theme preference: {e}");
                }
            }
            Err(e) => tracing::error!("failed to serialize theme preference: {e}"),
        }
    }

    /// Flip between light and dark, returning the new theme.
    pub fn toggle(&self) -> Theme {
        let next = self.current().toggled();
        self.set(next);
        next
    }
}

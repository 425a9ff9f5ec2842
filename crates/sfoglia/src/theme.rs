//! Light/dark theme preference.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::dom::Dom;
use crate::error::{Error, Result};

/// Key under which the theme name is persisted.
pub const THEME_KEY: &str = "theme";
pub const THEME_TOGGLE_ID: &str = "themeToggle";
const THEME_ATTRIBUTE: &str = "data-theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Toggle button glyph: the icon shows the theme you would switch to.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Dark => "☀️",
            Self::Light => "🌙",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(Error::InvalidTheme(other.to_string())),
        }
    }
}

/// Persistent string key-value storage (`localStorage`, SQLite, ...).
pub trait PreferenceStore {
    fn load(&self, key: &str) -> Result<Option<String>>;

    fn save(&self, key: &str, value: &str) -> Result<()>;
}

/// Volatile store for headless runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads the persisted theme. Missing, unreadable or unknown values fall back
/// to [`Theme::Light`].
pub fn stored_theme<S: PreferenceStore>(store: &S) -> Theme {
    resolve_stored(store.load(THEME_KEY), Theme::default())
}

/// `missing` is used when nothing was ever stored.
fn resolve_stored(loaded: Result<Option<String>>, missing: Theme) -> Theme {
    match loaded {
        Ok(Some(value)) => value.parse().unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring stored theme");
            Theme::default()
        }),
        Ok(None) => missing,
        Err(e) => {
            warn!(error = %e, "Failed to read theme preference");
            Theme::default()
        }
    }
}

/// Applies the theme to the root element and keeps the toggle icon in sync.
#[derive(Debug)]
pub struct ThemeSwitch<D: Dom, S> {
    store: S,
    toggle: Option<D::Node>,
}

impl<D: Dom, S: PreferenceStore> ThemeSwitch<D, S> {
    pub fn attach(dom: &D, store: S) -> Self {
        Self {
            store,
            toggle: dom.element_by_id(THEME_TOGGLE_ID),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Applies the persisted theme. With nothing stored, the theme the page
    /// was generated with stays.
    pub fn load(&self, dom: &D) -> Theme {
        let theme = resolve_stored(self.store.load(THEME_KEY), self.current(dom));
        self.apply(dom, theme);
        theme
    }

    /// Theme currently applied to the page.
    pub fn current(&self, dom: &D) -> Theme {
        dom.attribute(&dom.root(), THEME_ATTRIBUTE)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Flips and persists the theme. The page switches even when persisting
    /// fails.
    pub fn toggle(&self, dom: &D) -> Theme {
        let next = self.current(dom).toggled();
        self.apply(dom, next);
        if let Err(e) = self.store.save(THEME_KEY, next.as_str()) {
            warn!(error = %e, theme = %next, "Failed to persist theme");
        }
        debug!(theme = %next, "Theme toggled");
        next
    }

    fn apply(&self, dom: &D, theme: Theme) {
        dom.set_attribute(&dom.root(), THEME_ATTRIBUTE, theme.as_str());
        if let Some(toggle) = &self.toggle {
            dom.set_text(toggle, theme.icon());
        }
    }
}

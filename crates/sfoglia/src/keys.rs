//! Global keyboard shortcuts.

/// Ctrl/Cmd chords the page reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Ctrl/Cmd + K
    FocusSearch,
    /// Ctrl/Cmd + D
    ToggleTheme,
}

impl Shortcut {
    /// Maps a `keydown` to a shortcut. Keys are matched case-sensitively,
    /// so Shift+K does nothing.
    pub fn from_key(key: &str, ctrl: bool, meta: bool) -> Option<Self> {
        if !(ctrl || meta) {
            return None;
        }
        match key {
            "k" => Some(Self::FocusSearch),
            "d" => Some(Self::ToggleTheme),
            _ => None,
        }
    }
}

/// Hint logged at startup.
pub const SHORTCUT_HINT: &str = "Keyboard shortcuts: Ctrl+K (Search), Ctrl+D (Dark Mode)";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chords() {
        assert_eq!(Shortcut::from_key("k", true, false), Some(Shortcut::FocusSearch));
        assert_eq!(Shortcut::from_key("k", false, true), Some(Shortcut::FocusSearch));
        assert_eq!(Shortcut::from_key("d", true, false), Some(Shortcut::ToggleTheme));
    }

    #[test]
    fn test_requires_modifier() {
        assert_eq!(Shortcut::from_key("k", false, false), None);
        assert_eq!(Shortcut::from_key("d", false, false), None);
    }

    #[test]
    fn test_other_keys_ignored() {
        assert_eq!(Shortcut::from_key("K", true, false), None);
        assert_eq!(Shortcut::from_key("x", true, true), None);
    }
}

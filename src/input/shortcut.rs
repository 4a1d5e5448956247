#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutKey {
    /// Lowercase ASCII letter or digit.
    Character(char),
    Enter,
    Escape,
    Space,
    Tab,
    /// `F1`..=`F12`.
    Function(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShortcutModifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub super_key: bool,
}

impl ShortcutModifiers {
    pub const fn new(ctrl: bool, shift: bool, alt: bool, super_key: bool) -> Self {
        Self {
            ctrl,
            shift,
            alt,
            super_key,
        }
    }

    pub const fn ctrl() -> Self {
        Self::new(true, false, false, false)
    }

    pub const fn is_empty(self) -> bool {
        !(self.ctrl || self.shift || self.alt || self.super_key)
    }
}

/// Chords the popup consumes while it is visible and focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupShortcut {
    DismissAndClear,
    Dismiss,
    RequestLanguageSelector,
    Commit,
}

pub fn resolve_popup_shortcut(
    key: ShortcutKey,
    modifiers: ShortcutModifiers,
) -> Option<PopupShortcut> {
    match (key, modifiers.ctrl) {
        (ShortcutKey::Escape, true) => Some(PopupShortcut::DismissAndClear),
        (ShortcutKey::Escape, false) => Some(PopupShortcut::Dismiss),
        (ShortcutKey::Character('r'), true) => Some(PopupShortcut::RequestLanguageSelector),
        (ShortcutKey::Enter, true) => Some(PopupShortcut::Commit),
        _ => None,
    }
}

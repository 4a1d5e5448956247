use gtk4::gdk;

use crate::input::{ShortcutKey, ShortcutModifiers};

fn shortcut_character_from_keycode(keycode: u32) -> Option<char> {
    // GDK reports XKB keycodes (evdev + 8) on both X11 and Wayland.
    match keycode {
        27 => Some('r'),
        _ => None,
    }
}

fn function_key_number(key: gdk::Key) -> Option<u8> {
    const FUNCTION_KEYS: [gdk::Key; 12] = [
        gdk::Key::F1,
        gdk::Key::F2,
        gdk::Key::F3,
        gdk::Key::F4,
        gdk::Key::F5,
        gdk::Key::F6,
        gdk::Key::F7,
        gdk::Key::F8,
        gdk::Key::F9,
        gdk::Key::F10,
        gdk::Key::F11,
        gdk::Key::F12,
    ];
    FUNCTION_KEYS
        .iter()
        .position(|candidate| *candidate == key)
        .and_then(|index| u8::try_from(index + 1).ok())
}

pub(super) fn normalize_shortcut_key(key: gdk::Key, keycode: u32) -> Option<ShortcutKey> {
    if matches!(
        key,
        gdk::Key::Return | gdk::Key::KP_Enter | gdk::Key::ISO_Enter
    ) {
        return Some(ShortcutKey::Enter);
    }
    if key == gdk::Key::Escape {
        return Some(ShortcutKey::Escape);
    }
    if matches!(key, gdk::Key::Tab | gdk::Key::ISO_Left_Tab) {
        return Some(ShortcutKey::Tab);
    }
    if key == gdk::Key::space {
        return Some(ShortcutKey::Space);
    }
    if let Some(number) = function_key_number(key) {
        return Some(ShortcutKey::Function(number));
    }

    match key.to_unicode().map(|character| character.to_ascii_lowercase()) {
        Some(character) if character.is_ascii_alphanumeric() => {
            Some(ShortcutKey::Character(character))
        }
        Some(_) | None => shortcut_character_from_keycode(keycode).map(ShortcutKey::Character),
    }
}

pub(super) fn shortcut_modifiers(modifier: gdk::ModifierType) -> ShortcutModifiers {
    ShortcutModifiers::new(
        modifier.contains(gdk::ModifierType::CONTROL_MASK),
        modifier.contains(gdk::ModifierType::SHIFT_MASK),
        modifier.contains(gdk::ModifierType::ALT_MASK),
        modifier.intersects(gdk::ModifierType::SUPER_MASK | gdk::ModifierType::META_MASK),
    )
}

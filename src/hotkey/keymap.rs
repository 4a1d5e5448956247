use global_hotkey::hotkey::{Code, HotKey, Modifiers};

use super::{HotkeyError, HotkeyResult};
use crate::input::{Chord, ShortcutKey};

const LETTER_CODES: [Code; 26] = [
    Code::KeyA,
    Code::KeyB,
    Code::KeyC,
    Code::KeyD,
    Code::KeyE,
    Code::KeyF,
    Code::KeyG,
    Code::KeyH,
    Code::KeyI,
    Code::KeyJ,
    Code::KeyK,
    Code::KeyL,
    Code::KeyM,
    Code::KeyN,
    Code::KeyO,
    Code::KeyP,
    Code::KeyQ,
    Code::KeyR,
    Code::KeyS,
    Code::KeyT,
    Code::KeyU,
    Code::KeyV,
    Code::KeyW,
    Code::KeyX,
    Code::KeyY,
    Code::KeyZ,
];

const DIGIT_CODES: [Code; 10] = [
    Code::Digit0,
    Code::Digit1,
    Code::Digit2,
    Code::Digit3,
    Code::Digit4,
    Code::Digit5,
    Code::Digit6,
    Code::Digit7,
    Code::Digit8,
    Code::Digit9,
];

const FUNCTION_CODES: [Code; 12] = [
    Code::F1,
    Code::F2,
    Code::F3,
    Code::F4,
    Code::F5,
    Code::F6,
    Code::F7,
    Code::F8,
    Code::F9,
    Code::F10,
    Code::F11,
    Code::F12,
];

fn key_code(key: ShortcutKey) -> Option<Code> {
    match key {
        ShortcutKey::Character(ch @ 'a'..='z') => Some(LETTER_CODES[usize::from(ch as u8 - b'a')]),
        ShortcutKey::Character(ch @ '0'..='9') => Some(DIGIT_CODES[usize::from(ch as u8 - b'0')]),
        ShortcutKey::Character(_) => None,
        ShortcutKey::Enter => Some(Code::Enter),
        ShortcutKey::Escape => Some(Code::Escape),
        ShortcutKey::Space => Some(Code::Space),
        ShortcutKey::Tab => Some(Code::Tab),
        ShortcutKey::Function(number @ 1..=12) => {
            Some(FUNCTION_CODES[usize::from(number - 1)])
        }
        ShortcutKey::Function(_) => None,
    }
}

pub fn to_global_hotkey(chord: &Chord) -> HotkeyResult<HotKey> {
    let code = key_code(chord.key).ok_or(HotkeyError::UnsupportedKey(chord.key))?;
    let mut modifiers = Modifiers::empty();
    for (enabled, flag) in [
        (chord.modifiers.ctrl, Modifiers::CONTROL),
        (chord.modifiers.shift, Modifiers::SHIFT),
        (chord.modifiers.alt, Modifiers::ALT),
        (chord.modifiers.super_key, Modifiers::SUPER),
    ] {
        if enabled {
            modifiers |= flag;
        }
    }
    Ok(HotKey::new(Some(modifiers), code))
}

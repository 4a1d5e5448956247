use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::{ShortcutKey, ShortcutModifiers};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChordParseError {
    #[error("empty key chord")]
    Empty,
    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),
    #[error("unknown key `{0}`")]
    UnknownKey(String),
    #[error("key chord `{0}` needs at least one modifier")]
    MissingModifier(String),
}

/// A modifier set plus one key, written `Ctrl+Shift+E`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chord {
    pub modifiers: ShortcutModifiers,
    pub key: ShortcutKey,
}

impl Chord {
    pub const fn new(modifiers: ShortcutModifiers, key: ShortcutKey) -> Self {
        Self { modifiers, key }
    }
}

impl Default for Chord {
    fn default() -> Self {
        Self::new(
            ShortcutModifiers::new(true, true, false, false),
            ShortcutKey::Character('e'),
        )
    }
}

fn parse_key(token: &str) -> Option<ShortcutKey> {
    let mut chars = token.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return ch
            .is_ascii_alphanumeric()
            .then(|| ShortcutKey::Character(ch.to_ascii_lowercase()));
    }

    match token.to_ascii_lowercase().as_str() {
        "escape" | "esc" => Some(ShortcutKey::Escape),
        "enter" | "return" => Some(ShortcutKey::Enter),
        "space" => Some(ShortcutKey::Space),
        "tab" => Some(ShortcutKey::Tab),
        lower => lower
            .strip_prefix('f')
            .and_then(|number| number.parse::<u8>().ok())
            .filter(|number| (1..=12).contains(number))
            .map(ShortcutKey::Function),
    }
}

impl FromStr for Chord {
    type Err = ChordParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = value.split('+').map(str::trim).collect();
        let Some((key_token, modifier_tokens)) = tokens.split_last() else {
            return Err(ChordParseError::Empty);
        };
        if key_token.is_empty() {
            return Err(ChordParseError::Empty);
        }

        let mut modifiers = ShortcutModifiers::default();
        for token in modifier_tokens {
            match token.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "shift" => modifiers.shift = true,
                "alt" | "option" => modifiers.alt = true,
                "super" | "cmd" | "meta" => modifiers.super_key = true,
                _ => return Err(ChordParseError::UnknownModifier((*token).to_string())),
            }
        }
        let key =
            parse_key(key_token).ok_or_else(|| ChordParseError::UnknownKey((*key_token).to_string()))?;
        if modifiers.is_empty() {
            return Err(ChordParseError::MissingModifier(value.trim().to_string()));
        }

        Ok(Self::new(modifiers, key))
    }
}

impl fmt::Display for ShortcutKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Character(ch) => write!(f, "{}", ch.to_ascii_uppercase()),
            Self::Enter => f.write_str("Enter"),
            Self::Escape => f.write_str("Escape"),
            Self::Space => f.write_str("Space"),
            Self::Tab => f.write_str("Tab"),
            Self::Function(number) => write!(f, "F{number}"),
        }
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = self.modifiers;
        for (enabled, name) in [
            (modifiers.ctrl, "Ctrl"),
            (modifiers.shift, "Shift"),
            (modifiers.alt, "Alt"),
            (modifiers.super_key, "Super"),
        ] {
            if enabled {
                write!(f, "{name}+")?;
            }
        }
        write!(f, "{}", self.key)
    }
}

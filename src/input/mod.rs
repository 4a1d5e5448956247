mod chord;
mod shortcut;

pub use chord::{Chord, ChordParseError};
pub use shortcut::{resolve_popup_shortcut, PopupShortcut, ShortcutKey, ShortcutModifiers};

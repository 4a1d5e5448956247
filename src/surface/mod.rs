use std::borrow::Cow;

use crate::seed::{LanguageHint, SeedOrigin};

/// The editing widget the controller feeds text into and reads text from.
///
/// Implementations are interior-mutable widgets living on the main thread; none of these
/// calls may re-enter the controller synchronously.
pub trait TextSurface {
    /// Replaces the content without emitting a text-change notification.
    fn set_value(&self, text: &str, origin: SeedOrigin);
    fn value(&self) -> String;
    fn set_language(&self, language: &LanguageHint);
    fn clear(&self);
    fn show_language_selector(&self);
}

/// Messages flowing from the surface back to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceNotification {
    TextChanged(String),
    RequestLanguageSelector,
    LanguageChosen(LanguageHint),
}

impl SurfaceNotification {
    /// Builds a language choice from a raw selector id, rejecting malformed ids.
    pub fn language_chosen(raw_id: &str) -> Option<Self> {
        let hint = LanguageHint::new(raw_id);
        if hint.is_none() {
            tracing::debug!(raw_id, "ignoring malformed language selection");
        }
        hint.map(Self::LanguageChosen)
    }
}

/// Drops NUL, which a C string boundary cannot carry. Every other character passes through.
pub fn encode_text(text: &str) -> Cow<'_, str> {
    if text.contains('\0') {
        Cow::Owned(text.replace('\0', ""))
    } else {
        Cow::Borrowed(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_text_keeps_printable_text_borrowed() {
        let text = "fn main() {\r\n\tprintln!(\"héllo\");\n}";
        assert!(matches!(encode_text(text), Cow::Borrowed(_)));
    }

    #[test]
    fn encode_text_strips_only_nul() {
        assert_eq!(
            encode_text("a\0b\u{1b}[31mc\u{7f}d\u{85}e\u{c}f"),
            "ab\u{1b}[31mc\u{7f}d\u{85}e\u{c}f"
        );
    }

    #[test]
    fn encode_text_keeps_control_characters_borrowed() {
        let text = "col1\tcol2\u{c}page2\u{1b}[1mbold\u{85}";
        assert!(matches!(encode_text(text), Cow::Borrowed(s) if s == text));
    }

    #[test]
    fn language_chosen_validates_id() {
        assert_eq!(
            SurfaceNotification::language_chosen("rust"),
            LanguageHint::new("rust").map(SurfaceNotification::LanguageChosen)
        );
        assert_eq!(SurfaceNotification::language_chosen("bad id"), None);
    }
}

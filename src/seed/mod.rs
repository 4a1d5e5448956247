//! Seed-text decision made once per activation, and the `// lang: <id>` magic line.

use std::fmt;

/// Sentinel shown when there is nothing to edit.
pub const PLACEHOLDER_TEXT: &str = "// Write something...";

pub const LANGUAGE_LINE_PREFIX: &str = "// lang: ";

const MAX_LANGUAGE_ID_LEN: usize = 32;

/// Languages offered by the surface's language selector, as `(id, label)`.
pub const KNOWN_LANGUAGES: &[(&str, &str)] = &[
    ("plaintext", "Plain text"),
    ("bash", "Bash"),
    ("c", "C"),
    ("cpp", "C++"),
    ("csharp", "C#"),
    ("css", "CSS"),
    ("go", "Go"),
    ("html", "HTML"),
    ("java", "Java"),
    ("javascript", "JavaScript"),
    ("json", "JSON"),
    ("kotlin", "Kotlin"),
    ("lua", "Lua"),
    ("markdown", "Markdown"),
    ("python", "Python"),
    ("ruby", "Ruby"),
    ("rust", "Rust"),
    ("sql", "SQL"),
    ("swift", "Swift"),
    ("toml", "TOML"),
    ("typescript", "TypeScript"),
    ("yaml", "YAML"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOrigin {
    FromPersistedText,
    FromClipboard,
}

impl SeedOrigin {
    pub const fn is_from_clipboard(self) -> bool {
        matches!(self, Self::FromClipboard)
    }
}

/// Validated language identifier carried by the magic first line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageHint(String);

impl LanguageHint {
    /// Accepts short identifiers made of ASCII alphanumerics and `+ - _ . #`.
    ///
    /// Anything else, such as `objective c` or `text/x-c`, yields `None`: the magic line stays in
    /// the text but no language is passed to the surface.
    pub fn new(id: &str) -> Option<Self> {
        let id = id.trim();
        let valid = !id.is_empty()
            && id.len() <= MAX_LANGUAGE_ID_LEN
            && id
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '+' | '-' | '_' | '.' | '#'));
        valid.then(|| Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    pub text: String,
    pub origin: SeedOrigin,
    pub language: Option<LanguageHint>,
}

pub fn is_blank_text(text: &str) -> bool {
    text.is_empty() || text == PLACEHOLDER_TEXT
}

/// Picks the text an activation starts from.
///
/// `persisted` is `None` when the store had nothing or could not be read. The clipboard is
/// consulted only when the persisted text is blank.
pub fn resolve_seed<F>(persisted: Option<String>, read_clipboard: F) -> Seed
where
    F: FnOnce() -> Option<String>,
{
    let persisted = persisted.unwrap_or_else(|| PLACEHOLDER_TEXT.to_string());
    let (text, origin) = if is_blank_text(&persisted) {
        match read_clipboard().filter(|text| !text.is_empty()) {
            Some(clipboard) => (clipboard, SeedOrigin::FromClipboard),
            None => (persisted, SeedOrigin::FromPersistedText),
        }
    } else {
        (persisted, SeedOrigin::FromPersistedText)
    };

    let language = parse_language_hint(&text);
    Seed {
        text,
        origin,
        language,
    }
}

fn first_line(text: &str) -> &str {
    let line = text.split('\n').next().unwrap_or_default();
    line.strip_suffix('\r').unwrap_or(line)
}

pub fn parse_language_hint(text: &str) -> Option<LanguageHint> {
    first_line(text)
        .strip_prefix(LANGUAGE_LINE_PREFIX)
        .and_then(LanguageHint::new)
}

/// Rewrites the magic first line to name `language`, inserting one when absent.
pub fn with_language_line(text: &str, language: &LanguageHint) -> String {
    let magic_line = format!("{LANGUAGE_LINE_PREFIX}{language}");
    if is_blank_text(text) {
        return format!("{magic_line}\n");
    }
    if first_line(text).starts_with(LANGUAGE_LINE_PREFIX) {
        return match text.find('\n') {
            Some(newline) => format!("{magic_line}{}", &text[newline..]),
            None => magic_line,
        };
    }
    format!("{magic_line}\n{text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_clipboard() -> Option<String> {
        None
    }

    #[test]
    fn empty_persisted_text_falls_back_to_clipboard() {
        let seed = resolve_seed(Some(String::new()), || Some("abc".to_string()));
        assert_eq!(seed.text, "abc");
        assert_eq!(seed.origin, SeedOrigin::FromClipboard);
        assert_eq!(seed.language, None);
    }

    #[test]
    fn placeholder_persisted_text_counts_as_blank() {
        let seed = resolve_seed(Some(PLACEHOLDER_TEXT.to_string()), || Some("x".to_string()));
        assert_eq!(seed.origin, SeedOrigin::FromClipboard);
    }

    #[test]
    fn persisted_text_wins_and_clipboard_is_not_read() {
        let seed = resolve_seed(Some("// lang: rust\nfn main(){}".to_string()), || {
            panic!("clipboard must not be read")
        });
        assert_eq!(seed.text, "// lang: rust\nfn main(){}");
        assert_eq!(seed.origin, SeedOrigin::FromPersistedText);
        assert_eq!(seed.language.as_ref().map(LanguageHint::as_str), Some("rust"));
    }

    #[test]
    fn nothing_anywhere_yields_placeholder() {
        let seed = resolve_seed(None, no_clipboard);
        assert_eq!(seed.text, PLACEHOLDER_TEXT);
        assert_eq!(seed.origin, SeedOrigin::FromPersistedText);

        let seed = resolve_seed(None, || Some(String::new()));
        assert_eq!(seed.text, PLACEHOLDER_TEXT);
    }

    #[test]
    fn clipboard_seed_carries_language_hint() {
        let seed = resolve_seed(None, || Some("// lang: python\nprint(1)".to_string()));
        assert!(seed.origin.is_from_clipboard());
        assert_eq!(seed.language.map(|hint| hint.to_string()).as_deref(), Some("python"));
    }

    #[test]
    fn language_hint_is_trimmed_and_handles_crlf() {
        let hint = parse_language_hint("// lang:   go  \r\npackage main").unwrap();
        assert_eq!(hint.as_str(), "go");
    }

    #[test]
    fn language_hint_requires_exact_prefix_on_first_line() {
        assert_eq!(parse_language_hint("//lang: rust"), None);
        assert_eq!(parse_language_hint("text\n// lang: rust"), None);
        assert_eq!(parse_language_hint("// lang: "), None);
        assert_eq!(parse_language_hint("// lang: objective c\nint x;"), None);
        assert_eq!(parse_language_hint("// lang: text/x-c"), None);
    }

    #[test]
    fn language_ids_with_script_characters_are_rejected() {
        assert_eq!(LanguageHint::new("rust'); alert(1)"), None);
        assert_eq!(LanguageHint::new(&"a".repeat(MAX_LANGUAGE_ID_LEN + 1)), None);
        assert_eq!(LanguageHint::new("c++").map(|h| h.to_string()).as_deref(), Some("c++"));
    }

    #[test]
    fn with_language_line_replaces_existing_magic_line() {
        let rust = LanguageHint::new("rust").unwrap();
        assert_eq!(
            with_language_line("// lang: python\nprint(1)", &rust),
            "// lang: rust\nprint(1)"
        );
        assert_eq!(with_language_line("// lang: python", &rust), "// lang: rust");
    }

    #[test]
    fn with_language_line_inserts_when_missing() {
        let sql = LanguageHint::new("sql").unwrap();
        assert_eq!(with_language_line("select 1;", &sql), "// lang: sql\nselect 1;");
        assert_eq!(with_language_line(PLACEHOLDER_TEXT, &sql), "// lang: sql\n");
        assert_eq!(with_language_line("", &sql), "// lang: sql\n");
    }

    #[test]
    fn known_language_ids_are_valid_hints() {
        for (id, _) in KNOWN_LANGUAGES {
            assert!(LanguageHint::new(id).is_some(), "{id}");
        }
    }
}

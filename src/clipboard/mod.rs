use std::cell::RefCell;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("failed to open system clipboard: {source}")]
    Open {
        #[source]
        source: arboard::Error,
    },
    #[error("failed to read clipboard text: {source}")]
    Read {
        #[source]
        source: arboard::Error,
    },
    #[error("failed to set clipboard text: {source}")]
    Write {
        #[source]
        source: arboard::Error,
    },
}

pub type ClipboardResult<T> = std::result::Result<T, ClipboardError>;

pub trait ClipboardBackend {
    /// Current plain-text clipboard content, `None` when the clipboard holds no text.
    fn read_text(&self) -> ClipboardResult<Option<String>>;
    fn write_text(&self, text: &str) -> ClipboardResult<()>;
}

/// System clipboard through `arboard`.
///
/// The handle is kept open for the lifetime of the process: on Wayland and X11 the
/// owning process must stay alive to keep serving a selection it has set.
pub struct ArboardClipboard {
    inner: RefCell<arboard::Clipboard>,
}

impl ArboardClipboard {
    pub fn new() -> ClipboardResult<Self> {
        let clipboard = arboard::Clipboard::new().map_err(|source| ClipboardError::Open { source })?;
        Ok(Self {
            inner: RefCell::new(clipboard),
        })
    }
}

impl std::fmt::Debug for ArboardClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArboardClipboard").finish_non_exhaustive()
    }
}

impl ClipboardBackend for ArboardClipboard {
    fn read_text(&self) -> ClipboardResult<Option<String>> {
        match self.inner.borrow_mut().get_text() {
            Ok(text) => Ok(Some(text)),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(source) => Err(ClipboardError::Read { source }),
        }
    }

    fn write_text(&self, text: &str) -> ClipboardResult<()> {
        self.inner
            .borrow_mut()
            .set_text(text)
            .map_err(|source| ClipboardError::Write { source })
    }
}

/// Clipboard used when the system clipboard cannot be opened; reads nothing and
/// accepts writes so the commit path keeps going.
#[derive(Debug, Default)]
pub struct UnavailableClipboard;

impl ClipboardBackend for UnavailableClipboard {
    fn read_text(&self) -> ClipboardResult<Option<String>> {
        Ok(None)
    }

    fn write_text(&self, _text: &str) -> ClipboardResult<()> {
        tracing::warn!("system clipboard unavailable; committed text not copied");
        Ok(())
    }
}

/// Opens the system clipboard, falling back to [`UnavailableClipboard`].
pub fn system_clipboard() -> Box<dyn ClipboardBackend> {
    match ArboardClipboard::new() {
        Ok(clipboard) => Box::new(clipboard),
        Err(err) => {
            tracing::warn!(?err, "system clipboard unavailable");
            Box::new(UnavailableClipboard)
        }
    }
}

/// Reads clipboard text, treating failures and empty strings as "no value available".
pub fn read_non_empty_text(backend: &dyn ClipboardBackend) -> Option<String> {
    match backend.read_text() {
        Ok(Some(text)) if !text.is_empty() => Some(text),
        Ok(_) => None,
        Err(err) => {
            tracing::warn!(?err, "clipboard read failed; treating as empty");
            None
        }
    }
}

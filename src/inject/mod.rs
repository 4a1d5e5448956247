use serde::Deserialize;
use thiserror::Error;

use crate::hypr;

#[derive(Debug, Error)]
pub enum InjectError {
    #[error("failed to initialize virtual keyboard: {source}")]
    KeyboardInit {
        #[source]
        source: enigo::NewConError,
    },
    #[error("failed to synthesize {key}: {source}")]
    Key {
        key: &'static str,
        #[source]
        source: enigo::InputError,
    },
    #[error("failed to run hyprctl sendshortcut: {source}")]
    CommandIo {
        #[source]
        source: std::io::Error,
    },
    #[error("hyprland rejected paste shortcut: {reply}")]
    DispatchRejected { reply: String },
}

pub type InjectResult<T> = std::result::Result<T, InjectError>;

/// Synthesizes the paste chord into whichever application currently holds focus.
pub trait InputInjector {
    fn send_paste(&self) -> InjectResult<()>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasteBackend {
    #[default]
    Auto,
    Hyprland,
    Enigo,
}

/// Ctrl+V through a short-lived `enigo` virtual keyboard.
#[derive(Debug, Default)]
pub struct EnigoInjector;

impl InputInjector for EnigoInjector {
    fn send_paste(&self) -> InjectResult<()> {
        use enigo::{Direction, Enigo, Key, Keyboard, Settings};

        let mut enigo = Enigo::new(&Settings::default())
            .map_err(|source| InjectError::KeyboardInit { source })?;

        enigo
            .key(Key::Control, Direction::Press)
            .map_err(|source| InjectError::Key {
                key: "Ctrl",
                source,
            })?;
        let clicked = enigo
            .key(Key::Unicode('v'), Direction::Click)
            .map_err(|source| InjectError::Key { key: "V", source });
        let released = enigo
            .key(Key::Control, Direction::Release)
            .map_err(|source| InjectError::Key {
                key: "Ctrl",
                source,
            });
        clicked.and(released)?;

        tracing::debug!("paste injected via virtual keyboard");
        Ok(())
    }
}

const HYPR_PASTE_ARGS: [&str; 3] = ["dispatch", "sendshortcut", "CTRL, V, activewindow"];

/// Ctrl+V delivered by Hyprland to the active window.
#[derive(Debug, Default)]
pub struct HyprlandInjector;

impl InputInjector for HyprlandInjector {
    fn send_paste(&self) -> InjectResult<()> {
        let outcome =
            hypr::hyprctl(&HYPR_PASTE_ARGS).map_err(|source| InjectError::CommandIo { source })?;
        if !hypr::dispatch_succeeded(&outcome) {
            return Err(InjectError::DispatchRejected {
                reply: String::from_utf8_lossy(&outcome.stdout).trim().to_string(),
            });
        }
        tracing::debug!("paste injected via hyprland sendshortcut");
        Ok(())
    }
}

fn resolve_backend(backend: PasteBackend, hyprland: bool) -> PasteBackend {
    match backend {
        PasteBackend::Auto if hyprland => PasteBackend::Hyprland,
        PasteBackend::Auto => PasteBackend::Enigo,
        explicit => explicit,
    }
}

pub fn select_injector(backend: PasteBackend) -> Box<dyn InputInjector> {
    let resolved = resolve_backend(backend, hypr::is_hyprland_session());
    tracing::info!(configured = ?backend, resolved = ?resolved, "selected paste injector");
    match resolved {
        PasteBackend::Hyprland => Box::new(HyprlandInjector),
        PasteBackend::Auto | PasteBackend::Enigo => Box::new(EnigoInjector),
    }
}

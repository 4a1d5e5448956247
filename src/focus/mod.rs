mod hyprland;
mod x11;

use std::io;

use serde::Deserialize;
use thiserror::Error;

pub use hyprland::HyprlandTracker;
pub use x11::XdotoolTracker;

/// Opaque handle to the application that held focus before the popup appeared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForegroundApp {
    handle: String,
    label: Option<String>,
}

impl ForegroundApp {
    pub fn new(handle: impl Into<String>, label: Option<String>) -> Self {
        Self {
            handle: handle.into(),
            label,
        }
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

#[derive(Debug, Error)]
pub enum FocusError {
    #[error("failed to run focus command: {command}")]
    CommandIo {
        command: String,
        #[source]
        source: io::Error,
    },
}

pub type FocusResult<T> = std::result::Result<T, FocusError>;

pub trait ForegroundTracker {
    /// `None` when no identifiable application holds focus.
    fn capture_current(&self) -> Option<ForegroundApp>;
    /// Requests focus back. A handle whose application is gone is a no-op, not an error.
    fn restore(&self, app: &ForegroundApp) -> FocusResult<()>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusBackend {
    #[default]
    Auto,
    Hyprland,
    X11,
    None,
}

/// Tracker for sessions where the foreground application cannot be identified.
#[derive(Debug, Default)]
pub struct NoopTracker;

impl ForegroundTracker for NoopTracker {
    fn capture_current(&self) -> Option<ForegroundApp> {
        None
    }

    fn restore(&self, _app: &ForegroundApp) -> FocusResult<()> {
        Ok(())
    }
}

fn resolve_backend(backend: FocusBackend, hyprland: bool, x11_display: bool) -> FocusBackend {
    match backend {
        FocusBackend::Auto if hyprland => FocusBackend::Hyprland,
        FocusBackend::Auto if x11_display => FocusBackend::X11,
        FocusBackend::Auto => FocusBackend::None,
        explicit => explicit,
    }
}

pub fn select_tracker(backend: FocusBackend) -> Box<dyn ForegroundTracker> {
    let resolved = resolve_backend(
        backend,
        crate::hypr::is_hyprland_session(),
        std::env::var_os("DISPLAY").is_some() && std::env::var_os("WAYLAND_DISPLAY").is_none(),
    );
    tracing::info!(configured = ?backend, resolved = ?resolved, "selected focus tracker");
    match resolved {
        FocusBackend::Hyprland => Box::new(HyprlandTracker),
        FocusBackend::X11 => Box::new(XdotoolTracker),
        FocusBackend::Auto | FocusBackend::None => Box::new(NoopTracker),
    }
}

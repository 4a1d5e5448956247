use super::{FocusError, FocusResult, ForegroundApp, ForegroundTracker};
use crate::hypr;

/// Tracks the active Hyprland client by address.
#[derive(Debug, Default)]
pub struct HyprlandTracker;

impl ForegroundTracker for HyprlandTracker {
    fn capture_current(&self) -> Option<ForegroundApp> {
        let window = hypr::active_window()?;
        if window.pid == Some(std::process::id()) {
            tracing::debug!(address = window.address, "active window is the popup itself");
            return None;
        }
        Some(ForegroundApp::new(window.address, window.class))
    }

    fn restore(&self, app: &ForegroundApp) -> FocusResult<()> {
        let selector = format!("address:{}", app.handle());
        let outcome = hypr::hyprctl(&["dispatch", "focuswindow", &selector]).map_err(|source| {
            FocusError::CommandIo {
                command: "hyprctl dispatch focuswindow".to_string(),
                source,
            }
        })?;

        if hypr::dispatch_succeeded(&outcome) {
            tracing::debug!(selector, label = app.label(), "restored focus");
        } else {
            let reply = String::from_utf8_lossy(&outcome.stdout);
            tracing::debug!(
                selector,
                reply = reply.trim(),
                "focus target no longer available"
            );
        }
        Ok(())
    }
}

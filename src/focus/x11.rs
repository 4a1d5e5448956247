use std::process::Command;

use super::{FocusError, FocusResult, ForegroundApp, ForegroundTracker};

const XDOTOOL: &str = "xdotool";

/// Tracks the active X11 window through `xdotool`.
#[derive(Debug, Default)]
pub struct XdotoolTracker;

fn parse_window_id(stdout: &[u8]) -> Option<u64> {
    String::from_utf8_lossy(stdout).trim().parse().ok()
}

impl ForegroundTracker for XdotoolTracker {
    fn capture_current(&self) -> Option<ForegroundApp> {
        let outcome = match Command::new(XDOTOOL).arg("getactivewindow").output() {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(?err, "xdotool unavailable; focus will not be restored");
                return None;
            }
        };
        if !outcome.status.success() {
            return None;
        }
        parse_window_id(&outcome.stdout).map(|id| ForegroundApp::new(id.to_string(), None))
    }

    fn restore(&self, app: &ForegroundApp) -> FocusResult<()> {
        let outcome = Command::new(XDOTOOL)
            .args(["windowactivate", app.handle()])
            .output()
            .map_err(|source| FocusError::CommandIo {
                command: "xdotool windowactivate".to_string(),
                source,
            })?;

        if outcome.status.success() {
            tracing::debug!(window = app.handle(), "restored focus");
        } else {
            let stderr = String::from_utf8_lossy(&outcome.stderr);
            tracing::debug!(
                window = app.handle(),
                stderr = stderr.trim(),
                "focus target no longer available"
            );
        }
        Ok(())
    }
}

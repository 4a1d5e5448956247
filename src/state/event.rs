use super::model::PopupState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupEvent {
    /// Global hotkey or auxiliary trigger; toggles visibility.
    Activate,
    Dismiss,
    DismissAndClear,
    Commit,
    FocusLost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: PopupState,
    pub event: PopupEvent,
    pub to: PopupState,
}

impl StateTransition {
    pub const fn new(from: PopupState, event: PopupEvent, to: PopupState) -> Self {
        Self { from, event, to }
    }
}

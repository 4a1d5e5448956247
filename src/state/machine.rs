use std::collections::VecDeque;

use super::error::{StateError, StateResult};
use super::{PopupEvent, PopupState, StateTransition};

const MAX_TRANSITION_HISTORY: usize = 64;

#[derive(Debug)]
pub struct StateMachine {
    state: PopupState,
    transition_history: VecDeque<StateTransition>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            state: PopupState::default(),
            transition_history: VecDeque::new(),
        }
    }

    pub fn state(&self) -> PopupState {
        self.state
    }

    pub fn can_transition(&self, event: PopupEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: PopupEvent) -> Option<PopupState> {
        use PopupEvent::*;
        match (self.state, event) {
            (PopupState::Hidden, Activate) => Some(PopupState::Visible),
            (PopupState::Visible, Activate) => Some(PopupState::Hidden),
            (PopupState::Visible, Dismiss | DismissAndClear | Commit | FocusLost) => {
                Some(PopupState::Hidden)
            }
            _ => None,
        }
    }

    pub fn transition(&mut self, event: PopupEvent) -> StateResult<StateTransition> {
        tracing::debug!(from = ?self.state, event = ?event, "request state transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::warn!(from = ?from, event = ?event, "invalid state transition requested");
            StateError::InvalidStateTransition { from, event }
        })?;

        let record = StateTransition::new(self.state, event, next);
        self.state = next;
        if self.transition_history.len() == MAX_TRANSITION_HISTORY {
            self.transition_history.pop_front();
        }
        self.transition_history.push_back(record);

        Ok(record)
    }
}

#[cfg(test)]
impl StateMachine {
    fn last_transition(&self) -> Option<StateTransition> {
        self.transition_history.back().copied()
    }

    fn history(&self) -> Vec<StateTransition> {
        self.transition_history.iter().copied().collect()
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activate_toggles_between_hidden_and_visible() {
        let mut machine = StateMachine::new();
        assert_eq!(machine.state(), PopupState::Hidden);

        let shown = machine
            .transition(PopupEvent::Activate)
            .expect("hidden -> visible should transition");
        assert_eq!(shown.to, PopupState::Visible);

        let hidden = machine
            .transition(PopupEvent::Activate)
            .expect("visible -> hidden should transition");
        assert_eq!(hidden.to, PopupState::Hidden);
    }

    #[test]
    fn closing_events_are_only_valid_while_visible() {
        let mut machine = StateMachine::new();
        for event in [
            PopupEvent::Dismiss,
            PopupEvent::DismissAndClear,
            PopupEvent::Commit,
            PopupEvent::FocusLost,
        ] {
            assert!(!machine.can_transition(event), "{event:?} while hidden");
        }

        let _ = machine
            .transition(PopupEvent::Activate)
            .expect("activate should work");
        for event in [
            PopupEvent::Dismiss,
            PopupEvent::DismissAndClear,
            PopupEvent::Commit,
            PopupEvent::FocusLost,
        ] {
            assert_eq!(machine.next_state(event), Some(PopupState::Hidden));
        }
    }

    #[test]
    fn transition_records_history_with_ordered_entries() {
        let mut machine = StateMachine::new();
        let _ = machine.transition(PopupEvent::Activate).expect("show");
        let _ = machine.transition(PopupEvent::Commit).expect("commit");
        let _ = machine.transition(PopupEvent::Activate).expect("show again");
        let _ = machine.transition(PopupEvent::FocusLost).expect("focus lost");

        assert_eq!(
            machine.history(),
            vec![
                StateTransition::new(
                    PopupState::Hidden,
                    PopupEvent::Activate,
                    PopupState::Visible
                ),
                StateTransition::new(PopupState::Visible, PopupEvent::Commit, PopupState::Hidden),
                StateTransition::new(
                    PopupState::Hidden,
                    PopupEvent::Activate,
                    PopupState::Visible
                ),
                StateTransition::new(
                    PopupState::Visible,
                    PopupEvent::FocusLost,
                    PopupState::Hidden
                ),
            ]
        );
        assert_eq!(
            machine.last_transition().map(|record| record.event),
            Some(PopupEvent::FocusLost)
        );
    }

    #[test]
    fn invalid_transition_returns_error_without_mutating_history() {
        let mut machine = StateMachine::new();

        let err = machine
            .transition(PopupEvent::Dismiss)
            .expect_err("hidden -> dismiss should fail");
        assert!(matches!(
            err,
            StateError::InvalidStateTransition {
                from: PopupState::Hidden,
                event: PopupEvent::Dismiss
            }
        ));
        assert_eq!(machine.state(), PopupState::Hidden);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn history_is_bounded() {
        let mut machine = StateMachine::new();
        for _ in 0..(MAX_TRANSITION_HISTORY + 10) {
            let _ = machine.transition(PopupEvent::Activate).expect("toggle");
        }
        assert_eq!(machine.history().len(), MAX_TRANSITION_HISTORY);
    }
}

//! The popup's show/hide lifecycle, seed decision, save-on-change and commit sequence.

use std::rc::Rc;
use std::time::Duration;

use crate::clipboard::{self, ClipboardBackend};
use crate::focus::{ForegroundApp, ForegroundTracker};
use crate::inject::InputInjector;
use crate::input::PopupShortcut;
use crate::seed::{self, LanguageHint, SeedOrigin};
use crate::state::{PopupEvent, PopupState, StateMachine};
use crate::storage::TextStore;
use crate::surface::{encode_text, SurfaceNotification, TextSurface};

pub const DEFAULT_PASTE_DELAY: Duration = Duration::from_millis(100);

/// The native window hosting the text surface.
pub trait PopupWindow {
    fn show_and_focus(&self);
    fn hide(&self);
}

/// Runs a continuation on the main loop after `delay`.
pub trait Scheduler {
    fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>);
}

pub struct ControllerDeps {
    pub store: Box<dyn TextStore>,
    pub clipboard: Box<dyn ClipboardBackend>,
    pub tracker: Box<dyn ForegroundTracker>,
    pub injector: Rc<dyn InputInjector>,
    pub surface: Rc<dyn TextSurface>,
    pub window: Rc<dyn PopupWindow>,
    pub scheduler: Box<dyn Scheduler>,
}

pub struct PopupController {
    machine: StateMachine,
    deps: ControllerDeps,
    foreground: Option<ForegroundApp>,
    paste_delay: Duration,
}

impl PopupController {
    pub fn new(deps: ControllerDeps, paste_delay: Duration) -> Self {
        Self {
            machine: StateMachine::new(),
            deps,
            foreground: None,
            paste_delay,
        }
    }

    pub fn state(&self) -> PopupState {
        self.machine.state()
    }

    /// Global hotkey entry point: shows when hidden, dismisses when visible.
    pub fn activate(&mut self) {
        if self.state().is_visible() {
            self.close(PopupEvent::Activate);
            return;
        }
        if let Err(err) = self.machine.transition(PopupEvent::Activate) {
            tracing::warn!(?err, "popup state transition rejected");
            return;
        }

        self.foreground = self.deps.tracker.capture_current();
        tracing::debug!(
            foreground = self.foreground.as_ref().map(ForegroundApp::handle),
            "captured foreground application"
        );
        self.deps.window.show_and_focus();

        let seed = seed::resolve_seed(self.load_persisted(), || {
            clipboard::read_non_empty_text(self.deps.clipboard.as_ref())
        });
        tracing::debug!(origin = ?seed.origin, language = ?seed.language, "seeding surface");
        self.deps
            .surface
            .set_value(&encode_text(&seed.text), seed.origin);
        if let Some(language) = &seed.language {
            self.deps.surface.set_language(language);
        }
    }

    pub fn dismiss(&mut self) {
        self.close(PopupEvent::Dismiss);
    }

    pub fn on_focus_lost(&mut self) {
        self.close(PopupEvent::FocusLost);
    }

    pub fn dismiss_and_clear(&mut self) {
        if !self.machine.can_transition(PopupEvent::DismissAndClear) {
            tracing::debug!(state = ?self.state(), "ignoring dismiss-and-clear");
            return;
        }
        self.deps.surface.clear();
        if let Err(err) = self.deps.store.clear() {
            tracing::warn!(?err, "failed to delete persisted text");
        }
        self.close(PopupEvent::DismissAndClear);
    }

    /// Copies the surface text, hides, and pastes it into the previous application.
    pub fn commit(&mut self) {
        if !self.machine.can_transition(PopupEvent::Commit) {
            tracing::debug!(state = ?self.state(), "ignoring commit");
            return;
        }
        let text = self.deps.surface.value();
        if let Err(err) = self.deps.clipboard.write_text(&text) {
            tracing::warn!(?err, "failed to copy committed text");
        }
        let foreground = self.foreground.take();
        self.close(PopupEvent::Commit);

        let Some(app) = foreground else {
            tracing::debug!("no previous application captured; skipping paste");
            return;
        };
        if let Err(err) = self.deps.tracker.restore(&app) {
            tracing::warn!(?err, handle = app.handle(), "failed to restore focus");
        }
        let injector = Rc::clone(&self.deps.injector);
        self.deps.scheduler.defer(
            self.paste_delay,
            Box::new(move || {
                if let Err(err) = injector.send_paste() {
                    tracing::warn!(?err, "paste injection failed");
                }
            }),
        );
        tracing::info!(
            chars = text.chars().count(),
            target = app.label().unwrap_or(app.handle()),
            "committed text"
        );
    }

    pub fn on_text_changed(&mut self, text: &str) {
        if !self.state().is_visible() {
            tracing::debug!("ignoring text change while hidden");
            return;
        }
        self.persist(text);
    }

    pub fn request_language_selector(&mut self) {
        if self.state().is_visible() {
            self.deps.surface.show_language_selector();
        }
    }

    /// Rewrites the magic first line for `language` and persists the result.
    pub fn on_language_chosen(&mut self, language: &LanguageHint) {
        if !self.state().is_visible() {
            return;
        }
        let text = seed::with_language_line(&self.deps.surface.value(), language);
        let text = encode_text(&text);
        self.deps
            .surface
            .set_value(&text, SeedOrigin::FromPersistedText);
        self.deps.surface.set_language(language);
        self.persist(&text);
    }

    pub fn handle_shortcut(&mut self, shortcut: PopupShortcut) {
        match shortcut {
            PopupShortcut::DismissAndClear => self.dismiss_and_clear(),
            PopupShortcut::Dismiss => self.dismiss(),
            PopupShortcut::RequestLanguageSelector => self.request_language_selector(),
            PopupShortcut::Commit => self.commit(),
        }
    }

    pub fn handle_notification(&mut self, notification: SurfaceNotification) {
        match notification {
            SurfaceNotification::TextChanged(text) => self.on_text_changed(&text),
            SurfaceNotification::RequestLanguageSelector => self.request_language_selector(),
            SurfaceNotification::LanguageChosen(language) => self.on_language_chosen(&language),
        }
    }

    fn close(&mut self, event: PopupEvent) {
        if !self.machine.can_transition(event) {
            tracing::debug!(state = ?self.state(), ?event, "ignoring popup event");
            return;
        }
        if let Err(err) = self.machine.transition(event) {
            tracing::warn!(?err, "popup state transition rejected");
            return;
        }
        self.deps.window.hide();
        self.foreground = None;
    }

    fn load_persisted(&self) -> Option<String> {
        match self.deps.store.load() {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(?err, "failed to read persisted text; using placeholder");
                None
            }
        }
    }

    fn persist(&self, text: &str) {
        if let Err(err) = self.deps.store.save(text) {
            tracing::warn!(?err, "failed to persist editor text");
        }
    }
}

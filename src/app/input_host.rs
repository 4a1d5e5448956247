use std::cell::RefCell;
use std::time::Duration;

use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use gtk4::prelude::*;
use gtk4::{glib, ApplicationWindow};

use super::input_bridge::{normalize_shortcut_key, shortcut_modifiers};
use crate::hotkey::{
    to_global_hotkey, HotkeyCallback, HotkeyError, HotkeyResult, InputHost, KeyDisposition,
    LocalKeyFilter, Subscription,
};
use crate::input::Chord;

const HOTKEY_POLL_INTERVAL: Duration = Duration::from_millis(24);

/// `InputHost` over `global-hotkey` for the system chord and a capture-phase
/// `EventControllerKey` on the popup window for local chords.
pub(super) struct GtkInputHost {
    window: ApplicationWindow,
}

impl GtkInputHost {
    pub(super) fn new(window: &ApplicationWindow) -> Self {
        Self {
            window: window.clone(),
        }
    }
}

impl InputHost for GtkInputHost {
    fn register_global_hotkey(
        &self,
        chord: Chord,
        mut callback: HotkeyCallback,
    ) -> HotkeyResult<Subscription> {
        let hotkey = to_global_hotkey(&chord)?;
        let manager =
            GlobalHotKeyManager::new().map_err(|source| HotkeyError::Unavailable { source })?;
        manager
            .register(hotkey)
            .map_err(|source| HotkeyError::Register { chord, source })?;

        let hotkey_id = hotkey.id();
        let receiver = GlobalHotKeyEvent::receiver();
        let poll_source = glib::timeout_add_local(HOTKEY_POLL_INTERVAL, move || {
            while let Ok(event) = receiver.try_recv() {
                if event.id == hotkey_id && event.state == HotKeyState::Pressed {
                    callback();
                }
            }
            glib::ControlFlow::Continue
        });

        Ok(Subscription::new(move || {
            poll_source.remove();
            if let Err(err) = manager.unregister(hotkey) {
                tracing::warn!(?err, %chord, "failed to unregister global hotkey");
            }
        }))
    }

    fn intercept_local_keys(&self, filter: LocalKeyFilter) -> Subscription {
        let filter = RefCell::new(filter);
        let key_controller = gtk4::EventControllerKey::new();
        key_controller.set_propagation_phase(gtk4::PropagationPhase::Capture);
        key_controller.connect_key_pressed(move |_, key, keycode, modifier| {
            let Some(shortcut_key) = normalize_shortcut_key(key, keycode) else {
                return glib::Propagation::Proceed;
            };
            let Ok(mut filter) = filter.try_borrow_mut() else {
                return glib::Propagation::Proceed;
            };
            match (*filter)(shortcut_key, shortcut_modifiers(modifier)) {
                KeyDisposition::Consumed => glib::Propagation::Stop,
                KeyDisposition::PassThrough => glib::Propagation::Proceed,
            }
        });
        self.window.add_controller(key_controller.clone());

        let window = self.window.clone();
        Subscription::new(move || window.remove_controller(&key_controller))
    }
}

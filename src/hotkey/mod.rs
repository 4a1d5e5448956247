//! Global activation hotkey and the popup's local key interception, behind [`InputHost`].

mod keymap;

use thiserror::Error;

use crate::input::{resolve_popup_shortcut, Chord, PopupShortcut, ShortcutKey, ShortcutModifiers};

pub use keymap::to_global_hotkey;

#[derive(Debug, Error)]
pub enum HotkeyError {
    #[error("global hotkeys unavailable: {source}")]
    Unavailable {
        #[source]
        source: global_hotkey::Error,
    },
    #[error("failed to register global hotkey {chord}: {source}")]
    Register {
        chord: Chord,
        #[source]
        source: global_hotkey::Error,
    },
    #[error("key {0} cannot be used as a global hotkey")]
    UnsupportedKey(ShortcutKey),
}

pub type HotkeyResult<T> = std::result::Result<T, HotkeyError>;

/// Releases a registration when dropped or explicitly unsubscribed.
#[must_use = "dropping a Subscription releases it immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    Consumed,
    PassThrough,
}

pub type HotkeyCallback = Box<dyn FnMut()>;
pub type LocalKeyFilter = Box<dyn FnMut(ShortcutKey, ShortcutModifiers) -> KeyDisposition>;

pub trait InputHost {
    /// Fires `callback` on the main thread each time `chord` is pressed system-wide.
    fn register_global_hotkey(
        &self,
        chord: Chord,
        callback: HotkeyCallback,
    ) -> HotkeyResult<Subscription>;

    /// Sees key-down events on the focused popup before the text surface does.
    fn intercept_local_keys(&self, filter: LocalKeyFilter) -> Subscription;
}

/// Live input registrations; dropping this releases both.
#[derive(Debug)]
pub struct InputHooks {
    global: Option<Subscription>,
    local: Subscription,
}

impl InputHooks {
    pub fn has_global_hotkey(&self) -> bool {
        self.global.is_some()
    }

    pub fn release(self) {
        let Self { global, local } = self;
        if let Some(global) = global {
            global.unsubscribe();
        }
        local.unsubscribe();
        tracing::debug!("released input hooks");
    }
}

/// Registers the activation chord and the local shortcut filter.
///
/// Registration failure of the global chord is logged and leaves only the auxiliary
/// activation path; it never aborts startup.
pub fn install_input_hooks<T, S>(
    host: &dyn InputHost,
    chord: Chord,
    on_toggle: T,
    mut on_shortcut: S,
) -> InputHooks
where
    T: FnMut() + 'static,
    S: FnMut(PopupShortcut) + 'static,
{
    let global = match host.register_global_hotkey(chord, Box::new(on_toggle)) {
        Ok(subscription) => {
            tracing::info!(%chord, "registered global hotkey");
            Some(subscription)
        }
        Err(err) => {
            tracing::warn!(
                %chord,
                ?err,
                "global hotkey unavailable; use `popup-editor --toggle` from a compositor binding"
            );
            None
        }
    };

    let local = host.intercept_local_keys(Box::new(move |key, modifiers| {
        match resolve_popup_shortcut(key, modifiers) {
            Some(shortcut) => {
                tracing::debug!(?shortcut, "popup shortcut intercepted");
                on_shortcut(shortcut);
                KeyDisposition::Consumed
            }
            None => KeyDisposition::PassThrough,
        }
    }));

    InputHooks { global, local }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Default)]
    struct FakeInputHost {
        fail_global: bool,
        global: Rc<RefCell<Option<HotkeyCallback>>>,
        local: Rc<RefCell<Option<LocalKeyFilter>>>,
        registered_chord: Cell<Option<Chord>>,
        released: Rc<RefCell<Vec<&'static str>>>,
    }

    impl FakeInputHost {
        fn press_global(&self) -> bool {
            match self.global.borrow_mut().as_mut() {
                Some(callback) => {
                    callback();
                    true
                }
                None => false,
            }
        }

        fn press_local(&self, key: ShortcutKey, modifiers: ShortcutModifiers) -> KeyDisposition {
            match self.local.borrow_mut().as_mut() {
                Some(filter) => filter(key, modifiers),
                None => KeyDisposition::PassThrough,
            }
        }
    }

    impl InputHost for FakeInputHost {
        fn register_global_hotkey(
            &self,
            chord: Chord,
            callback: HotkeyCallback,
        ) -> HotkeyResult<Subscription> {
            if self.fail_global {
                return Err(HotkeyError::UnsupportedKey(chord.key));
            }
            self.registered_chord.set(Some(chord));
            *self.global.borrow_mut() = Some(callback);
            let slot = self.global.clone();
            let released = self.released.clone();
            Ok(Subscription::new(move || {
                slot.borrow_mut().take();
                released.borrow_mut().push("global");
            }))
        }

        fn intercept_local_keys(&self, filter: LocalKeyFilter) -> Subscription {
            *self.local.borrow_mut() = Some(filter);
            let slot = self.local.clone();
            let released = self.released.clone();
            Subscription::new(move || {
                slot.borrow_mut().take();
                released.borrow_mut().push("local");
            })
        }
    }

    #[test]
    fn global_chord_invokes_toggle_each_press() {
        let host = FakeInputHost::default();
        let toggles = Rc::new(Cell::new(0));
        let hooks = install_input_hooks(
            &host,
            Chord::default(),
            {
                let toggles = toggles.clone();
                move || toggles.set(toggles.get() + 1)
            },
            |_| {},
        );

        assert!(hooks.has_global_hotkey());
        assert_eq!(host.registered_chord.get(), Some(Chord::default()));
        assert!(host.press_global());
        assert!(host.press_global());
        assert_eq!(toggles.get(), 2);
    }

    #[test]
    fn local_filter_consumes_only_popup_shortcuts() {
        let host = FakeInputHost::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _hooks = install_input_hooks(&host, Chord::default(), || {}, {
            let seen = seen.clone();
            move |shortcut| seen.borrow_mut().push(shortcut)
        });

        let ctrl = ShortcutModifiers::ctrl();
        assert_eq!(
            host.press_local(ShortcutKey::Escape, ctrl),
            KeyDisposition::Consumed
        );
        assert_eq!(
            host.press_local(ShortcutKey::Character('x'), ShortcutModifiers::default()),
            KeyDisposition::PassThrough
        );
        assert_eq!(
            host.press_local(ShortcutKey::Enter, ctrl),
            KeyDisposition::Consumed
        );
        assert_eq!(
            *seen.borrow(),
            vec![PopupShortcut::DismissAndClear, PopupShortcut::Commit]
        );
    }

    #[test]
    fn registration_failure_degrades_without_global_hook() {
        let host = FakeInputHost {
            fail_global: true,
            ..FakeInputHost::default()
        };
        let hooks = install_input_hooks(&host, Chord::default(), || {}, |_| {});

        assert!(!hooks.has_global_hotkey());
        assert!(!host.press_global());
        assert_eq!(
            host.press_local(ShortcutKey::Escape, ShortcutModifiers::default()),
            KeyDisposition::Consumed
        );
    }

    #[test]
    fn release_unregisters_both_hooks() {
        let host = FakeInputHost::default();
        let hooks = install_input_hooks(&host, Chord::default(), || {}, |_| {});

        hooks.release();

        assert_eq!(*host.released.borrow(), vec!["global", "local"]);
        assert!(!host.press_global());
        assert_eq!(
            host.press_local(ShortcutKey::Escape, ShortcutModifiers::default()),
            KeyDisposition::PassThrough
        );
    }

    #[test]
    fn dropping_subscription_releases_once() {
        let count = Rc::new(Cell::new(0));
        let subscription = Subscription::new({
            let count = count.clone();
            move || count.set(count.get() + 1)
        });
        drop(subscription);
        assert_eq!(count.get(), 1);
    }
}

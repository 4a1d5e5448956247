use std::cell::Cell;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{Align, DropDown, Label, Orientation, Revealer, ScrolledWindow, TextView};

use crate::seed::{LanguageHint, SeedOrigin, KNOWN_LANGUAGES};
use crate::surface::{SurfaceNotification, TextSurface};

/// Drop-down row for `language`, or no row when it is absent or not offered.
fn selector_position(language: Option<&LanguageHint>) -> u32 {
    language
        .and_then(|language| {
            KNOWN_LANGUAGES
                .iter()
                .position(|(id, _)| *id == language.as_str())
        })
        .and_then(|index| u32::try_from(index).ok())
        .unwrap_or(gtk4::INVALID_LIST_POSITION)
}

/// `TextView`-backed editing surface with a language drop-down and clipboard marker.
#[derive(Clone)]
pub(super) struct GtkTextSurface {
    root: gtk4::Box,
    text_view: TextView,
    clipboard_marker: Label,
    language_revealer: Revealer,
    language_dropdown: DropDown,
    suppress_notifications: Rc<Cell<bool>>,
}

impl GtkTextSurface {
    pub(super) fn new() -> Self {
        let root = gtk4::Box::new(Orientation::Vertical, 0);
        root.add_css_class("popup-surface");

        let header = gtk4::Box::new(Orientation::Horizontal, 8);
        header.add_css_class("popup-header");
        let clipboard_marker = Label::new(Some("From clipboard"));
        clipboard_marker.add_css_class("popup-clipboard-marker");
        clipboard_marker.set_halign(Align::Start);
        clipboard_marker.set_visible(false);
        header.append(&clipboard_marker);

        let labels: Vec<&str> = KNOWN_LANGUAGES.iter().map(|(_, label)| *label).collect();
        let language_dropdown = DropDown::from_strings(&labels);
        language_dropdown.add_css_class("popup-language");
        let language_revealer = Revealer::new();
        language_revealer.set_transition_type(gtk4::RevealerTransitionType::SlideDown);
        language_revealer.set_halign(Align::End);
        language_revealer.set_hexpand(true);
        language_revealer.set_child(Some(&language_dropdown));
        header.append(&language_revealer);
        root.append(&header);

        let text_view = TextView::new();
        text_view.set_monospace(true);
        text_view.set_wrap_mode(gtk4::WrapMode::WordChar);
        text_view.set_top_margin(12);
        text_view.set_bottom_margin(12);
        text_view.set_left_margin(16);
        text_view.set_right_margin(16);
        text_view.add_css_class("popup-text");

        let scroller = ScrolledWindow::new();
        scroller.set_vexpand(true);
        scroller.set_hexpand(true);
        scroller.set_child(Some(&text_view));
        root.append(&scroller);

        Self {
            root,
            text_view,
            clipboard_marker,
            language_revealer,
            language_dropdown,
            suppress_notifications: Rc::new(Cell::new(false)),
        }
    }

    pub(super) fn widget(&self) -> &gtk4::Box {
        &self.root
    }

    pub(super) fn focus_text(&self) {
        self.text_view.grab_focus();
    }

    fn buffer_text(&self) -> String {
        let buffer = self.text_view.buffer();
        buffer
            .text(&buffer.start_iter(), &buffer.end_iter(), false)
            .to_string()
    }

    fn replace_silently(&self, text: &str) {
        self.suppress_notifications.set(true);
        let buffer = self.text_view.buffer();
        buffer.set_text(text);
        buffer.place_cursor(&buffer.end_iter());
        self.suppress_notifications.set(false);
    }

    fn select_silently(&self, position: u32) {
        self.suppress_notifications.set(true);
        self.language_dropdown.set_selected(position);
        self.suppress_notifications.set(false);
    }

    /// Routes user edits and language picks to `handler`; programmatic updates stay silent.
    pub(super) fn connect_notifications<F>(&self, handler: F)
    where
        F: Fn(SurfaceNotification) + 'static,
    {
        let handler = Rc::new(handler);
        {
            let surface = self.clone();
            let handler = handler.clone();
            self.text_view.buffer().connect_changed(move |_| {
                if surface.suppress_notifications.get() {
                    return;
                }
                surface.clipboard_marker.set_visible(false);
                handler(SurfaceNotification::TextChanged(surface.buffer_text()));
            });
        }
        {
            let surface = self.clone();
            self.language_dropdown
                .connect_selected_notify(move |dropdown| {
                    if surface.suppress_notifications.get() {
                        return;
                    }
                    let selected = usize::try_from(dropdown.selected()).ok();
                    let Some((id, _)) = selected.and_then(|index| KNOWN_LANGUAGES.get(index)) else {
                        return;
                    };
                    surface.language_revealer.set_reveal_child(false);
                    surface.focus_text();
                    if let Some(notification) = SurfaceNotification::language_chosen(id) {
                        handler(notification);
                    }
                });
        }
    }
}

impl TextSurface for GtkTextSurface {
    fn set_value(&self, text: &str, origin: SeedOrigin) {
        self.replace_silently(text);
        self.clipboard_marker
            .set_visible(origin.is_from_clipboard());
        self.language_revealer.set_reveal_child(false);
        // Any row, including the previous one, must emit a pick after new content.
        self.select_silently(gtk4::INVALID_LIST_POSITION);
        self.focus_text();
    }

    fn value(&self) -> String {
        self.buffer_text()
    }

    fn set_language(&self, language: &LanguageHint) {
        let position = selector_position(Some(language));
        if position == gtk4::INVALID_LIST_POSITION {
            tracing::debug!(%language, "language not offered by selector");
        }
        self.select_silently(position);
    }

    fn clear(&self) {
        self.replace_silently("");
        self.clipboard_marker.set_visible(false);
    }

    fn show_language_selector(&self) {
        self.language_revealer.set_reveal_child(true);
        self.language_dropdown.grab_focus();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_position_matches_offered_languages_only() {
        assert_eq!(selector_position(None), gtk4::INVALID_LIST_POSITION);

        let plain = LanguageHint::new(KNOWN_LANGUAGES[0].0);
        assert_eq!(selector_position(plain.as_ref()), 0);

        let last = KNOWN_LANGUAGES.len() - 1;
        let hint = LanguageHint::new(KNOWN_LANGUAGES[last].0);
        assert_eq!(selector_position(hint.as_ref()), last as u32);

        let unknown = LanguageHint::new("cobol");
        assert_eq!(selector_position(unknown.as_ref()), gtk4::INVALID_LIST_POSITION);
    }
}

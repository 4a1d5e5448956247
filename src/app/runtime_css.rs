use gtk4::CssProvider;

const PANEL_RADIUS: u16 = 14;
const BORDER_WIDTH: u16 = 1;
const HEADER_PADDING: u16 = 8;

fn popup_css() -> String {
    format!(
        "
window.popup-editor-root {{
  background: transparent;
}}
.popup-surface {{
  border-radius: {PANEL_RADIUS}px;
  border: {BORDER_WIDTH}px solid alpha(@borders, 0.6);
  background: alpha(@window_bg_color, 0.94);
  box-shadow: 0 2px 8px rgba(0, 0, 0, 0.08),
              0 12px 40px rgba(0, 0, 0, 0.18);
}}
.popup-header {{
  padding: {HEADER_PADDING}px {HEADER_PADDING}px 0 {HEADER_PADDING}px;
  min-height: 24px;
}}
.popup-clipboard-marker {{
  font-size: 0.85em;
  opacity: 0.7;
  padding: 2px 8px;
  border-radius: 999px;
  background: alpha(@accent_bg_color, 0.18);
}}
.popup-text,
.popup-text text {{
  background: transparent;
  font-size: 1.05em;
}}
"
    )
}

pub(super) fn install_runtime_css() {
    let provider = CssProvider::new();
    provider.load_from_data(&popup_css());
    if let Some(display) = gtk4::gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

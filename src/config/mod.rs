use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::focus::FocusBackend;
use crate::inject::PasteBackend;
use crate::input::Chord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigPathError {
    #[error("neither XDG_CONFIG_HOME nor HOME is set")]
    MissingHomeDirectory,
}

const APP_DIR: &str = "popup-editor";
const APP_CONFIG_FILE: &str = "config.json";
const MIN_WINDOW_WIDTH: i32 = 240;
const MIN_WINDOW_HEIGHT: i32 = 160;
const MAX_PASTE_DELAY_MS: u64 = 5_000;

/// Application-level settings from `config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub hotkey: String,
    pub paste_delay_ms: u64,
    pub text_path: Option<PathBuf>,
    pub window_width: i32,
    pub window_height: i32,
    pub focus_backend: FocusBackend,
    pub paste_backend: PasteBackend,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            hotkey: Chord::default().to_string(),
            paste_delay_ms: 100,
            text_path: None,
            window_width: 900,
            window_height: 550,
            focus_backend: FocusBackend::default(),
            paste_backend: PasteBackend::default(),
        }
    }
}

impl AppConfig {
    pub fn hotkey_chord(&self) -> Chord {
        self.hotkey.parse().unwrap_or_else(|err| {
            tracing::warn!(hotkey = self.hotkey, ?err, "invalid hotkey in config; using default");
            Chord::default()
        })
    }

    pub fn paste_delay(&self) -> Duration {
        Duration::from_millis(self.paste_delay_ms.min(MAX_PASTE_DELAY_MS))
    }

    pub fn window_size(&self) -> (i32, i32) {
        (
            self.window_width.max(MIN_WINDOW_WIDTH),
            self.window_height.max(MIN_WINDOW_HEIGHT),
        )
    }
}

pub fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(err) => {
            tracing::debug!(?err, "no config directory; using defaults");
            return AppConfig::default();
        }
    };
    if !path.exists() {
        return AppConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, path = %path.display(), "failed to parse config.json; using defaults");
            AppConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, path = %path.display(), "failed to read config.json; using defaults");
            AppConfig::default()
        }
    }
}

pub fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::unique_temp_dir;

    #[test]
    fn app_config_path_prefers_xdg_config_home() {
        let path = app_config_path(
            APP_DIR,
            APP_CONFIG_FILE,
            Some(Path::new("/tmp/config-root")),
            Some(Path::new("/tmp/home")),
        )
        .expect("path should resolve");

        assert_eq!(
            path,
            PathBuf::from("/tmp/config-root/popup-editor/config.json")
        );
    }

    #[test]
    fn app_config_path_falls_back_to_home_dot_config() {
        let path = app_config_path(
            APP_DIR,
            APP_CONFIG_FILE,
            Some(Path::new("")),
            Some(Path::new("/tmp/home")),
        )
        .expect("path should resolve");

        assert_eq!(
            path,
            PathBuf::from("/tmp/home/.config/popup-editor/config.json")
        );
    }

    #[test]
    fn app_config_path_errors_when_home_missing_and_xdg_unset() {
        let error = app_config_path(APP_DIR, APP_CONFIG_FILE, None, None).unwrap_err();
        assert_eq!(error, ConfigPathError::MissingHomeDirectory);
    }

    #[test]
    fn missing_config_file_yields_defaults() {
        let root = unique_temp_dir("config-missing");
        let config = load_app_config_with(Some(&root), None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.hotkey_chord(), Chord::default());
        assert_eq!(config.paste_delay(), Duration::from_millis(100));
        assert_eq!(config.window_size(), (900, 550));
    }

    #[test]
    fn partial_config_overrides_only_given_keys() {
        let root = unique_temp_dir("config-partial");
        std::fs::create_dir_all(root.join(APP_DIR)).unwrap();
        std::fs::write(
            root.join(APP_DIR).join(APP_CONFIG_FILE),
            r#"{"hotkey":"Super+Space","paste_delay_ms":250,"focus_backend":"x11"}"#,
        )
        .unwrap();

        let config = load_app_config_with(Some(&root), None);

        assert_eq!(config.hotkey_chord().to_string(), "Super+Space");
        assert_eq!(config.paste_delay(), Duration::from_millis(250));
        assert_eq!(config.focus_backend, FocusBackend::X11);
        assert_eq!(config.paste_backend, PasteBackend::Auto);
        assert_eq!(config.text_path, None);
        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn invalid_config_file_yields_defaults() {
        let root = unique_temp_dir("config-invalid");
        std::fs::create_dir_all(root.join(APP_DIR)).unwrap();
        std::fs::write(root.join(APP_DIR).join(APP_CONFIG_FILE), "{ not json").unwrap();

        assert_eq!(load_app_config_with(Some(&root), None), AppConfig::default());
        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = AppConfig {
            hotkey: "Hyper+E".to_string(),
            paste_delay_ms: 60_000,
            window_width: 10,
            window_height: -5,
            ..AppConfig::default()
        };

        assert_eq!(config.hotkey_chord(), Chord::default());
        assert_eq!(config.paste_delay(), Duration::from_millis(MAX_PASTE_DELAY_MS));
        assert_eq!(config.window_size(), (MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT));
    }
}

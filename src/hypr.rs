//! Thin `hyprctl` plumbing shared by focus tracking, paste injection and window placement.

use std::process::{Command, Output};
use std::time::Duration;

const HYPRCTL: &str = "hyprctl";
const HYPR_FLOAT_RETRY_COUNT: u8 = 40;
const HYPR_FLOAT_RETRY_DELAY: Duration = Duration::from_millis(50);

pub fn is_hyprland_session() -> bool {
    std::env::var_os("HYPRLAND_INSTANCE_SIGNATURE").is_some()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyprWindow {
    pub address: String,
    pub class: Option<String>,
    pub pid: Option<u32>,
}

fn window_from_value(client: &serde_json::Value) -> Option<HyprWindow> {
    let address = client.get("address")?.as_str()?;
    if address.is_empty() || address == "0x0" {
        return None;
    }
    let class = client
        .get("class")
        .and_then(serde_json::Value::as_str)
        .filter(|class| !class.is_empty())
        .map(str::to_string);
    let pid = client
        .get("pid")
        .and_then(serde_json::Value::as_i64)
        .and_then(|pid| u32::try_from(pid).ok());
    Some(HyprWindow {
        address: address.to_string(),
        class,
        pid,
    })
}

/// Parses `hyprctl -j activewindow`; an empty workspace yields `{}`.
pub fn active_window_from_json(stdout: &[u8]) -> Option<HyprWindow> {
    let parsed: serde_json::Value = serde_json::from_slice(stdout).ok()?;
    window_from_value(&parsed)
}

/// Finds a client by exact title in `hyprctl -j clients`.
pub fn client_address_from_json(stdout: &[u8], expected_title: &str) -> Option<String> {
    let parsed: serde_json::Value = serde_json::from_slice(stdout).ok()?;
    parsed
        .as_array()?
        .iter()
        .filter(|client| {
            client.get("title").and_then(serde_json::Value::as_str) == Some(expected_title)
        })
        .find_map(window_from_value)
        .map(|window| window.address)
}

pub fn hyprctl(args: &[&str]) -> std::io::Result<Output> {
    Command::new(HYPRCTL).args(args).output()
}

/// `hyprctl dispatch` exits zero even when the dispatcher fails; the reply text tells.
pub fn dispatch_succeeded(output: &Output) -> bool {
    output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "ok"
}

pub fn active_window() -> Option<HyprWindow> {
    let outcome = hyprctl(&["-j", "activewindow"]).ok()?;
    if !outcome.status.success() {
        return None;
    }
    active_window_from_json(&outcome.stdout)
}

fn find_window_address(expected_title: &str) -> Option<String> {
    let outcome = hyprctl(&["-j", "clients"]).ok()?;
    if !outcome.status.success() {
        return None;
    }
    client_address_from_json(&outcome.stdout, expected_title)
}

fn retry_until_some<T, F, S>(
    retry_count: u8,
    retry_delay: Duration,
    mut action: F,
    mut sleep: S,
) -> Option<T>
where
    F: FnMut(u8) -> Option<T>,
    S: FnMut(Duration),
{
    for attempt in 1..=retry_count {
        if let Some(value) = action(attempt) {
            return Some(value);
        }

        if attempt < retry_count {
            sleep(retry_delay);
        }
    }

    None
}

/// Asks Hyprland to float the window titled `expected_title`, retrying until it maps.
pub fn request_window_floating(expected_title: &str, size: (i32, i32)) {
    if !is_hyprland_session() {
        tracing::debug!("skipping floating dispatch outside Hyprland");
        return;
    }

    let expected_title = expected_title.to_string();
    std::thread::spawn(move || {
        let Some(address) = retry_until_some(
            HYPR_FLOAT_RETRY_COUNT,
            HYPR_FLOAT_RETRY_DELAY,
            |_| find_window_address(&expected_title),
            std::thread::sleep,
        ) else {
            tracing::debug!(
                title = expected_title,
                "hypr window address lookup failed for floating request"
            );
            return;
        };

        let selector = format!("address:{address}");
        let (width, height) = size;
        let resize_arg = format!("exact {} {},{selector}", width.max(1), height.max(1));
        for (dispatcher, arg) in [
            ("setfloating", selector.as_str()),
            ("resizewindowpixel", resize_arg.as_str()),
        ] {
            match hyprctl(&["dispatch", dispatcher, arg]) {
                Ok(result) if dispatch_succeeded(&result) => {
                    tracing::debug!(dispatcher, arg, "applied popup placement dispatch");
                }
                Ok(result) => {
                    let stdout = String::from_utf8_lossy(&result.stdout);
                    tracing::warn!(
                        dispatcher,
                        arg,
                        status = result.status.code(),
                        reply = stdout.trim(),
                        "popup placement dispatch was rejected"
                    );
                }
                Err(err) => {
                    tracing::debug!(dispatcher, arg, ?err, "popup placement dispatch failed");
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn active_window_from_json_reads_address_class_and_pid() {
        let payload = br#"{"address":"0x55d1","class":"firefox","title":"Docs","pid":4242}"#;
        let window = active_window_from_json(payload).expect("window");
        assert_eq!(window.address, "0x55d1");
        assert_eq!(window.class.as_deref(), Some("firefox"));
        assert_eq!(window.pid, Some(4242));
    }

    #[test]
    fn active_window_from_json_treats_empty_object_as_none() {
        assert_eq!(active_window_from_json(b"{}"), None);
        assert_eq!(active_window_from_json(b"Invalid"), None);
    }

    #[test]
    fn client_address_from_json_matches_exact_title_and_skips_garbage() {
        let payload = br#"
[
  "ok",
  {"address":"0x100","title":"Popup Editor - old"},
  {"address":"0x200","title":"Popup Editor"}
]
"#;
        assert_eq!(
            client_address_from_json(payload, "Popup Editor").as_deref(),
            Some("0x200")
        );
        assert_eq!(client_address_from_json(payload, "Missing"), None);
    }

    #[test]
    fn retry_until_some_stops_at_first_value() {
        let sleeps = Rc::new(RefCell::new(Vec::new()));
        let result = retry_until_some(
            5,
            Duration::from_millis(10),
            |attempt| (attempt == 3).then_some(attempt),
            {
                let sleeps = sleeps.clone();
                move |duration| sleeps.borrow_mut().push(duration)
            },
        );

        assert_eq!(result, Some(3));
        assert_eq!(sleeps.borrow().len(), 2);
    }

    #[test]
    fn retry_until_some_gives_up_without_trailing_sleep() {
        let sleeps = Rc::new(RefCell::new(Vec::new()));
        let result = retry_until_some(
            3,
            Duration::from_millis(5),
            |_| None::<u8>,
            {
                let sleeps = sleeps.clone();
                move |duration| sleeps.borrow_mut().push(duration)
            },
        );

        assert_eq!(result, None);
        assert_eq!(sleeps.borrow().len(), 2);
    }
}

use std::ffi::OsString;

/// What this invocation asks of the (possibly already running) instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum StartupCommand {
    /// Start hidden; forwarded as a toggle when an instance already runs.
    #[default]
    Launch,
    Toggle,
    Quit,
}

impl StartupCommand {
    /// Action name activated on the primary instance from a second invocation.
    pub(crate) const fn remote_action(self) -> &'static str {
        match self {
            Self::Launch | Self::Toggle => super::ACTION_TOGGLE,
            Self::Quit => super::ACTION_QUIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StartupConfig {
    pub(crate) command: StartupCommand,
    pub(crate) verbose: bool,
}

impl StartupConfig {
    pub fn from_args() -> Self {
        Self::from_iter(std::env::args_os().skip(1))
    }

    fn from_iter<I>(args: I) -> Self
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut config = Self::default();
        for arg in args {
            match arg.to_str() {
                Some("--toggle") => config.command = StartupCommand::Toggle,
                Some("--quit") => config.command = StartupCommand::Quit,
                Some("--verbose" | "-v") => config.verbose = true,
                _ => eprintln!(
                    "popup-editor: ignoring unknown argument {}",
                    arg.to_string_lossy()
                ),
            }
        }
        config
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

pub(super) fn gtk_launch_args() -> Vec<String> {
    std::env::args().take(1).collect()
}

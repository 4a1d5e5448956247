use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use gtk4::prelude::*;
use gtk4::{gio, glib, Application, ApplicationWindow};

use crate::clipboard;
use crate::config::{load_app_config, AppConfig};
use crate::controller::{ControllerDeps, PopupController, PopupWindow, Scheduler};
use crate::error::{AppError, AppResult};
use crate::focus;
use crate::hotkey::{install_input_hooks, InputHooks};
use crate::hypr;
use crate::inject;
use crate::storage::FileTextStore;

mod input_bridge;
mod input_host;
mod runtime_css;
mod runtime_support;
mod surface;

use self::input_host::GtkInputHost;
use self::runtime_css::install_runtime_css;
use self::runtime_support::{gtk_launch_args, StartupCommand};
use self::surface::GtkTextSurface;

pub use self::runtime_support::StartupConfig;

const APP_ID: &str = "io.github.popupeditor.PopupEditor";
const WINDOW_TITLE: &str = "Popup Editor";
pub(crate) const ACTION_TOGGLE: &str = "toggle";
pub(crate) const ACTION_QUIT: &str = "quit";

/// Shared controller that never runs re-entrantly: a call arriving mid-transition
/// is re-queued on the main loop.
#[derive(Clone)]
struct ControllerHandle(Rc<RefCell<PopupController>>);

impl ControllerHandle {
    fn dispatch<F>(&self, op: F)
    where
        F: FnOnce(&mut PopupController) + 'static,
    {
        match self.0.try_borrow_mut() {
            Ok(mut controller) => op(&mut controller),
            Err(_) => {
                tracing::debug!("controller busy; re-queueing notification");
                let handle = self.clone();
                glib::idle_add_local_once(move || handle.dispatch(op));
            }
        }
    }
}

struct GtkPopupWindow {
    window: ApplicationWindow,
    surface: GtkTextSurface,
    size: (i32, i32),
}

impl PopupWindow for GtkPopupWindow {
    fn show_and_focus(&self) {
        self.window.present();
        self.surface.focus_text();
        hypr::request_window_floating(WINDOW_TITLE, self.size);
    }

    fn hide(&self) {
        self.window.set_visible(false);
    }
}

struct GlibScheduler;

impl Scheduler for GlibScheduler {
    fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        glib::timeout_add_local_once(delay, task);
    }
}

/// Everything alive while the primary instance runs.
struct PopupRuntime {
    input_hooks: InputHooks,
    _hold_guard: gio::ApplicationHoldGuard,
}

impl PopupRuntime {
    fn shutdown(self) {
        tracing::info!("shutting down; releasing input hooks");
        self.input_hooks.release();
    }
}

fn build_popup_window(
    app: &Application,
    surface: &GtkTextSurface,
    size: (i32, i32),
) -> ApplicationWindow {
    let window = ApplicationWindow::new(app);
    window.add_css_class("popup-editor-root");
    window.set_title(Some(WINDOW_TITLE));
    window.set_decorated(false);
    window.set_default_size(size.0, size.1);
    window.set_child(Some(surface.widget()));
    window
}

fn connect_window_lifecycle(window: &ApplicationWindow, controller: &ControllerHandle) {
    {
        let controller = controller.clone();
        window.connect_is_active_notify(move |window| {
            if !window.is_active() && window.is_visible() {
                controller.dispatch(PopupController::on_focus_lost);
            }
        });
    }
    {
        let controller = controller.clone();
        window.connect_close_request(move |_| {
            controller.dispatch(PopupController::dismiss);
            glib::Propagation::Stop
        });
    }
}

fn install_app_actions(app: &Application, controller: &ControllerHandle) {
    let toggle = gio::SimpleAction::new(ACTION_TOGGLE, None);
    {
        let controller = controller.clone();
        toggle.connect_activate(move |_, _| controller.dispatch(PopupController::activate));
    }
    app.add_action(&toggle);

    let quit = gio::SimpleAction::new(ACTION_QUIT, None);
    {
        let app = app.clone();
        quit.connect_activate(move |_, _| {
            tracing::info!("quit requested");
            app.quit();
        });
    }
    app.add_action(&quit);
}

fn build_runtime(app: &Application, config: &AppConfig, store: FileTextStore) -> PopupRuntime {
    install_runtime_css();
    let size = config.window_size();
    let surface = GtkTextSurface::new();
    let window = build_popup_window(app, &surface, size);

    let deps = ControllerDeps {
        store: Box::new(store),
        clipboard: clipboard::system_clipboard(),
        tracker: focus::select_tracker(config.focus_backend),
        injector: Rc::from(inject::select_injector(config.paste_backend)),
        surface: Rc::new(surface.clone()),
        window: Rc::new(GtkPopupWindow {
            window: window.clone(),
            surface: surface.clone(),
            size,
        }),
        scheduler: Box::new(GlibScheduler),
    };
    let controller = ControllerHandle(Rc::new(RefCell::new(PopupController::new(
        deps,
        config.paste_delay(),
    ))));

    {
        let controller = controller.clone();
        surface.connect_notifications(move |notification| {
            controller.dispatch(move |popup| popup.handle_notification(notification));
        });
    }
    connect_window_lifecycle(&window, &controller);
    install_app_actions(app, &controller);

    let host = GtkInputHost::new(&window);
    let input_hooks = install_input_hooks(
        &host,
        config.hotkey_chord(),
        {
            let controller = controller.clone();
            move || controller.dispatch(PopupController::activate)
        },
        {
            let controller = controller.clone();
            move |shortcut| controller.dispatch(move |popup| popup.handle_shortcut(shortcut))
        },
    );

    PopupRuntime {
        input_hooks,
        _hold_guard: app.hold(),
    }
}

fn forward_to_primary(app: &Application, command: StartupCommand) {
    let action = command.remote_action();
    app.activate_action(action, None);
    if let Some(connection) = app.dbus_connection() {
        if let Err(err) = connection.flush_sync(None::<&gio::Cancellable>) {
            tracing::warn!(?err, action, "failed to flush command to running instance");
            return;
        }
    }
    tracing::info!(action, "forwarded command to running instance");
}

/// Runs the popup daemon, or forwards the command to an instance that already runs.
pub fn run(startup: StartupConfig) -> AppResult<()> {
    let config = load_app_config();
    tracing::info!(
        hotkey = config.hotkey,
        paste_delay_ms = config.paste_delay_ms,
        focus_backend = ?config.focus_backend,
        paste_backend = ?config.paste_backend,
        "loaded config"
    );

    let application = Application::new(Some(APP_ID), gio::ApplicationFlags::empty());
    application.register(None::<&gio::Cancellable>)?;
    if application.is_remote() {
        forward_to_primary(&application, startup.command);
        return Ok(());
    }
    if startup.command == StartupCommand::Quit {
        tracing::info!("no running instance to quit");
        return Ok(());
    }

    let store = match &config.text_path {
        Some(path) => FileTextStore::with_path(path),
        None => FileTextStore::with_default_path()?,
    };
    tracing::info!(path = %store.path().display(), "using text store");

    let runtime = Rc::new(RefCell::new(None::<PopupRuntime>));
    let pending_store = RefCell::new(Some(store));
    let activate_once = Rc::new(Cell::new(false));
    {
        let runtime = runtime.clone();
        application.connect_activate(move |app| {
            if activate_once.replace(true) {
                tracing::debug!("ignoring duplicate gtk activate signal");
                return;
            }
            let Some(store) = pending_store.borrow_mut().take() else {
                return;
            };
            runtime
                .borrow_mut()
                .replace(build_runtime(app, &config, store));
            tracing::info!("popup editor ready");
            if startup.command == StartupCommand::Toggle {
                app.activate_action(ACTION_TOGGLE, None);
            }
        });
    }
    application.connect_shutdown(move |_| {
        if let Some(runtime) = runtime.borrow_mut().take() {
            runtime.shutdown();
        }
    });

    // Pass only argv[0] to GTK so app-specific flags (e.g. --toggle) do not fail GTK parsing.
    let exit_code = application.run_with_args(&gtk_launch_args());
    if exit_code != glib::ExitCode::SUCCESS {
        return Err(AppError::Exit {
            status: format!("{exit_code:?}"),
        });
    }
    Ok(())
}

pub mod app;
pub mod clipboard;
mod config;
pub mod controller;
pub mod error;
pub mod focus;
pub mod hotkey;
mod hypr;
pub mod inject;
pub mod input;
pub mod logging;
pub mod seed;
pub mod state;
pub mod storage;
pub mod surface;
pub use error::{AppError, AppResult};

/// Entrypoint used by higher-level integrations and CLI bindings.
pub fn run() -> AppResult<()> {
    let startup = app::StartupConfig::from_args();
    logging::init(startup.verbose());
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting popup-editor");

    app::run(startup)?;

    tracing::info!("popup-editor exited");
    Ok(())
}

use crate::storage::StorageError;
use gtk4::glib;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to register application: {0}")]
    Register(#[from] glib::Error),
    #[error("application exited with status {status}")]
    Exit { status: String },
}

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

const APP_DATA_DIR: &str = ".popupeditor";
const TEXT_FILE_NAME: &str = "text";
const TEMP_SUFFIX: &str = ".tmp";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("text path has no parent directory: {path}")]
    MissingParent { path: PathBuf },
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Key-value-of-one persistence for the editor text.
pub trait TextStore {
    /// Returns `Ok(None)` when nothing has been persisted yet.
    fn load(&self) -> StorageResult<Option<String>>;
    fn save(&self, text: &str) -> StorageResult<()>;
    /// Deleting an absent entry succeeds.
    fn clear(&self) -> StorageResult<()>;
}

#[derive(Debug, Clone)]
pub struct FileTextStore {
    path: PathBuf,
}

impl FileTextStore {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn with_default_path() -> StorageResult<Self> {
        let home = std::env::var_os("HOME").ok_or(StorageError::MissingHomeDirectory)?;
        Ok(Self::with_path(default_text_path(Path::new(&home))))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{}{TEMP_SUFFIX}", std::process::id()));
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TextStore for FileTextStore {
    fn load(&self) -> StorageResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn save(&self, text: &str) -> StorageResult<()> {
        let parent = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .ok_or_else(|| StorageError::MissingParent {
                path: self.path.clone(),
            })?;
        fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;

        let temp_path = self.temp_path();
        let written = write_synced(&temp_path, text.as_bytes())
            .and_then(|()| fs::rename(&temp_path, &self.path));
        if let Err(err) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(self.io_error(err));
        }
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }
}

pub fn default_text_path(home: &Path) -> PathBuf {
    home.join(APP_DATA_DIR).join(TEXT_FILE_NAME)
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

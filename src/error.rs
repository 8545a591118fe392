use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FirmfigError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No configuration loaded — call load() on the document first")]
    NoDocument,
}

impl FirmfigError {
    /// The file that could not be opened, when this is an I/O failure.
    ///
    /// Load reads two files (template first, then user config); callers use
    /// this to tell the user which of the pair was at fault.
    pub fn path(&self) -> Option<&Path> {
        match self {
            FirmfigError::Io { path, .. } => Some(path),
            FirmfigError::NoDocument => None,
        }
    }
}

//! Error types for jarslim
//!
//! Every failure aborts the whole run. The binary wraps these once with
//! miette before reporting them.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while assembling a classpath
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Failed to parse {}{}: {reason}", archive.display(), member_suffix(member))]
    Parse {
        archive: PathBuf,
        member: Option<String>,
        reason: String,
    },

    #[error("Unsupported storage method {method} for {member} in {}", archive.display())]
    UnsupportedStorage {
        archive: PathBuf,
        member: String,
        method: String,
    },

    #[error("Failed to transform {member} in {}", archive.display())]
    Transform {
        archive: PathBuf,
        member: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Archive error in {}: {source}", path.display())]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

impl Error {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn zip(path: impl AsRef<Path>, source: zip::result::ZipError) -> Self {
        Error::Zip {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn parse(archive: impl AsRef<Path>, member: Option<&str>, reason: impl Into<String>) -> Self {
        Error::Parse {
            archive: archive.as_ref().to_path_buf(),
            member: member.map(str::to_string),
            reason: reason.into(),
        }
    }
}

fn member_suffix(member: &Option<String>) -> String {
    member
        .as_ref()
        .map(|m| format!("!/{}", m))
        .unwrap_or_default()
}

//! XSpace session loading.
//!
//! This module reads a serialized `XSpace` from disk, applying the guard
//! checks that must pass before anything is derived from it, and computes the
//! summary reported on stderr.
//!
//! # Example
//!
//! ```no_run
//! use xspace2json::xspace::{load_xspace, LoadError};
//! use std::path::Path;
//!
//! match load_xspace(Path::new("./session.xplane.pb")) {
//!     Ok(space) => eprintln!("{} planes", space.planes.len()),
//!     Err(LoadError::Empty(path)) => eprintln!("nothing recorded in {}", path.display()),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

use protobuf::Message;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::protos::xplane::{XPlane, XSpace};

/// Reasons a session file could not be loaded.
#[derive(Debug)]
pub enum LoadError {
    /// The path does not exist.
    NotFound(PathBuf),
    /// The file exists but has zero length.
    Empty(PathBuf),
    /// The file exists but could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The bytes are not a valid `XSpace`.
    Parse(protobuf::Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound(path) => write!(f, "File not found {}!", path.display()),
            LoadError::Empty(path) => write!(f, "Empty file {}!", path.display()),
            LoadError::Io { path, source } => {
                write!(f, "Failed to read {}: {source}", path.display())
            }
            LoadError::Parse(e) => write!(f, "Error while parsing xspace: {e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Parse(e) => Some(e),
            LoadError::NotFound(_) | LoadError::Empty(_) => None,
        }
    }
}

/// Load and decode an `XSpace` from `path`.
///
/// The checks run in order (existence, length, decoding) and the first one
/// to fail decides the error.
pub fn load_xspace(path: &Path) -> Result<XSpace, LoadError> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(LoadError::NotFound(path.to_path_buf()))
        }
        Err(source) => {
            return Err(LoadError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if metadata.len() == 0 {
        return Err(LoadError::Empty(path.to_path_buf()));
    }

    let buffer = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_xspace(&buffer)
}

/// Decode an `XSpace` from raw bytes.
pub fn parse_xspace(bytes: &[u8]) -> Result<XSpace, LoadError> {
    if bytes.is_empty() {
        return Err(LoadError::Empty(PathBuf::from("<memory>")));
    }
    XSpace::parse_from_bytes(bytes).map_err(LoadError::Parse)
}

/// Total number of events on a single plane.
pub fn plane_event_count(plane: &XPlane) -> u64 {
    plane
        .lines
        .iter()
        .map(|line| line.events.len() as u64)
        .sum()
}

/// Counts reported once a session has been loaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Number of planes in the session.
    pub planes: usize,
    /// Events summed over every line of every plane.
    pub events: u64,
}

impl SessionSummary {
    /// Summarize `space`.
    #[must_use]
    pub fn of(space: &XSpace) -> Self {
        Self {
            planes: space.planes.len(),
            events: space.planes.iter().map(plane_event_count).sum(),
        }
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Found {} events across {} spaces.",
            self.events, self.planes
        )
    }
}

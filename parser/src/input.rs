//! Resolution and opening of report files.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use solar_tabulate_core::{ParseError, Report};
use thiserror::Error;
use tracing::debug;

use crate::report::read_report;

/// File name SOLAR writes polygenic results to inside its output directory.
pub const REPORT_FILE_NAME: &str = "polygenic.out";

/// Reasons a report file could not be read.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The resolved path does not exist.
    #[error("SOLAR results not found")]
    NotFound { path: PathBuf },

    /// The resolved path exists but may not be opened.
    #[error("permission denied: {source}")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file was opened but its content is not a usable report.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ReadError {
    /// Whether the file could not be reached at all, as opposed to being
    /// unparseable.
    pub fn is_access_error(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::PermissionDenied { .. })
    }
}

/// Convenience alias for results with [`ReadError`].
pub type Result<T> = std::result::Result<T, ReadError>;

/// Maps a command-line path to the report file to read.
///
/// Directories are SOLAR output directories and resolve to their
/// `polygenic.out`; other paths are used unchanged.
pub fn resolve_input(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(REPORT_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}

/// Opens and parses one report file. The file is closed on return.
pub fn read_report_file(path: &Path) -> Result<Report> {
    let file = File::open(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => ReadError::NotFound {
            path: path.to_path_buf(),
        },
        io::ErrorKind::PermissionDenied => ReadError::PermissionDenied {
            path: path.to_path_buf(),
            source: err,
        },
        _ => ReadError::Parse(ParseError::UnreadableFile(err.to_string())),
    })?;

    debug!(path = %path.display(), "Reading report");
    Ok(read_report(BufReader::new(file))?)
}

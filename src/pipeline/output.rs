//! Output handling for converted documents.

use crate::error::{ConvertError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Target for output - either stdout or a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write to stdout
    Stdout,
    /// Write to a file
    File(PathBuf),
}

impl OutputTarget {
    /// Create output target from optional path; `-` also means stdout.
    pub fn from_option(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) if p != Path::new("-") => Self::File(p),
            _ => Self::Stdout,
        }
    }

    /// Human-readable name for logs and errors
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::Stdout => "<stdout>".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Write output to the target (stdout or file).
///
/// File output goes to a sibling temporary file first and is renamed into
/// place, so a failed write never leaves a truncated document behind.
pub fn write_output(content: &[u8], target: &OutputTarget) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(content)
                .and_then(|()| stdout.flush())
                .map_err(|e| ConvertError::io("<stdout>", e))
        }
        OutputTarget::File(path) => {
            write_file_atomic(path, content)?;
            tracing::info!("CycloneDX document written to {}", path.display());
            Ok(())
        }
    }
}

fn write_file_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    // Dropping the temp file on any error path removes it
    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| ConvertError::io(parent, e))?;
    tmp.write_all(content).map_err(|e| ConvertError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| ConvertError::io(path, e.error))?;
    Ok(())
}

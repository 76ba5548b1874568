//! Input handling: read the source document from a file or stdin.

use crate::error::{ConvertError, InputErrorKind, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Where the source document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Read from stdin
    Stdin,
    /// Read from a file
    File(PathBuf),
}

impl InputSource {
    /// Interpret a CLI argument: `-` means stdin.
    pub fn from_arg(arg: &Path) -> Result<Self> {
        if arg.as_os_str().is_empty() {
            return Err(ConvertError::input(
                "resolving input",
                InputErrorKind::EmptyPath,
            ));
        }
        if arg == Path::new("-") {
            return Ok(Self::Stdin);
        }
        Ok(Self::File(arg.to_path_buf()))
    }

    /// Human-readable name for logs and errors
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::Stdin => "<stdin>".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Read all source bytes.
///
/// Directories and empty content are rejected here so the converter only
/// ever sees real documents.
pub fn read_input(source: &InputSource) -> Result<Vec<u8>> {
    let bytes = match source {
        InputSource::Stdin => {
            let mut buf = Vec::new();
            std::io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .map_err(|e| ConvertError::io("<stdin>", e))?;
            buf
        }
        InputSource::File(path) => read_file(path)?,
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ConvertError::input(
            format!("reading {}", source.display_name()),
            InputErrorKind::EmptyContent,
        ));
    }

    tracing::debug!(source = %source.display_name(), bytes = bytes.len(), "read input");
    Ok(bytes)
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str().is_empty() {
        return Err(ConvertError::input("reading input", InputErrorKind::EmptyPath));
    }
    if path.is_dir() {
        return Err(ConvertError::input(
            format!("reading {}", path.display()),
            InputErrorKind::IsDirectory(path.to_path_buf()),
        ));
    }
    std::fs::read(path).map_err(|e| ConvertError::io(path, e))
}
